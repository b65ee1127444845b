//! Stateful task table projection.
//!
//! Holds the current query rows plus sort and page state, and recomputes the
//! sorted sequence whenever rows or sort change. Paging is derived on demand
//! from the sorted sequence.

use super::page::{paginate, Page, PageRequest};
use super::sort::{sort_rows, SortColumn, SortState};
use crate::search::task_query::TaskRow;

#[derive(Debug, Clone)]
pub struct TaskTable {
    sorted: Vec<TaskRow>,
    source: Vec<TaskRow>,
    sort: Option<SortState>,
    page: PageRequest,
}

impl TaskTable {
    pub fn new(rows: Vec<TaskRow>, page: PageRequest) -> Self {
        let mut table = Self {
            sorted: Vec::new(),
            source: rows,
            sort: None,
            page,
        };
        table.resort();
        table
    }

    /// Replaces the rows, e.g. after a re-query following a mutation.
    ///
    /// Sort state is kept; the page index is clamped to the new range.
    pub fn set_rows(&mut self, rows: Vec<TaskRow>) {
        self.source = rows;
        self.resort();
        let last_index = self.page_count().saturating_sub(1);
        self.page.page_index = self.page.page_index.min(last_index);
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
        self.resort();
    }

    /// Header-click behavior: toggles direction on the active column.
    pub fn toggle_sort(&mut self, column: SortColumn) -> SortState {
        let state = SortState::toggled(self.sort, column);
        self.set_sort(Some(state));
        state
    }

    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    /// Changing page size returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page = PageRequest::first(page_size);
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.page = PageRequest::new(page_index, self.page.page_size);
    }

    /// All rows in current sort order.
    pub fn sorted(&self) -> &[TaskRow] {
        &self.sorted
    }

    pub fn page_count(&self) -> usize {
        self.sorted.len().div_ceil(self.page.page_size.max(1))
    }

    pub fn page(&self) -> Page<TaskRow> {
        paginate(&self.sorted, self.page)
    }

    fn resort(&mut self) {
        self.sorted = self.source.clone();
        if let Some(state) = self.sort {
            sort_rows(&mut self.sorted, state);
        }
    }
}
