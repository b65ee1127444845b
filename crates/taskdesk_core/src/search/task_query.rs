//! Composite task query engine.
//!
//! # Responsibility
//! - Filter tasks by category, title fragment, completion and priority title.
//! - Join task references into read rows for display.
//!
//! # Invariants
//! - Active criteria are combined with AND; absent or empty ones are no-ops.
//! - Results keep the store's insertion order.
//! - Queries never fail; unknown ids or titles yield an empty result.

use crate::model::category::{Category, CategoryId};
use crate::model::priority::Priority;
use crate::model::task::Task;
use crate::model::validation::title_contains;
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};

/// Composite task search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Keep only tasks in this category. `None` means all tasks, including
    /// uncategorized ones.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of the task title.
    pub title_fragment: Option<String>,
    pub completed: Option<bool>,
    /// Exact, case-sensitive priority title.
    pub priority_title: Option<String>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category: &Category) -> Self {
        self.category_id = Some(category.id);
        self
    }

    pub fn with_category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_title(mut self, fragment: impl Into<String>) -> Self {
        self.title_fragment = Some(fragment.into());
        self
    }

    pub fn with_completed(mut self, completed: Option<bool>) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_priority_title(mut self, title: impl Into<String>) -> Self {
        self.priority_title = Some(title.into());
        self
    }

    /// Returns `true` when no criterion would filter anything.
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && active_text(&self.title_fragment).is_none()
            && self.completed.is_none()
            && active_text(&self.priority_title).is_none()
    }

    fn matches(&self, store: &EntityStore, task: &Task) -> bool {
        if let Some(category_id) = self.category_id {
            if task.category_id != Some(category_id) {
                return false;
            }
        }

        if let Some(fragment) = active_text(&self.title_fragment) {
            if !title_contains(&task.title, fragment) {
                return false;
            }
        }

        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }

        if let Some(priority_title) = active_text(&self.priority_title) {
            let matched = task
                .priority_id
                .and_then(|id| store.priority(id))
                .is_some_and(|priority| priority.title == priority_title);
            if !matched {
                return false;
            }
        }

        true
    }
}

fn active_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Returns tasks matching every active criterion, in store order.
pub fn search_tasks(store: &EntityStore, query: &TaskQuery) -> Vec<Task> {
    store
        .tasks()
        .iter()
        .filter(|task| query.matches(store, task))
        .cloned()
        .collect()
}

/// Counts tasks matching `query` without cloning them.
pub fn count_tasks(store: &EntityStore, query: &TaskQuery) -> usize {
    store
        .tasks()
        .iter()
        .filter(|task| query.matches(store, task))
        .count()
}

/// Task joined with its referenced records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub task: Task,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

/// Resolves category/priority ids against the store.
///
/// A dangling id joins to `None`.
pub fn join_tasks(store: &EntityStore, tasks: Vec<Task>) -> Vec<TaskRow> {
    tasks
        .into_iter()
        .map(|task| {
            let category = task.category_id.and_then(|id| store.category(id)).cloned();
            let priority = task.priority_id.and_then(|id| store.priority(id)).cloned();
            TaskRow {
                task,
                category,
                priority,
            }
        })
        .collect()
}
