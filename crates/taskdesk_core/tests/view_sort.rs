use chrono::NaiveDate;
use taskdesk_core::{
    join_tasks, paginate, search_tasks, EntityStore, NewTask, PageRequest, Repository,
    SortColumn, SortState, TaskQuery, TaskRepository, TaskRow, TaskTable,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rows_with_dates(dates: &[Option<NaiveDate>]) -> Vec<TaskRow> {
    let mut store = EntityStore::new();
    {
        let mut repo = TaskRepository::new(&mut store);
        for (index, due) in dates.iter().enumerate() {
            let mut draft = NewTask::new(format!("task {index}"));
            draft.date = *due;
            repo.add(draft).unwrap();
        }
    }
    join_tasks(&store, search_tasks(&store, &TaskQuery::new()))
}

fn ids(rows: &[TaskRow]) -> Vec<u64> {
    rows.iter().map(|row| row.task.id).collect()
}

#[test]
fn null_dates_sort_first_and_keep_relative_order() {
    let rows = rows_with_dates(&[
        None,
        Some(date(2024, 1, 1)),
        None,
        Some(date(2023, 5, 5)),
    ]);
    let mut table = TaskTable::new(rows, PageRequest::first(10));
    table.set_sort(Some(SortState::asc(SortColumn::Date)));

    assert_eq!(ids(table.sorted()), vec![1, 3, 4, 2]);
}

#[test]
fn descending_date_puts_nulls_last() {
    let rows = rows_with_dates(&[
        None,
        Some(date(2024, 1, 1)),
        None,
        Some(date(2023, 5, 5)),
    ]);
    let mut table = TaskTable::new(rows, PageRequest::first(10));
    table.set_sort(Some(SortState::desc(SortColumn::Date)));

    assert_eq!(ids(table.sorted()), vec![2, 4, 1, 3]);
}

#[test]
fn priority_sorts_by_priority_id_with_nulls_first() {
    let store = EntityStore::with_demo_data();
    let rows = join_tasks(&store, search_tasks(&store, &TaskQuery::new()));
    let mut table = TaskTable::new(rows, PageRequest::first(50));
    table.set_sort(Some(SortState::asc(SortColumn::Priority)));

    let keys: Vec<_> = table
        .sorted()
        .iter()
        .map(|row| row.priority.as_ref().map(|p| p.id))
        .collect();
    let mut expected = keys.clone();
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(keys.first(), Some(&None));
}

#[test]
fn title_sort_is_lexicographic() {
    let mut store = EntityStore::new();
    {
        let mut repo = TaskRepository::new(&mut store);
        for title in ["banana", "Apple", "cherry"] {
            repo.add(NewTask::new(title)).unwrap();
        }
    }
    let rows = join_tasks(&store, search_tasks(&store, &TaskQuery::new()));
    let mut table = TaskTable::new(rows, PageRequest::first(10));
    table.toggle_sort(SortColumn::Title);

    let titles: Vec<_> = table.sorted().iter().map(|r| r.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
}

#[test]
fn pages_slice_sorted_rows_without_mutating_them() {
    let rows = rows_with_dates(&[None; 7]);
    let mut table = TaskTable::new(rows, PageRequest::first(3));
    table.set_sort(Some(SortState::desc(SortColumn::Id)));

    table.set_page_index(1);
    let page = table.page();
    assert_eq!(ids(&page.items), vec![4, 3, 2]);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.total, 7);

    let again = paginate(table.sorted(), PageRequest::new(1, 3));
    assert_eq!(again, page);
    assert_eq!(table.sorted().len(), 7);
}
