use taskdesk_core::{
    join_tasks, search_tasks, Category, CategoryRepository, EntityStore, NewPriority, NewTask,
    PriorityRepository, Repository, Task, TaskQuery, TaskRepository,
};

struct Fixture {
    store: EntityStore,
    home: Category,
    a: Task,
    b: Task,
    c: Task,
}

/// A(Buy milk, active, Home), B(Buy bread, done, Home), C(Pay bills, active, none).
fn fixture() -> Fixture {
    let mut store = EntityStore::new();
    let home = CategoryRepository::new(&mut store)
        .add("Home".to_string())
        .unwrap();
    let high = PriorityRepository::new(&mut store)
        .add(NewPriority::new("High", "#F1828D"))
        .unwrap();

    let mut tasks = TaskRepository::new(&mut store);
    let a = tasks
        .add(NewTask::new("Buy milk").with_category(home.id).with_priority(high.id))
        .unwrap();
    let b = tasks
        .add(NewTask::new("Buy bread").with_category(home.id).completed(true))
        .unwrap();
    let c = tasks.add(NewTask::new("Pay bills")).unwrap();

    Fixture {
        store,
        home,
        a,
        b,
        c,
    }
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|task| task.id).collect()
}

#[test]
fn all_criteria_are_combined_with_and() {
    let f = fixture();
    let query = TaskQuery::new()
        .in_category(&f.home)
        .with_title("buy")
        .with_completed(Some(false));

    assert_eq!(ids(&search_tasks(&f.store, &query)), vec![f.a.id]);
}

#[test]
fn null_category_includes_uncategorized_tasks() {
    let f = fixture();
    let result = search_tasks(&f.store, &TaskQuery::new().with_completed(Some(false)));
    assert_eq!(ids(&result), vec![f.a.id, f.c.id]);
}

#[test]
fn completed_filter_keeps_only_matching_status() {
    let f = fixture();
    let done = search_tasks(&f.store, &TaskQuery::new().with_completed(Some(true)));
    assert_eq!(ids(&done), vec![f.b.id]);

    let both = search_tasks(&f.store, &TaskQuery::new().with_completed(None));
    assert_eq!(ids(&both), vec![f.a.id, f.b.id, f.c.id]);
}

#[test]
fn priority_filter_is_exact_and_case_sensitive() {
    let f = fixture();
    let exact = search_tasks(&f.store, &TaskQuery::new().with_priority_title("High"));
    assert_eq!(ids(&exact), vec![f.a.id]);

    let lower = search_tasks(&f.store, &TaskQuery::new().with_priority_title("high"));
    assert!(lower.is_empty());

    let partial = search_tasks(&f.store, &TaskQuery::new().with_priority_title("Hi"));
    assert!(partial.is_empty());
}

#[test]
fn repeated_search_is_idempotent() {
    let f = fixture();
    let query = TaskQuery::new().with_title("l");
    let first = search_tasks(&f.store, &query);
    let second = search_tasks(&f.store, &query);
    assert_eq!(first, second);
    assert_eq!(ids(&first), vec![f.a.id, f.c.id]);
}

#[test]
fn deleted_category_no_longer_matches_but_tasks_remain_searchable() {
    let mut f = fixture();
    CategoryRepository::new(&mut f.store)
        .delete(f.home.id)
        .unwrap();

    let by_home = search_tasks(&f.store, &TaskQuery::new().in_category(&f.home));
    assert!(by_home.is_empty());

    let by_title = search_tasks(&f.store, &TaskQuery::new().with_title("buy"));
    assert_eq!(ids(&by_title), vec![f.a.id, f.b.id]);
    assert!(by_title.iter().all(|task| task.category_id.is_none()));
}

#[test]
fn search_reflects_updates_immediately() {
    let mut f = fixture();
    let mut edited = f.c.clone();
    edited.title = "Buy stamps".to_string();
    TaskRepository::new(&mut f.store).update(edited).unwrap();

    let result = search_tasks(&f.store, &TaskQuery::new().with_title("BUY"));
    assert_eq!(ids(&result), vec![f.a.id, f.b.id, f.c.id]);
}

#[test]
fn join_resolves_references_at_read_time() {
    let mut f = fixture();
    let mut renamed = f.home.clone();
    renamed.title = "House".to_string();
    CategoryRepository::new(&mut f.store)
        .update(renamed)
        .unwrap();

    let rows = join_tasks(&f.store, search_tasks(&f.store, &TaskQuery::new()));
    assert_eq!(rows[0].category.as_ref().map(|c| c.title.as_str()), Some("House"));
    assert_eq!(rows[0].priority.as_ref().map(|p| p.title.as_str()), Some("High"));
    assert!(rows[2].category.is_none());
    assert!(rows[2].priority.is_none());
}
