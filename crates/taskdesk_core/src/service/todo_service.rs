//! Asynchronous task-tracking facade.
//!
//! # Responsibility
//! - Provide value-or-error `async` entry points for every list, search and
//!   CRUD use-case, so a remote store can replace the in-memory one without
//!   changing callers.
//! - Route all mutation through repositories.
//!
//! # Invariants
//! - Each store operation holds the store lock from start to finish, so
//!   operations run to completion in the order they acquire the lock.
//! - Snapshot file I/O runs on the blocking pool without the lock held;
//!   only the copy-out and the swap-in take it.
//! - Dropping a pending future before it acquires the lock leaves the store
//!   untouched.

use crate::config::CoreConfig;
use crate::db::SnapshotDb;
use crate::model::category::{Category, CategoryId};
use crate::model::priority::{NewPriority, Priority, PriorityId};
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::priority_repo::PriorityRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult, Repository};
use crate::search::task_query::{count_tasks, join_tasks, search_tasks, TaskQuery, TaskRow};
use crate::store::EntityStore;
use crate::view::page::{paginate, Page, PageRequest};
use crate::view::sort::{sort_rows, SortState};
use log::{debug, info, warn};
use std::path::Path;
use tokio::sync::Mutex;

pub struct TodoService {
    store: Mutex<EntityStore>,
    page_size: usize,
}

impl TodoService {
    /// Creates a service over an explicitly constructed store.
    pub fn new(store: EntityStore) -> Self {
        Self {
            store: Mutex::new(store),
            page_size: PageRequest::default().page_size,
        }
    }

    /// Builds the initial store from config.
    ///
    /// Loading order: existing snapshot at `db_path`, then demo seed, then
    /// an empty store.
    pub fn from_config(config: &CoreConfig) -> RepoResult<Self> {
        let store = match config.db_path.as_deref() {
            Some(path) if path.exists() => SnapshotDb::open(path)?.load()?,
            _ if config.seed_demo_data => EntityStore::with_demo_data(),
            _ => EntityStore::new(),
        };
        info!(
            "event=service_init module=service status=ok tasks={} categories={} priorities={}",
            store.tasks().len(),
            store.categories().len(),
            store.priorities().len()
        );

        let mut service = Self::new(store);
        service.page_size = config.page_size.max(1);
        Ok(service)
    }

    /// Configured default page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut store = self.store.lock().await;
        Ok(CategoryRepository::new(&mut store).get_all())
    }

    pub async fn list_priorities(&self) -> RepoResult<Vec<Priority>> {
        let mut store = self.store.lock().await;
        Ok(PriorityRepository::new(&mut store).get_all())
    }

    pub async fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut store = self.store.lock().await;
        Ok(TaskRepository::new(&mut store).get_all())
    }

    pub async fn get_task(&self, id: TaskId) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged("task_get", TaskRepository::new(&mut store).get(id))
    }

    pub async fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        let mut store = self.store.lock().await;
        logged("category_get", CategoryRepository::new(&mut store).get(id))
    }

    pub async fn get_priority(&self, id: PriorityId) -> RepoResult<Priority> {
        let mut store = self.store.lock().await;
        logged("priority_get", PriorityRepository::new(&mut store).get(id))
    }

    /// Composite search; never fails on unknown criteria.
    pub async fn search_tasks(&self, query: &TaskQuery) -> RepoResult<Vec<Task>> {
        let store = self.store.lock().await;
        let tasks = search_tasks(&store, query);
        debug!(
            "event=task_search module=service status=ok criteria_active={} results={}",
            !query.is_empty(),
            tasks.len()
        );
        Ok(tasks)
    }

    pub async fn count_tasks(&self, query: &TaskQuery) -> RepoResult<usize> {
        let store = self.store.lock().await;
        Ok(count_tasks(&store, query))
    }

    /// Query, join, sort and page in one consistent read.
    pub async fn task_table(
        &self,
        query: &TaskQuery,
        sort: Option<SortState>,
        page: PageRequest,
    ) -> RepoResult<Page<TaskRow>> {
        let store = self.store.lock().await;
        let mut rows = join_tasks(&store, search_tasks(&store, query));
        if let Some(state) = sort {
            sort_rows(&mut rows, state);
        }
        Ok(paginate(&rows, page))
    }

    pub async fn create_task(&self, task: NewTask) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged("task_create", TaskRepository::new(&mut store).add(task))
    }

    pub async fn update_task(&self, task: Task) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged("task_update", TaskRepository::new(&mut store).update(task))
    }

    pub async fn delete_task(&self, id: TaskId) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged("task_delete", TaskRepository::new(&mut store).delete(id))
    }

    pub async fn toggle_task_completed(&self, id: TaskId) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged(
            "task_toggle",
            TaskRepository::new(&mut store).toggle_completed(id),
        )
    }

    pub async fn set_task_completed(&self, id: TaskId, completed: bool) -> RepoResult<Task> {
        let mut store = self.store.lock().await;
        logged(
            "task_set_completed",
            TaskRepository::new(&mut store).set_completed(id, completed),
        )
    }

    pub async fn create_category(&self, title: impl Into<String>) -> RepoResult<Category> {
        let title = title.into();
        let mut store = self.store.lock().await;
        logged(
            "category_create",
            CategoryRepository::new(&mut store).add(title),
        )
    }

    pub async fn update_category(&self, category: Category) -> RepoResult<Category> {
        let mut store = self.store.lock().await;
        logged(
            "category_update",
            CategoryRepository::new(&mut store).update(category),
        )
    }

    /// Deletes a category; referencing tasks survive uncategorized.
    pub async fn delete_category(&self, id: CategoryId) -> RepoResult<Category> {
        let mut store = self.store.lock().await;
        logged(
            "category_delete",
            CategoryRepository::new(&mut store).delete(id),
        )
    }

    pub async fn search_categories(&self, title: &str) -> RepoResult<Vec<Category>> {
        let mut store = self.store.lock().await;
        Ok(CategoryRepository::new(&mut store).search(title))
    }

    pub async fn create_priority(&self, priority: NewPriority) -> RepoResult<Priority> {
        let mut store = self.store.lock().await;
        logged(
            "priority_create",
            PriorityRepository::new(&mut store).add(priority),
        )
    }

    pub async fn update_priority(&self, priority: Priority) -> RepoResult<Priority> {
        let mut store = self.store.lock().await;
        logged(
            "priority_update",
            PriorityRepository::new(&mut store).update(priority),
        )
    }

    /// Deletes a priority; referencing tasks survive without priority.
    pub async fn delete_priority(&self, id: PriorityId) -> RepoResult<Priority> {
        let mut store = self.store.lock().await;
        logged(
            "priority_delete",
            PriorityRepository::new(&mut store).delete(id),
        )
    }

    pub async fn search_priorities(&self, title: &str) -> RepoResult<Vec<Priority>> {
        let mut store = self.store.lock().await;
        Ok(PriorityRepository::new(&mut store).search(title))
    }

    /// Writes the current store to a SQLite snapshot file.
    ///
    /// The store is copied under the lock and written on the blocking pool,
    /// so other operations proceed while the file is written.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> RepoResult<()> {
        let snapshot = self.store.lock().await.clone();
        let path = path.as_ref().to_path_buf();
        let written = run_blocking("snapshot_save", move || {
            SnapshotDb::open(&path)?.save(&snapshot)?;
            Ok(snapshot.tasks().len())
        })
        .await?;
        debug!("event=snapshot_save module=service status=ok tasks={written}");
        Ok(())
    }

    /// Replaces the current store with a snapshot file's contents.
    ///
    /// The file is read on the blocking pool and swapped in under the lock
    /// afterwards. The current store is kept when the snapshot fails to load.
    pub async fn load_snapshot(&self, path: impl AsRef<Path>) -> RepoResult<()> {
        let path = path.as_ref().to_path_buf();
        let loaded = run_blocking("snapshot_load", move || {
            SnapshotDb::open(&path)?.load()
        })
        .await?;
        *self.store.lock().await = loaded;
        Ok(())
    }
}

/// Runs synchronous SQLite work off the async executor.
async fn run_blocking<T, F>(event: &'static str, work: F) -> RepoResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RepoResult<T> + Send + 'static,
{
    let result = match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(err) => Err(RepoError::Worker(format!(
            "{event} worker did not complete: {err}"
        ))),
    };
    logged(event, result)
}

fn logged<T>(event: &str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        warn!(
            "event={event} module=service status=error error_code={}",
            err.code()
        );
    }
    result
}

