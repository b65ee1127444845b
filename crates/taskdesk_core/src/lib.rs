//! Core domain logic for TaskDesk.
//! This crate is the single source of truth for task/category/priority
//! invariants, the composite task query and the sorted, paged task table.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::priority::{NewPriority, Priority, PriorityId};
pub use model::task::{NewTask, Task, TaskId};
pub use model::validation::ValidationError;
pub use model::{EntityId, EntityKind};
pub use repo::category_repo::CategoryRepository;
pub use repo::priority_repo::PriorityRepository;
pub use repo::task_repo::TaskRepository;
pub use repo::{RepoError, RepoResult, Repository};
pub use search::task_query::{count_tasks, join_tasks, search_tasks, TaskQuery, TaskRow};
pub use service::todo_service::TodoService;
pub use store::{EntityStore, IdCounters};
pub use view::display::{display_color, due_label, DueLabel};
pub use view::page::{paginate, Page, PageRequest};
pub use view::sort::{SortColumn, SortDirection, SortState};
pub use view::table::TaskTable;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
