//! Domain model for tasks, categories and priorities.
//!
//! # Responsibility
//! - Define canonical records owned by the entity store.
//! - Keep task references as plain ids; joins happen at read time.
//!
//! # Invariants
//! - Every record is identified by a stable integer id, unique per collection.
//! - Titles are normalized and non-empty after create/update.

pub mod category;
pub mod priority;
pub mod task;
pub mod validation;

/// Integer identity shared by all entity kinds.
pub type EntityId = u64;

/// Entity kind tag used by error reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    Category,
    Priority,
}

impl EntityKind {
    /// Stable lowercase name used in log lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Category => "category",
            Self::Priority => "priority",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
