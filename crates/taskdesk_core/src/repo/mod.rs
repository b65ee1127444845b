//! Repository layer over the entity store.
//!
//! # Responsibility
//! - Define the shared CRUD contract implemented per entity kind.
//! - Enforce identity, validation and referential-cleanup invariants.
//!
//! # Invariants
//! - Write paths validate before touching the store.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`,
//!   `Referential`) instead of silently ignoring bad input.
//! - Deleting a category or priority detaches it from tasks; tasks are
//!   never deleted as a side effect.

pub mod category_repo;
pub mod priority_repo;
pub mod task_repo;

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::{EntityId, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for store mutation, lookup and snapshot import.
#[derive(Debug)]
pub enum RepoError {
    /// Referenced id is absent from its collection.
    NotFound { kind: EntityKind, id: EntityId },
    /// Payload fails structural invariants.
    Validation(ValidationError),
    /// A task points at a category/priority id that is not in the store.
    Referential { kind: EntityKind, id: EntityId },
    /// Snapshot storage failure.
    Db(DbError),
    /// Persisted snapshot rows cannot be decoded.
    InvalidData(String),
    /// Blocking snapshot worker panicked or was cancelled.
    Worker(String),
}

impl RepoError {
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Short stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Referential { .. } => "referential",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
            Self::Worker(_) => "worker",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Referential { kind, id } => {
                write!(f, "task references missing {kind}: {id}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid snapshot data: {message}"),
            Self::Worker(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Referential { .. } => None,
            Self::InvalidData(_) => None,
            Self::Worker(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by task, category and priority repositories.
pub trait Repository {
    /// Stored record type.
    type Entity;
    /// Create payload (record without id).
    type Draft;

    fn get(&self, id: EntityId) -> RepoResult<Self::Entity>;
    /// Snapshot of all records in insertion order.
    fn get_all(&self) -> Vec<Self::Entity>;
    /// Assigns the next id, appends and returns the stored record.
    fn add(&mut self, draft: Self::Draft) -> RepoResult<Self::Entity>;
    /// Replaces the record with the same id in place.
    fn update(&mut self, entity: Self::Entity) -> RepoResult<Self::Entity>;
    /// Removes the record, detaching dependents, and returns it.
    fn delete(&mut self, id: EntityId) -> RepoResult<Self::Entity>;
    /// Case-insensitive substring match on title.
    fn search(&self, title: &str) -> Vec<Self::Entity>;
}
