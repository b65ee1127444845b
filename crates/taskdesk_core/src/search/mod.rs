//! Task query entry points.
//!
//! # Responsibility
//! - Answer composite task searches over the entity store.
//! - Join task references into display rows at read time.

pub mod task_query;
