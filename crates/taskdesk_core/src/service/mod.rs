//! Core use-case services.
//!
//! # Responsibility
//! - Expose the asynchronous boundary consumed by presentation layers.
//! - Keep callers decoupled from store and repository details.

pub mod todo_service;
