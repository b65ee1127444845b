//! Sorted, paginated projections over query results.
//!
//! # Responsibility
//! - Derive per-column sort keys from joined task rows.
//! - Slice sorted rows into pages without touching stored data.
//! - Provide display helpers (row color, relative due label).
//!
//! # Invariants
//! - Sorting is stable in both directions.
//! - Absent values sort before present ones in ascending order.

pub mod display;
pub mod page;
pub mod sort;
pub mod table;
