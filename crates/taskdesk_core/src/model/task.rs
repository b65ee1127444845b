//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its create payload.
//! - Provide completion helpers used by the complete/activate flows.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `category_id` / `priority_id` are weak references: the task never owns
//!   the referenced record and the store detaches them on delete.
//! - `date` has day granularity only.

use super::category::CategoryId;
use super::priority::PriorityId;
use super::validation::{validated_title, ValidationError};
use super::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task identity.
pub type TaskId = EntityId;

/// Canonical task record.
///
/// Absent references serialize as `null`, so a persisted record keeps the
/// difference between "no category" and "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Optional due date.
    pub date: Option<NaiveDate>,
    pub completed: bool,
    pub priority_id: Option<PriorityId>,
    pub category_id: Option<CategoryId>,
}

impl Task {
    /// Returns a copy with a normalized title, or a validation error.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let mut task = self.clone();
        task.title = validated_title(&self.title)?;
        Ok(task)
    }

    /// Flips completion state and returns the new value.
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Task payload without identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub date: Option<NaiveDate>,
    /// Defaults to `false`.
    pub completed: bool,
    pub priority_id: Option<PriorityId>,
    pub category_id: Option<CategoryId>,
}

impl NewTask {
    /// Creates an active task draft with no date or references.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_priority(mut self, priority_id: PriorityId) -> Self {
        self.priority_id = Some(priority_id);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Attaches an id and validates the resulting record.
    pub fn into_task(self, id: TaskId) -> Result<Task, ValidationError> {
        Task {
            id,
            title: self.title,
            date: self.date,
            completed: self.completed,
            priority_id: self.priority_id,
            category_id: self.category_id,
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::NewTask;
    use crate::model::validation::ValidationError;

    #[test]
    fn new_task_defaults_to_active_without_references() {
        let task = NewTask::new("  Pay   bills ").into_task(7).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Pay bills");
        assert!(!task.completed);
        assert!(task.category_id.is_none());
        assert!(task.priority_id.is_none());
        assert!(task.date.is_none());
    }

    #[test]
    fn empty_title_fails_validation() {
        let err = NewTask::new("   ").into_task(1).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn absent_references_serialize_as_null() {
        let task = NewTask::new("x").with_category(3).into_task(1).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["category_id"], serde_json::json!(3));
        assert!(json["priority_id"].is_null());
        assert!(json.as_object().unwrap().contains_key("priority_id"));
        assert!(json["date"].is_null());
    }

    #[test]
    fn toggle_flips_completion() {
        let mut task = NewTask::new("x").into_task(1).unwrap();
        assert!(task.toggle_completed());
        assert!(!task.toggle_completed());
    }
}
