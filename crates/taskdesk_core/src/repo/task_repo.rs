//! Task repository.
//!
//! # Responsibility
//! - Provide CRUD over tasks with id allocation and validation.
//! - Reject writes that reference categories/priorities absent from the store.
//!
//! # Invariants
//! - `update` keeps the task's position in insertion order.
//! - Ids are never reissued after delete.

use super::{RepoError, RepoResult, Repository};
use crate::model::task::{NewTask, Task, TaskId};
use crate::model::validation::title_contains;
use crate::model::EntityKind;
use crate::store::EntityStore;
use log::{info, warn};

pub struct TaskRepository<'store> {
    store: &'store mut EntityStore,
}

impl<'store> TaskRepository<'store> {
    pub fn new(store: &'store mut EntityStore) -> Self {
        Self { store }
    }

    /// Sets the completion flag (complete/activate flows) and returns the task.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> RepoResult<Task> {
        let mut task = self.get(id)?;
        task.completed = completed;
        self.update(task)
    }

    /// Flips the completion flag and returns the updated task.
    pub fn toggle_completed(&mut self, id: TaskId) -> RepoResult<Task> {
        let mut task = self.get(id)?;
        task.toggle_completed();
        self.update(task)
    }

    fn check_references(&self, task: &Task) -> RepoResult<()> {
        check_task_references(self.store, task)
    }
}

/// Verifies that a task's category/priority ids point at live records.
pub(crate) fn check_task_references(store: &EntityStore, task: &Task) -> RepoResult<()> {
    if let Some(category_id) = task.category_id {
        if store.category(category_id).is_none() {
            warn!(
                "event=task_reference_check module=repo status=error task_id={} error_code=missing_category category_id={category_id}",
                task.id
            );
            return Err(RepoError::Referential {
                kind: EntityKind::Category,
                id: category_id,
            });
        }
    }
    if let Some(priority_id) = task.priority_id {
        if store.priority(priority_id).is_none() {
            warn!(
                "event=task_reference_check module=repo status=error task_id={} error_code=missing_priority priority_id={priority_id}",
                task.id
            );
            return Err(RepoError::Referential {
                kind: EntityKind::Priority,
                id: priority_id,
            });
        }
    }
    Ok(())
}

impl Repository for TaskRepository<'_> {
    type Entity = Task;
    type Draft = NewTask;

    fn get(&self, id: TaskId) -> RepoResult<Task> {
        self.store
            .task(id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(EntityKind::Task, id))
    }

    fn get_all(&self) -> Vec<Task> {
        self.store.tasks().to_vec()
    }

    fn add(&mut self, draft: NewTask) -> RepoResult<Task> {
        let candidate = draft.clone().into_task(0)?;
        self.check_references(&candidate)?;

        let id = self.store.allocate_task_id();
        let task = draft.into_task(id)?;
        self.store.insert_task(task.clone());
        info!("event=task_add module=repo status=ok task_id={id}");
        Ok(task)
    }

    fn update(&mut self, task: Task) -> RepoResult<Task> {
        let id = task.id;
        if self.store.task(id).is_none() {
            return Err(RepoError::not_found(EntityKind::Task, id));
        }
        let task = task.validated()?;
        self.check_references(&task)?;

        self.store
            .replace_task(task.clone())
            .ok_or_else(|| RepoError::not_found(EntityKind::Task, id))?;
        info!(
            "event=task_update module=repo status=ok task_id={id} completed={}",
            task.completed
        );
        Ok(task)
    }

    fn delete(&mut self, id: TaskId) -> RepoResult<Task> {
        let removed = self
            .store
            .remove_task(id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Task, id))?;
        info!("event=task_delete module=repo status=ok task_id={id}");
        Ok(removed)
    }

    fn search(&self, title: &str) -> Vec<Task> {
        self.store
            .tasks()
            .iter()
            .filter(|task| title_contains(&task.title, title))
            .cloned()
            .collect()
    }
}
