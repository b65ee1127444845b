//! Priority repository.
//!
//! Priority deletion follows the category policy: referencing tasks keep
//! existing and lose their priority.

use super::{RepoError, RepoResult, Repository};
use crate::model::priority::{NewPriority, Priority, PriorityId};
use crate::model::validation::title_contains;
use crate::model::EntityKind;
use crate::store::EntityStore;
use log::info;

pub struct PriorityRepository<'store> {
    store: &'store mut EntityStore,
}

impl<'store> PriorityRepository<'store> {
    pub fn new(store: &'store mut EntityStore) -> Self {
        Self { store }
    }
}

impl Repository for PriorityRepository<'_> {
    type Entity = Priority;
    type Draft = NewPriority;

    fn get(&self, id: PriorityId) -> RepoResult<Priority> {
        self.store
            .priority(id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(EntityKind::Priority, id))
    }

    fn get_all(&self) -> Vec<Priority> {
        self.store.priorities().to_vec()
    }

    fn add(&mut self, draft: NewPriority) -> RepoResult<Priority> {
        // Rejected payloads must not consume an id.
        draft.clone().into_priority(0)?;
        let id = self.store.allocate_priority_id();
        let priority = draft.into_priority(id)?;
        self.store.insert_priority(priority.clone());
        info!("event=priority_add module=repo status=ok priority_id={id}");
        Ok(priority)
    }

    fn update(&mut self, priority: Priority) -> RepoResult<Priority> {
        let id = priority.id;
        if self.store.priority(id).is_none() {
            return Err(RepoError::not_found(EntityKind::Priority, id));
        }
        let priority = priority.validated()?;
        self.store
            .replace_priority(priority.clone())
            .ok_or_else(|| RepoError::not_found(EntityKind::Priority, id))?;
        info!("event=priority_update module=repo status=ok priority_id={id}");
        Ok(priority)
    }

    fn delete(&mut self, id: PriorityId) -> RepoResult<Priority> {
        if self.store.priority(id).is_none() {
            return Err(RepoError::not_found(EntityKind::Priority, id));
        }

        let detached = self.store.detach_priority(id);
        let removed = self
            .store
            .remove_priority(id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Priority, id))?;
        info!(
            "event=priority_delete module=repo status=ok priority_id={id} detached_tasks={}",
            detached.len()
        );
        Ok(removed)
    }

    fn search(&self, title: &str) -> Vec<Priority> {
        self.store
            .priorities()
            .iter()
            .filter(|priority| title_contains(&priority.title, title))
            .cloned()
            .collect()
    }
}
