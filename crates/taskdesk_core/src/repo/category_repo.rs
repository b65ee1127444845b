//! Category repository.
//!
//! # Invariants
//! - Delete detaches the category from every task before removal.

use super::{RepoError, RepoResult, Repository};
use crate::model::category::{Category, CategoryId};
use crate::model::validation::{title_contains, validated_title};
use crate::model::EntityKind;
use crate::store::EntityStore;
use log::info;

pub struct CategoryRepository<'store> {
    store: &'store mut EntityStore,
}

impl<'store> CategoryRepository<'store> {
    pub fn new(store: &'store mut EntityStore) -> Self {
        Self { store }
    }
}

impl Repository for CategoryRepository<'_> {
    type Entity = Category;
    /// Categories are created from a title alone.
    type Draft = String;

    fn get(&self, id: CategoryId) -> RepoResult<Category> {
        self.store
            .category(id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))
    }

    fn get_all(&self) -> Vec<Category> {
        self.store.categories().to_vec()
    }

    fn add(&mut self, title: String) -> RepoResult<Category> {
        let title = validated_title(&title)?;
        let id = self.store.allocate_category_id();
        let category = Category::new(id, title);
        self.store.insert_category(category.clone());
        info!("event=category_add module=repo status=ok category_id={id}");
        Ok(category)
    }

    fn update(&mut self, category: Category) -> RepoResult<Category> {
        let id = category.id;
        if self.store.category(id).is_none() {
            return Err(RepoError::not_found(EntityKind::Category, id));
        }
        let category = category.validated()?;
        self.store
            .replace_category(category.clone())
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))?;
        info!("event=category_update module=repo status=ok category_id={id}");
        Ok(category)
    }

    fn delete(&mut self, id: CategoryId) -> RepoResult<Category> {
        if self.store.category(id).is_none() {
            return Err(RepoError::not_found(EntityKind::Category, id));
        }

        let detached = self.store.detach_category(id);
        let removed = self
            .store
            .remove_category(id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))?;
        info!(
            "event=category_delete module=repo status=ok category_id={id} detached_tasks={}",
            detached.len()
        );
        Ok(removed)
    }

    fn search(&self, title: &str) -> Vec<Category> {
        self.store
            .categories()
            .iter()
            .filter(|category| title_contains(&category.title, title))
            .cloned()
            .collect()
    }
}
