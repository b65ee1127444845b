//! Category record.

use super::validation::{validated_title, ValidationError};
use super::EntityId;
use serde::{Deserialize, Serialize};

/// Category identity.
pub type CategoryId = EntityId;

/// Named grouping for tasks. Tasks reference categories by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

impl Category {
    pub fn new(id: CategoryId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Returns a copy with a normalized title, or a validation error.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            title: validated_title(&self.title)?,
        })
    }
}
