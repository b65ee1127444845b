//! Priority record.
//!
//! `color` is a display token owned by the presentation layer. Core passes it
//! through untouched apart from rejecting empty values.

use super::validation::{validated_title, ValidationError};
use super::EntityId;
use serde::{Deserialize, Serialize};

/// Priority identity. Also the numeric rank used by priority sorting.
pub type PriorityId = EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub title: String,
    pub color: String,
}

/// Priority payload without identity, used by create paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPriority {
    pub title: String,
    pub color: String,
}

impl NewPriority {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: color.into(),
        }
    }

    /// Attaches an id after validating title and color.
    pub fn into_priority(self, id: PriorityId) -> Result<Priority, ValidationError> {
        Priority {
            id,
            title: self.title,
            color: self.color,
        }
        .validated()
    }
}

impl Priority {
    /// Returns a copy with a normalized title, or a validation error.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let title = validated_title(&self.title)?;
        if self.color.trim().is_empty() {
            return Err(ValidationError::EmptyColor);
        }
        Ok(Self {
            id: self.id,
            title,
            color: self.color.clone(),
        })
    }
}
