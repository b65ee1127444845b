//! Structural validation shared by all entity kinds.
//!
//! # Invariants
//! - Normalization never changes non-whitespace characters.
//! - A title that is empty after normalization is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Validation failure for create/update payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Priority color token is empty.
    EmptyColor,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyColor => write!(f, "priority color must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a title and collapses inner whitespace runs to a single space.
pub fn normalize_title(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Normalizes `raw` and rejects empty results.
pub fn validated_title(raw: &str) -> Result<String, ValidationError> {
    let title = normalize_title(raw);
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title)
}

/// Case-insensitive substring match used by title searches.
///
/// An empty fragment matches everything.
pub fn title_contains(title: &str, fragment: &str) -> bool {
    if fragment.is_empty() {
        return true;
    }
    title.to_lowercase().contains(&fragment.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, title_contains, validated_title, ValidationError};

    #[test]
    fn normalize_collapses_inner_whitespace() {
        assert_eq!(normalize_title("  buy \t milk\n now "), "buy milk now");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(validated_title(" \n\t "), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn contains_ignores_case() {
        assert!(title_contains("Buy Milk", "mILK"));
        assert!(!title_contains("Buy Milk", "bread"));
        assert!(title_contains("anything", ""));
    }
}
