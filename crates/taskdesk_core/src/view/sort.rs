//! Column sort keys and stable row sorting.

use crate::model::priority::PriorityId;
use crate::search::task_query::TaskRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sortable task table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Id,
    Title,
    Date,
    Priority,
    Category,
    Completed,
}

impl SortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Date => "date",
            Self::Priority => "priority",
            Self::Category => "category",
            Self::Completed => "completed",
        }
    }
}

/// Column name did not match any sortable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl Display for UnknownColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort column `{}`; expected id|title|date|priority|category|completed",
            self.0
        )
    }
}

impl Error for UnknownColumn {}

impl FromStr for SortColumn {
    type Err = UnknownColumn;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "date" => Ok(Self::Date),
            "priority" => Ok(Self::Priority),
            "category" => Ok(Self::Category),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// Same column flips direction; a different column starts ascending.
    pub fn toggled(current: Option<Self>, column: SortColumn) -> Self {
        match current {
            Some(state) if state.column == column => Self {
                column,
                direction: state.direction.flipped(),
            },
            _ => Self::asc(column),
        }
    }
}

/// Comparison key derived from one row for one column.
///
/// `Option` orders `None` first, which is the null policy for every
/// reference-derived column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Id(u64),
    Title(&'a str),
    Date(Option<NaiveDate>),
    Priority(Option<PriorityId>),
    Category(Option<&'a str>),
    Completed(bool),
}

pub fn sort_key(row: &TaskRow, column: SortColumn) -> SortKey<'_> {
    match column {
        SortColumn::Id => SortKey::Id(row.task.id),
        SortColumn::Title => SortKey::Title(row.task.title.as_str()),
        SortColumn::Date => SortKey::Date(row.task.date),
        SortColumn::Priority => SortKey::Priority(row.priority.as_ref().map(|p| p.id)),
        SortColumn::Category => {
            SortKey::Category(row.category.as_ref().map(|c| c.title.as_str()))
        }
        SortColumn::Completed => SortKey::Completed(row.task.completed),
    }
}

pub fn compare_rows(left: &TaskRow, right: &TaskRow, state: SortState) -> Ordering {
    let ordering = sort_key(left, state.column).cmp(&sort_key(right, state.column));
    match state.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable in-place sort; equal keys keep their prior relative order.
pub fn sort_rows(rows: &mut [TaskRow], state: SortState) {
    rows.sort_by(|left, right| compare_rows(left, right, state));
}

#[cfg(test)]
mod tests {
    use super::{sort_rows, SortColumn, SortDirection, SortState};
    use crate::model::category::Category;
    use crate::model::task::Task;
    use crate::search::task_query::TaskRow;

    fn row(id: u64, title: &str, category: Option<&str>) -> TaskRow {
        TaskRow {
            task: Task {
                id,
                title: title.to_string(),
                date: None,
                completed: false,
                priority_id: None,
                category_id: category.map(|_| id),
            },
            category: category.map(|title| Category::new(id, title)),
            priority: None,
        }
    }

    fn ids(rows: &[TaskRow]) -> Vec<u64> {
        rows.iter().map(|row| row.task.id).collect()
    }

    #[test]
    fn parses_column_names() {
        assert_eq!("Category".parse::<SortColumn>().unwrap(), SortColumn::Category);
        assert!("color".parse::<SortColumn>().is_err());
    }

    #[test]
    fn toggle_flips_same_column_and_resets_new_column() {
        let first = SortState::toggled(None, SortColumn::Title);
        assert_eq!(first.direction, SortDirection::Asc);
        let second = SortState::toggled(Some(first), SortColumn::Title);
        assert_eq!(second.direction, SortDirection::Desc);
        let third = SortState::toggled(Some(second), SortColumn::Date);
        assert_eq!(third, SortState::asc(SortColumn::Date));
    }

    #[test]
    fn category_nulls_first_ascending_and_last_descending() {
        let mut rows = vec![
            row(1, "a", Some("Work")),
            row(2, "b", None),
            row(3, "c", Some("Home")),
            row(4, "d", None),
        ];

        sort_rows(&mut rows, SortState::asc(SortColumn::Category));
        assert_eq!(ids(&rows), vec![2, 4, 3, 1]);

        sort_rows(&mut rows, SortState::desc(SortColumn::Category));
        assert_eq!(ids(&rows), vec![1, 3, 2, 4]);
    }
}
