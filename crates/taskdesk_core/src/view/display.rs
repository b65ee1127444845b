//! Display helpers for task rows.
//!
//! No localized strings live here; callers render `DueLabel` themselves.

use crate::search::task_query::TaskRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row color for completed tasks.
pub const COMPLETED_TASK_COLOR: &str = "#F8F9FA";
/// Row color for tasks without a priority.
pub const DEFAULT_TASK_COLOR: &str = "#fff";

/// Completed tasks are greyed out; otherwise the priority color wins.
pub fn display_color(row: &TaskRow) -> &str {
    if row.task.completed {
        return COMPLETED_TASK_COLOR;
    }

    match row.priority.as_ref() {
        Some(priority) if !priority.color.is_empty() => priority.color.as_str(),
        _ => DEFAULT_TASK_COLOR,
    }
}

/// Relative due-date label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueLabel {
    NoDeadline,
    Yesterday,
    Today,
    Tomorrow,
    On(NaiveDate),
}

pub fn due_label(date: Option<NaiveDate>, today: NaiveDate) -> DueLabel {
    let Some(date) = date else {
        return DueLabel::NoDeadline;
    };

    match (date - today).num_days() {
        -1 => DueLabel::Yesterday,
        0 => DueLabel::Today,
        1 => DueLabel::Tomorrow,
        _ => DueLabel::On(date),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_color, due_label, DueLabel, COMPLETED_TASK_COLOR, DEFAULT_TASK_COLOR};
    use crate::model::priority::Priority;
    use crate::model::task::Task;
    use crate::search::task_query::TaskRow;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(completed: bool, color: Option<&str>) -> TaskRow {
        TaskRow {
            task: Task {
                id: 1,
                title: "t".to_string(),
                date: None,
                completed,
                priority_id: color.map(|_| 1),
                category_id: None,
            },
            category: None,
            priority: color.map(|color| Priority {
                id: 1,
                title: "High".to_string(),
                color: color.to_string(),
            }),
        }
    }

    #[test]
    fn completed_color_overrides_priority() {
        assert_eq!(display_color(&row(true, Some("#F1828D"))), COMPLETED_TASK_COLOR);
        assert_eq!(display_color(&row(false, Some("#F1828D"))), "#F1828D");
        assert_eq!(display_color(&row(false, None)), DEFAULT_TASK_COLOR);
    }

    #[test]
    fn labels_are_relative_to_today_across_month_boundary() {
        let today = date(2024, 3, 1);
        assert_eq!(due_label(None, today), DueLabel::NoDeadline);
        assert_eq!(due_label(Some(date(2024, 2, 29)), today), DueLabel::Yesterday);
        assert_eq!(due_label(Some(today), today), DueLabel::Today);
        assert_eq!(due_label(Some(date(2024, 3, 2)), today), DueLabel::Tomorrow);
        assert_eq!(
            due_label(Some(date(2024, 3, 31)), today),
            DueLabel::On(date(2024, 3, 31))
        );
    }
}
