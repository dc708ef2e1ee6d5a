//! Row <-> domain conversion
//!
//! Two pure, total functions. Every valid row maps to a valid task and back;
//! an unrecognized priority name decodes to `Medium`, and a millisecond
//! timestamp outside the representable range clamps to the Unix epoch.

use chrono::{DateTime, Utc};

use super::model::{Priority, Task};
use super::row::TaskRow;

/// Convert a persisted row into a domain task.
pub fn to_domain(row: &TaskRow) -> Task {
    Task {
        id: row.id,
        title: row.title.clone(),
        description: row.description.clone(),
        is_completed: row.is_completed,
        created_date: millis_to_datetime(row.created_date),
        due_date: row.due_date.map(millis_to_datetime),
        priority: Priority::from_name(&row.priority),
    }
}

/// Convert a domain task into its persisted row.
pub fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        is_completed: task.is_completed,
        created_date: task.created_date.timestamp_millis(),
        due_date: task.due_date.map(|d| d.timestamp_millis()),
        priority: task.priority.as_str().to_string(),
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_row() -> TaskRow {
        TaskRow {
            id: 7,
            title: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            is_completed: false,
            created_date: 1_700_000_000_000,
            due_date: Some(1_700_086_400_000),
            priority: "HIGH".to_string(),
        }
    }

    #[test]
    fn test_row_round_trip() {
        let row = sample_row();
        assert_eq!(to_row(&to_domain(&row)), row);
    }

    #[test]
    fn test_task_round_trip() {
        let task = Task::new("Pay rent")
            .with_description("Before the 1st")
            .with_priority(Priority::Low)
            .with_created_date(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
            .with_due_date(Utc.timestamp_millis_opt(1_700_086_400_000).unwrap());
        assert_eq!(to_domain(&to_row(&task)), task);
    }

    #[test]
    fn test_unrecognized_priority_decodes_to_medium() {
        let mut row = sample_row();
        row.priority = "CRITICAL".to_string();
        assert_eq!(to_domain(&row).priority, Priority::Medium);
    }

    #[test]
    fn test_absent_due_date_maps_to_none() {
        let mut row = sample_row();
        row.due_date = None;
        assert!(to_domain(&row).due_date.is_none());
    }

    #[test]
    fn test_out_of_range_timestamp_clamps_to_epoch() {
        let mut row = sample_row();
        row.created_date = i64::MAX;
        assert_eq!(to_domain(&row).created_date, DateTime::UNIX_EPOCH);
    }
}
