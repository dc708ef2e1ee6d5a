//! Task model definitions

use chrono::{DateTime, Utc};

/// Id of a task that has not been persisted yet.
///
/// The store assigns a real id on insert; updates and deletes require an
/// assigned id.
pub const UNASSIGNED_ID: i64 = 0;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// The name this priority is persisted under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Decode a persisted priority name.
    ///
    /// Unrecognized names (including case mismatches) decode to `Medium`;
    /// this is deliberately total rather than an error path.
    pub fn from_name(name: &str) -> Self {
        match name {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// A task in the user's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    /// Set once at creation; never mutated by updates.
    pub created_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl Task {
    /// Create a new, not-yet-persisted task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            description: String::new(),
            is_completed: false,
            created_date: Utc::now(),
            due_date: None,
            priority: Priority::default(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completion flag
    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    /// Set the creation timestamp
    pub fn with_created_date(mut self, created_date: DateTime<Utc>) -> Self {
        self.created_date = created_date;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this task has been persisted (assigned a real id)
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task() {
        let task = Task::new("Test task");
        assert_eq!(task.id, UNASSIGNED_ID);
        assert_eq!(task.title, "Test task");
        assert!(task.description.is_empty());
        assert!(!task.is_completed);
        assert!(task.due_date.is_none());
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_persisted());
    }

    #[test]
    fn test_task_with_description() {
        let task = Task::new("Test task").with_description("This is a test");
        assert_eq!(task.description, "This is a test");
    }

    #[test]
    fn test_task_with_priority() {
        let task = Task::new("Test task").with_priority(Priority::High);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_task_with_due_date() {
        let due = Utc::now();
        let task = Task::new("Test task").with_due_date(due);
        assert_eq!(task.due_date, Some(due));
    }

    #[test]
    fn test_priority_names_round_trip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_name(priority.as_str()), priority);
        }
    }

    #[test]
    fn test_priority_unknown_name_decodes_to_medium() {
        assert_eq!(Priority::from_name("URGENT"), Priority::Medium);
        assert_eq!(Priority::from_name(""), Priority::Medium);
        // Exact-match semantics: lowercase is not recognized.
        assert_eq!(Priority::from_name("high"), Priority::Medium);
    }
}
