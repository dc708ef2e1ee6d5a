//! Persisted task row
//!
//! The storage-shaped representation of a task: timestamps as epoch
//! milliseconds, priority as its persisted name. Only the store and the
//! mapper deal in rows; everything above the repository sees `Task`.

use serde::{Deserialize, Serialize};

/// A task row as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    /// Epoch milliseconds
    pub created_date: i64,
    /// Epoch milliseconds; `None` means no deadline
    pub due_date: Option<i64>,
    /// Priority name, e.g. `"MEDIUM"`
    pub priority: String,
}
