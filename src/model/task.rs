use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Task identifier (milliseconds since the Unix epoch at creation)
pub type TaskId = i64;

/// A single entry in the task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, non-empty title
    pub title: String,
    /// Mirror of selection-set membership, re-derived whenever the selection changes
    pub completed: bool,
    /// Display timestamp fixed at creation
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Create a new, not-yet-completed task stamped with `now`
    pub fn new<Tz: TimeZone>(id: TaskId, title: String, now: &DateTime<Tz>) -> Self {
        Task {
            id,
            title,
            completed: false,
            created_at: format_created_at(now),
        }
    }
}

/// Format a creation timestamp as `H:M:S - D/M/YYYY` (no zero padding)
pub fn format_created_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{}:{}:{} - {}/{}/{}",
        at.hour(),
        at.minute(),
        at.second(),
        at.day(),
        at.month(),
        at.year()
    )
}
