// ABOUTME: Task outcome model shared by leaf tasks, groups, and the flow root
// ABOUTME: Defines the Outcome alias and the cloneable TaskFailure value

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Terminal state of a task: the value it produced, or the failure that
/// ended it. Failures are data, not control flow; they travel through the
/// context map rather than unwinding the run.
pub type Outcome = std::result::Result<Value, TaskFailure>;

/// A captured task failure. Cloneable so a group can mirror a child's
/// failure under its own slug while the child's slot keeps the original.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("task '{task}' failed: {message}")]
pub struct TaskFailure {
    /// Slug of the task that originally failed.
    pub task: String,
    /// Flattened error chain from the user callable.
    pub message: String,
    pub failed_at: DateTime<Utc>,
}

impl TaskFailure {
    pub fn new(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            message: message.into(),
            failed_at: Utc::now(),
        }
    }

    /// Capture a callable error, flattening its source chain into the message.
    pub fn from_error(task: &str, error: &anyhow::Error) -> Self {
        Self::new(task, format!("{error:#}"))
    }
}
