//! Job lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted processing state of a job document.
///
/// Transitions run `Submitted -> Processing -> Completed | Failed`. A job
/// document is only deleted from the store after reaching `Completed`;
/// `Failed` jobs are retained so the failure stays visible to read
/// endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this state ends the job lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Lowercase wire name, as stored on the job document.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
