//! Long-running synthesis job state machine.
//!
//! ```text
//! SUBMITTED ──poll──▶ PENDING ──poll──▶ DONE
//!     │                  │
//!     └──────poll────────┴────────────▶ FAILED
//! ```
//!
//! Transitions only move forward. DONE and FAILED are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque provider operation handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    Pending,
    Done,
    Failed,
}

impl JobStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Illegal attempt to move a job between states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobTransitionError {
    #[error("job {handle} is already {status:?}")]
    AlreadyTerminal { handle: String, status: JobStatus },

    #[error("job {handle} reported DONE without a result reference")]
    MissingReference { handle: String },
}

/// Client-side view of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncJob {
    handle: JobHandle,
    status: JobStatus,
    result_ref: Option<String>,
    submitted_at: DateTime<Utc>,
    polls: u32,
}

impl AsyncJob {
    pub fn submitted(handle: JobHandle) -> Self {
        Self {
            handle,
            status: JobStatus::Submitted,
            result_ref: None,
            submitted_at: Utc::now(),
            polls: 0,
        }
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result_ref(&self) -> Option<&str> {
        self.result_ref.as_deref()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Record the status reported by one poll.
    ///
    /// The first non-terminal report moves SUBMITTED to PENDING. A DONE report must
    /// carry the result reference.
    pub fn record_poll(
        &mut self,
        reported: JobStatus,
        result_ref: Option<String>,
    ) -> Result<JobStatus, JobTransitionError> {
        if self.status.is_terminal() {
            return Err(JobTransitionError::AlreadyTerminal {
                handle: self.handle.to_string(),
                status: self.status,
            });
        }

        // A poll never reports SUBMITTED; treat it as "still working".
        let next = if reported == JobStatus::Submitted { JobStatus::Pending } else { reported };

        if next == JobStatus::Done {
            match result_ref {
                Some(reference) => self.result_ref = Some(reference),
                None => {
                    return Err(JobTransitionError::MissingReference {
                        handle: self.handle.to_string(),
                    })
                },
            }
        }

        self.polls = self.polls.saturating_add(1);
        self.status = next;
        Ok(next)
    }
}
