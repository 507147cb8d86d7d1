use std::fmt;

use chrono::{DateTime, Utc};
use getset::Getters;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a job. Transitions are monotonic:
/// `Queued -> Running -> Done`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
}

impl JobStatus {
    /// The status text as stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for JobStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "QUEUED" => Ok(JobStatus::Queued),
            "RUNNING" => Ok(JobStatus::Running),
            "DONE" => Ok(JobStatus::Done),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// `Job` represents a job row in the queue table.
///
/// The `type` discriminator and the `data` payload are opaque to the queue;
/// interpreting them is entirely the worker's business.
#[derive(FromRow, Getters, Debug, Clone, PartialEq, Eq, Serialize)]
#[getset(get = "pub")]
pub struct Job {
    /// Unique identifier, generated by the database on insert
    id: Uuid,
    /// When the job was enqueued
    created_at: DateTime<Utc>,
    /// Caller-supplied job kind discriminator
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    job_type: String,
    /// The JSON payload associated with this job
    data: Value,
    /// Higher number means it is served sooner
    priority: i32,
    #[sqlx(try_from = "String")]
    status: JobStatus,
    /// Set when the job is claimed by a worker
    started_at: Option<DateTime<Utc>>,
    /// Last liveness signal from the worker holding the job
    last_keep_alive: Option<DateTime<Utc>>,
    /// Completion time; the published contract leaves this null
    done_at: Option<DateTime<Utc>>,
}
