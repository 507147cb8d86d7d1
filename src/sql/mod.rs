//! One file per queue statement, mirroring the lifecycle operations.
//!
//! Each function takes any Postgres executor plus the pre-escaped
//! `"schema"."table"` path of the queue table.

pub(crate) mod complete_job;
pub(crate) mod dequeue;
pub(crate) mod enqueue;
pub(crate) mod get_job;
pub(crate) mod keep_alive;

/// Column list selected for every full-row read, in table order.
pub(crate) const JOB_COLUMNS: &str =
    "id, created_at, type, data, priority, status, started_at, last_keep_alive, done_at";
