//! A durable, priority-ordered job queue on top of PostgreSQL.
//!
//! Jobs live in a single table and move through a monotonic lifecycle:
//! `QUEUED -> RUNNING -> DONE`. All coordination is delegated to the
//! database: [`Queue::dequeue`] claims a job with a `FOR UPDATE SKIP LOCKED`
//! read inside a single statement, so arbitrarily many workers across
//! processes and machines can poll the same table and each claim a distinct
//! job, without any in-process locking.
//!
//! The queue is at-least-once: a claimed job stays `RUNNING` until the worker
//! marks it done, and workers signal liveness with
//! [`Queue::send_job_keep_alive`]. Requeueing of stalled jobs is a caller
//! concern layered on top.
//!
//! ```no_run
//! # async fn example(pool: sqlx::PgPool) -> pgqueue::Result<()> {
//! use pgqueue::Queue;
//!
//! let queue = Queue::new(pool);
//! queue.ensure().await?;
//!
//! queue.enqueue("send-email", 1, None).await?;
//!
//! if let Some(job) = queue.dequeue().await? {
//!     // ... do the work ...
//!     queue.mark_job_done(*job.id()).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every operation is a single atomic statement; cancelling (dropping or
//! timing out) an in-flight call leaves no partial state behind.

pub mod ddl;
pub mod errors;
pub mod introspect;
mod job;
mod sql;

use getset::Getters;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use ddl::{quote_identifier, ColumnSpec, TableDefinition};
use introspect::TableColumn;

pub use errors::{QueueError, Result};
pub use introspect::ColumnDiff;
pub use job::{Job, JobStatus};

const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_TABLE: &str = "queue";

/// Construction-time configuration for a [`Queue`].
///
/// ```
/// use pgqueue::QueueOptions;
///
/// let options = QueueOptions::default().schema("jobs").table("work_queue");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueueOptions {
    schema: Option<String>,
    table: Option<String>,
}

impl QueueOptions {
    /// Schema containing the queue table. Defaults to `public`.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Name of the queue table. Defaults to `queue`.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// A handle to the job queue stored in one Postgres table.
///
/// The handle itself is stateless and cheap to clone; it is safe to share
/// across tasks, threads, and processes, because every operation coordinates
/// through the database alone.
#[derive(Debug, Clone, Getters)]
pub struct Queue {
    pool: PgPool,
    /// Schema the queue table lives in
    #[getset(get = "pub")]
    schema: String,
    /// Queue table name
    #[getset(get = "pub")]
    table: String,
    // quoted `"schema"."table"`, computed once
    escaped_table: String,
}

impl Queue {
    /// Creates a queue handle with the default `public`.`queue` table.
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, QueueOptions::default())
    }

    pub fn with_options(pool: PgPool, options: QueueOptions) -> Self {
        let schema = options.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        let table = options.table.unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let escaped_table = format!(
            "{}.{}",
            quote_identifier(&schema),
            quote_identifier(&table)
        );

        Self {
            pool,
            schema,
            table,
            escaped_table,
        }
    }

    /// Idempotently creates the queue table, then verifies that its live
    /// shape matches the expected column contract.
    ///
    /// Returns [`QueueError::SchemaMismatch`] listing every discrepancy when
    /// the table exists with a different shape. Intended to run once at
    /// startup, before any lifecycle operation; a mismatch should halt
    /// startup rather than be retried.
    pub async fn ensure(&self) -> Result<()> {
        let create = job_table_definition(&self.schema, &self.table).sql();
        sqlx::query(&create).execute(&self.pool).await?;

        let observed =
            introspect::lookup_table_columns(&self.pool, &self.schema, &self.table).await?;
        let diffs = introspect::diff_columns(&expected_columns(), &observed);

        if !diffs.is_empty() {
            return Err(QueueError::SchemaMismatch { diffs });
        }

        Ok(())
    }

    /// Adds a new job and returns its generated id.
    ///
    /// Higher `priority` is served first. `data` defaults to an empty JSON
    /// object; its contents are opaque to the queue. Duplicate enqueues of
    /// identical type and data are legal and create distinct jobs.
    pub async fn enqueue(
        &self,
        job_type: &str,
        priority: i32,
        data: Option<Value>,
    ) -> Result<Uuid> {
        let data = data.unwrap_or_else(|| Value::Object(Default::default()));
        sql::enqueue::enqueue_job(&self.pool, &self.escaped_table, job_type, priority, &data).await
    }

    /// Atomically claims the highest-priority queued job, oldest first among
    /// ties, moving it to `RUNNING` and stamping `started_at`.
    ///
    /// Returns `Ok(None)` when nothing is queued; callers are expected to
    /// poll or back off. Concurrent callers never claim the same job.
    pub async fn dequeue(&self) -> Result<Option<Job>> {
        sql::dequeue::dequeue_job(&self.pool, &self.escaped_table).await
    }

    /// Fetches a job by id. `Ok(None)` when no such job exists.
    pub async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>> {
        sql::get_job::get_job_by_id(&self.pool, &self.escaped_table, job_id).await
    }

    /// Signals that the worker holding `job_id` is still alive by updating
    /// `last_keep_alive` to the current server time.
    pub async fn send_job_keep_alive(&self, job_id: Uuid) -> Result<()> {
        sql::keep_alive::send_job_keep_alive(&self.pool, &self.escaped_table, job_id).await
    }

    /// Marks a job `DONE`. Calling it again for the same job is a no-op.
    pub async fn mark_job_done(&self, job_id: Uuid) -> Result<()> {
        sql::complete_job::mark_job_done(&self.pool, &self.escaped_table, job_id).await
    }
}

/// The `CREATE TABLE` definition for the job table.
fn job_table_definition(schema: &str, table: &str) -> TableDefinition {
    TableDefinition {
        schema: schema.to_string(),
        if_not_exists: true,
        columns: vec![
            ColumnSpec::new(
                "id",
                "uuid",
                &["PRIMARY KEY", "NOT NULL", "DEFAULT gen_random_uuid()"],
            ),
            ColumnSpec::new(
                "created_at",
                "timestamp with time zone",
                &["DEFAULT now()", "NOT NULL"],
            ),
            ColumnSpec::new("type", "text", &["NOT NULL"]),
            ColumnSpec::new("data", "jsonb", &["NOT NULL", "DEFAULT '{}'"]),
            ColumnSpec::new("priority", "int", &["NOT NULL", "DEFAULT 1"]),
            ColumnSpec::new("status", "text", &["NOT NULL", "DEFAULT 'QUEUED'"]),
            ColumnSpec::new("started_at", "timestamp with time zone", &[]),
            ColumnSpec::new("last_keep_alive", "timestamp with time zone", &[]),
            ColumnSpec::new("done_at", "timestamp with time zone", &[]),
        ],
        ..TableDefinition::new(table)
    }
}

/// The column contract the live table must exhibit, shaped exactly the way
/// `information_schema.columns` reports it back.
fn expected_columns() -> Vec<TableColumn> {
    let col = |name: &str, data_type: &str, is_nullable: bool, default_expr: Option<&str>| {
        TableColumn {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable,
            default_expr: default_expr.map(|d| d.to_string()),
        }
    };

    vec![
        col("id", "uuid", false, Some("gen_random_uuid()")),
        col(
            "created_at",
            "timestamp with time zone",
            false,
            Some("now()"),
        ),
        col("type", "text", false, None),
        col("data", "jsonb", false, Some("'{}'::jsonb")),
        col("priority", "integer", false, Some("1")),
        col("status", "text", false, Some("'QUEUED'::text")),
        col("started_at", "timestamp with time zone", true, None),
        col("last_keep_alive", "timestamp with time zone", true, None),
        col("done_at", "timestamp with time zone", true, None),
    ]
}
