use indoc::formatdoc;
use sqlx::{query_scalar, PgExecutor};
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;
use crate::JobStatus;

/// Inserts a new job with status `QUEUED` and returns the generated id.
#[tracing::instrument(skip_all, err, fields(otel.kind = "client", db.system = "postgresql"))]
pub(crate) async fn enqueue_job(
    executor: impl for<'e> PgExecutor<'e>,
    escaped_table: &str,
    job_type: &str,
    priority: i32,
    data: &serde_json::Value,
) -> Result<Uuid> {
    let sql = formatdoc!(
        r#"
            INSERT INTO {escaped_table} (type, priority, data, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        "#
    );

    let id: Uuid = query_scalar(&sql)
        .bind(job_type)
        .bind(priority)
        .bind(data)
        .bind(JobStatus::Queued.as_str())
        .fetch_one(executor)
        .await?;

    info!(job_type, priority, %id, "job enqueued");

    Ok(id)
}
