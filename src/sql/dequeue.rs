use indoc::formatdoc;
use sqlx::{query_as, PgExecutor};
use tracing::debug;

use super::JOB_COLUMNS;
use crate::errors::Result;
use crate::{Job, JobStatus};

/// Claims the single best `QUEUED` job, if any.
///
/// Selection and update run as one statement: the inner select locks the
/// candidate row with `FOR UPDATE SKIP LOCKED`, so concurrent claimers are
/// routed to different rows rather than blocking or deadlocking on each
/// other. Ordering is `priority DESC, created_at ASC`; at most one row is
/// ever claimed per call.
#[tracing::instrument(skip_all, err, fields(otel.kind = "client", db.system = "postgresql"))]
pub(crate) async fn dequeue_job(
    executor: impl for<'e> PgExecutor<'e>,
    escaped_table: &str,
) -> Result<Option<Job>> {
    let sql = formatdoc!(
        r#"
            WITH claimed AS (
                UPDATE {escaped_table} SET status = $1, started_at = now()
                WHERE id IN (
                    SELECT id FROM {escaped_table}
                    WHERE status = $2
                    ORDER BY priority DESC, created_at ASC
                    LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                RETURNING {JOB_COLUMNS}
            )
            SELECT * FROM claimed
        "#
    );

    let job: Option<Job> = query_as(&sql)
        .bind(JobStatus::Running.as_str())
        .bind(JobStatus::Queued.as_str())
        .fetch_optional(executor)
        .await?;

    match &job {
        Some(job) => debug!(id = %job.id(), job_type = %job.job_type(), "job claimed"),
        None => debug!("no queued job available"),
    }

    Ok(job)
}
