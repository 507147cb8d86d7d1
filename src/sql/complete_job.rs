use indoc::formatdoc;
use sqlx::{query, PgExecutor};
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;
use crate::JobStatus;

/// Transitions a job to `DONE`. Idempotent: re-marking a `DONE` job leaves
/// it `DONE` without error.
///
/// `done_at` is not written here; the published contract leaves it null.
#[tracing::instrument(skip_all, err, fields(otel.kind = "client", db.system = "postgresql"))]
pub(crate) async fn mark_job_done(
    executor: impl for<'e> PgExecutor<'e>,
    escaped_table: &str,
    job_id: Uuid,
) -> Result<()> {
    let sql = formatdoc!(
        r#"
            UPDATE {escaped_table} SET status = $2 WHERE id = $1
        "#
    );

    query(&sql)
        .bind(job_id)
        .bind(JobStatus::Done.as_str())
        .execute(executor)
        .await?;

    info!(id = %job_id, "job marked done");

    Ok(())
}
