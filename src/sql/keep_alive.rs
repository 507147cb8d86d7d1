use indoc::formatdoc;
use sqlx::{query, PgExecutor};
use uuid::Uuid;

use crate::errors::Result;

/// Stamps `last_keep_alive` with the current server time.
///
/// The job's status is neither checked nor changed; a keep-alive for a job
/// that is not `RUNNING` succeeds silently.
#[tracing::instrument(skip_all, err, fields(otel.kind = "client", db.system = "postgresql"))]
pub(crate) async fn send_job_keep_alive(
    executor: impl for<'e> PgExecutor<'e>,
    escaped_table: &str,
    job_id: Uuid,
) -> Result<()> {
    let sql = formatdoc!(
        r#"
            UPDATE {escaped_table} SET last_keep_alive = now() WHERE id = $1
        "#
    );

    query(&sql).bind(job_id).execute(executor).await?;

    Ok(())
}
