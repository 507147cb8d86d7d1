use indoc::formatdoc;
use sqlx::{query_as, PgExecutor};
use uuid::Uuid;

use super::JOB_COLUMNS;
use crate::errors::Result;
use crate::Job;

/// Point lookup by id; `None` when no such job exists.
#[tracing::instrument(skip_all, err, fields(otel.kind = "client", db.system = "postgresql"))]
pub(crate) async fn get_job_by_id(
    executor: impl for<'e> PgExecutor<'e>,
    escaped_table: &str,
    job_id: Uuid,
) -> Result<Option<Job>> {
    let sql = formatdoc!(
        r#"
            SELECT {JOB_COLUMNS} FROM {escaped_table} WHERE id = $1
        "#
    );

    let job = query_as(&sql).bind(job_id).fetch_optional(executor).await?;

    Ok(job)
}
