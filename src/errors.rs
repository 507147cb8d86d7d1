use thiserror::Error;

use crate::introspect::ColumnDiff;

/// Errors surfaced by queue operations.
///
/// Storage errors pass through verbatim; the queue performs no retry or
/// backoff of its own.
#[derive(Error, Debug)]
pub enum QueueError {
    /// An error occurred while executing an SQL query
    #[error("error occured while query: {0}")]
    Sql(#[from] sqlx::Error),

    /// The live queue table does not match the expected column contract.
    /// Carries every discrepancy found, not just the first.
    #[error("unexpected queue table schema: {}", format_diffs(.diffs))]
    SchemaMismatch { diffs: Vec<ColumnDiff> },
}

fn format_diffs(diffs: &[ColumnDiff]) -> String {
    diffs
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A Result type alias for QueueError.
pub type Result<T> = core::result::Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_lists_every_diff() {
        let err = QueueError::SchemaMismatch {
            diffs: vec![
                ColumnDiff::Missing {
                    name: "done_at".into(),
                },
                ColumnDiff::Type {
                    name: "priority".into(),
                    expected: "integer".into(),
                    actual: "text".into(),
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains(r#"missing column "done_at""#));
        assert!(msg.contains(r#"column "priority": type is text, expected integer"#));
    }

    #[test]
    fn sql_errors_pass_through() {
        let err = QueueError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, QueueError::Sql(sqlx::Error::RowNotFound)));
        assert!(err.to_string().starts_with("error occured while query"));
    }
}
