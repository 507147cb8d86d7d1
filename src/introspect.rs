//! Catalog introspection and schema-contract comparison.
//!
//! The observed column set is read from `information_schema.columns` and
//! compared structurally against an expected set. Column order carries no
//! meaning here; comparison is keyed by column name.

use std::collections::BTreeMap;
use std::fmt;

use sqlx::{PgExecutor, Row};

use crate::errors::Result;

/// The observed shape of one physical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    /// Declared type as reported by the catalog, e.g. `timestamp with time zone`
    pub data_type: String,
    pub is_nullable: bool,
    /// The insert default expression, `None` when the column has no default
    pub default_expr: Option<String>,
}

/// Looks up every column of `schema`.`table` in the catalog.
pub async fn lookup_table_columns<'e>(
    executor: impl PgExecutor<'e>,
    schema: &str,
    table: &str,
) -> Result<Vec<TableColumn>> {
    let rows = sqlx::query(
        r#"
            select column_name, column_default, is_nullable, data_type
            from information_schema.columns
            where table_schema = $1 and table_name = $2
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(TableColumn {
                name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
                is_nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                default_expr: row.try_get("column_default")?,
            })
        })
        .collect()
}

/// One discrepancy between the expected contract and the observed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDiff {
    /// Expected column is absent from the table
    Missing { name: String },
    /// Table carries a column the contract does not know about
    Unexpected { name: String },
    Type {
        name: String,
        expected: String,
        actual: String,
    },
    Nullability {
        name: String,
        expected: bool,
        actual: bool,
    },
    Default {
        name: String,
        expected: Option<String>,
        actual: Option<String>,
    },
}

fn fmt_default(default_expr: &Option<String>) -> &str {
    default_expr.as_deref().unwrap_or("none")
}

impl fmt::Display for ColumnDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDiff::Missing { name } => write!(f, "missing column {name:?}"),
            ColumnDiff::Unexpected { name } => write!(f, "unexpected column {name:?}"),
            ColumnDiff::Type {
                name,
                expected,
                actual,
            } => write!(f, "column {name:?}: type is {actual}, expected {expected}"),
            ColumnDiff::Nullability {
                name,
                expected,
                actual,
            } => {
                let describe = |nullable: bool| if nullable { "nullable" } else { "not null" };
                write!(
                    f,
                    "column {name:?}: {}, expected {}",
                    describe(*actual),
                    describe(*expected)
                )
            }
            ColumnDiff::Default {
                name,
                expected,
                actual,
            } => write!(
                f,
                "column {name:?}: default is {}, expected {}",
                fmt_default(actual),
                fmt_default(expected)
            ),
        }
    }
}

/// Compares an observed column set against the expected contract.
///
/// Every discrepancy is reported individually; an empty result means the
/// table matches. Results are ordered by column name so reports are stable.
pub fn diff_columns(expected: &[TableColumn], observed: &[TableColumn]) -> Vec<ColumnDiff> {
    let expected_by_name: BTreeMap<&str, &TableColumn> =
        expected.iter().map(|c| (c.name.as_str(), c)).collect();
    let observed_by_name: BTreeMap<&str, &TableColumn> =
        observed.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut diffs = Vec::new();

    for (name, want) in &expected_by_name {
        let Some(got) = observed_by_name.get(name) else {
            diffs.push(ColumnDiff::Missing {
                name: name.to_string(),
            });
            continue;
        };

        if got.data_type != want.data_type {
            diffs.push(ColumnDiff::Type {
                name: name.to_string(),
                expected: want.data_type.clone(),
                actual: got.data_type.clone(),
            });
        }
        if got.is_nullable != want.is_nullable {
            diffs.push(ColumnDiff::Nullability {
                name: name.to_string(),
                expected: want.is_nullable,
                actual: got.is_nullable,
            });
        }
        if got.default_expr != want.default_expr {
            diffs.push(ColumnDiff::Default {
                name: name.to_string(),
                expected: want.default_expr.clone(),
                actual: got.default_expr.clone(),
            });
        }
    }

    for name in observed_by_name.keys() {
        if !expected_by_name.contains_key(name) {
            diffs.push(ColumnDiff::Unexpected {
                name: name.to_string(),
            });
        }
    }

    diffs
}
