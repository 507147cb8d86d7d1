//! Assembly of `CREATE TABLE` statements.
//!
//! This is a pure assembler: it quotes identifiers and joins the pieces, but
//! performs no validation of type keywords or constraint fragments. Any
//! SQL-level mistake only surfaces when the statement is executed.

use std::fmt::Write;

/// Quotes a PostgreSQL identifier, doubling any embedded quote characters.
pub fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// A single column of a [`TableDefinition`].
///
/// `constraints` are free-form SQL fragments (`PRIMARY KEY`, `NOT NULL`,
/// `DEFAULT now()`, ...) appended after the type keyword in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
    pub constraints: Vec<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, constraints: &[&str]) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            constraints: constraints.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Plain configuration record for a table creation statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// Schema qualifier; left unqualified when empty
    pub schema: String,
    pub name: String,
    /// Emit `IF NOT EXISTS` so the statement is safe to re-run
    pub if_not_exists: bool,
    /// Columns in declaration order
    pub columns: Vec<ColumnSpec>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: "public".to_string(),
            name: name.into(),
            if_not_exists: false,
            columns: Vec::new(),
        }
    }

    /// Produces the SQL text for creating the table.
    pub fn sql(&self) -> String {
        let mut out = String::from("CREATE TABLE ");

        if self.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }

        if !self.schema.is_empty() {
            let _ = write!(out, "{}.", quote_identifier(&self.schema));
        }

        let cols = self
            .columns
            .iter()
            .map(|col| {
                let mut parts = vec![quote_identifier(&col.name), col.data_type.clone()];
                parts.extend(col.constraints.iter().cloned());
                parts.join(" ")
            })
            .collect::<Vec<_>>()
            .join(", ");

        let _ = write!(out, "{} ({})", quote_identifier(&self.name), cols);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_plain_table() {
        let def = TableDefinition {
            columns: vec![
                ColumnSpec::new("id", "uuid", &["PRIMARY KEY", "NOT NULL"]),
                ColumnSpec::new("name", "text", &[]),
            ],
            ..TableDefinition::new("widgets")
        };

        assert_eq!(
            def.sql(),
            r#"CREATE TABLE "public"."widgets" ("id" uuid PRIMARY KEY NOT NULL, "name" text)"#
        );
    }

    #[test]
    fn if_not_exists_makes_the_statement_rerunnable() {
        let def = TableDefinition {
            if_not_exists: true,
            columns: vec![ColumnSpec::new("id", "bigint", &[])],
            ..TableDefinition::new("widgets")
        };

        assert_eq!(
            def.sql(),
            r#"CREATE TABLE IF NOT EXISTS "public"."widgets" ("id" bigint)"#
        );
    }

    #[test]
    fn empty_schema_leaves_the_name_unqualified() {
        let def = TableDefinition {
            schema: String::new(),
            columns: vec![ColumnSpec::new("id", "bigint", &[])],
            ..TableDefinition::new("widgets")
        };

        assert_eq!(def.sql(), r#"CREATE TABLE "widgets" ("id" bigint)"#);
    }

    #[test]
    fn identifiers_are_quoted_against_collisions() {
        assert_eq!(quote_identifier("select"), r#""select""#);
        assert_eq!(quote_identifier(r#"we"ird"#), r#""we""ird""#);

        let def = TableDefinition {
            schema: "some schema".to_string(),
            columns: vec![ColumnSpec::new("order", "int", &["NOT NULL"])],
            ..TableDefinition::new("table")
        };

        assert_eq!(
            def.sql(),
            r#"CREATE TABLE "some schema"."table" ("order" int NOT NULL)"#
        );
    }

    #[test]
    fn column_order_is_preserved() {
        let mut def = TableDefinition::new("t");
        for name in ["c", "a", "b"] {
            def.columns.push(ColumnSpec::new(name, "int", &[]));
        }

        assert_eq!(
            def.sql(),
            r#"CREATE TABLE "public"."t" ("c" int, "a" int, "b" int)"#
        );
    }
}
