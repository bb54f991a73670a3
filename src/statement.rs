//! Parameterized insert statements for bulk writers.
//!
//! The text is built from names the caller already has; nothing here looks at
//! the cluster, so statements can be built from any thread once a snapshot
//! exists.

use crate::core::{ClusterInfoError, Result};
use std::fmt;

/// Bind markers that follow the column values: write timestamp and TTL.
pub const DIRECTIVE_BIND_MARKERS: usize = 2;

/// An `INSERT ... USING TIMESTAMP ? AND TTL ?` statement over a fixed column list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsertStatement {
    keyspace: String,
    table: String,
    columns: Vec<String>,
}

impl InsertStatement {
    pub fn new<S: AsRef<str>>(keyspace: &str, table: &str, columns: &[S]) -> Result<Self> {
        if columns.is_empty() {
            return Err(ClusterInfoError::EmptyColumnList);
        }
        Ok(Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values bound per row: one per column plus timestamp and TTL.
    pub fn bind_marker_count(&self) -> usize {
        self.columns.len() + DIRECTIVE_BIND_MARKERS
    }

    pub fn to_cql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}.{} (", self.keyspace, self.table)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(column)?;
        }
        f.write_str(") VALUES (")?;
        for i in 0..self.columns.len() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("?")?;
        }
        f.write_str(") USING TIMESTAMP ? AND TTL ?;")
    }
}

/// Insert statement text listing `columns` in the given order.
///
/// Column names are written as given; checking them against the table is the
/// caller's business.
pub fn build_insert_statement<S: AsRef<str>>(
    keyspace: &str,
    table: &str,
    columns: &[S],
) -> Result<String> {
    InsertStatement::new(keyspace, table, columns).map(|stmt| stmt.to_cql())
}
