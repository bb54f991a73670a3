//! Cluster metadata as handed over by a [`MetadataSession`](crate::connection::MetadataSession).
//!
//! These are plain owned values: a session answers a lookup with a copy of
//! the keyspace it knows about, and nothing here holds on to a connection.

pub mod memory;

use crate::core::{ColumnDescriptor, ColumnKind, escape_identifier};
use serde::{Deserialize, Serialize};

pub use memory::{ClusterMetadata, StaticMetadataConnector};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyspaceMetadata {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

impl KeyspaceMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.push(table);
        self
    }

    /// Table by exact (case-sensitive) name.
    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub keyspace: String,
    pub name: String,
    /// Columns in the order the cluster reports them.
    pub columns: Vec<ColumnDescriptor>,
    /// Partition key component names, in declared order.
    pub partition_key: Vec<String>,
    #[serde(default)]
    pub clustering_key: Vec<String>,
    /// Definition text as reported by the cluster, when it provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl TableMetadata {
    pub fn new(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            name: name.into(),
            columns: Vec::new(),
            partition_key: Vec::new(),
            clustering_key: Vec::new(),
            definition: None,
        }
    }

    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn partition_key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_key = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn clustering_key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clustering_key = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn partition_key_columns(&self) -> &[String] {
        &self.partition_key
    }

    /// CQL statement that creates this table.
    ///
    /// Returns the cluster-provided definition when present, otherwise renders
    /// one from the column and key metadata.
    pub fn as_cql_query(&self) -> String {
        if let Some(definition) = &self.definition {
            return definition.clone();
        }

        let mut cql = format!(
            "CREATE TABLE {}.{} (\n",
            escape_identifier(&self.keyspace),
            escape_identifier(&self.name)
        );
        for column in &self.columns {
            cql.push_str("    ");
            cql.push_str(&escape_identifier(&column.name));
            cql.push(' ');
            cql.push_str(&column.cql_type);
            if column.kind == ColumnKind::Static {
                cql.push_str(" static");
            }
            cql.push_str(",\n");
        }

        let partition_key = join_identifiers(&self.partition_key);
        let partition_key = if self.partition_key.len() == 1 {
            partition_key
        } else {
            format!("({})", partition_key)
        };
        cql.push_str("    PRIMARY KEY (");
        cql.push_str(&partition_key);
        if !self.clustering_key.is_empty() {
            cql.push_str(", ");
            cql.push_str(&join_identifiers(&self.clustering_key));
        }
        cql.push_str(")\n);");
        cql
    }
}

fn join_identifiers(names: &[String]) -> String {
    names
        .iter()
        .map(|n| escape_identifier(n))
        .collect::<Vec<_>>()
        .join(", ")
}
