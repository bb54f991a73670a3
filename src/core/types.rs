use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a column plays in the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Static,
    #[default]
    Regular,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::PartitionKey => "partition_key",
            ColumnKind::Clustering => "clustering",
            ColumnKind::Static => "static",
            ColumnKind::Regular => "regular",
        };
        f.write_str(name)
    }
}

/// A column as reported by cluster metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// CQL type as written in a table definition, e.g. `text` or `map<text, int>`.
    #[serde(rename = "type")]
    pub cql_type: String,
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, cql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cql_type: cql_type.into(),
            kind: ColumnKind::Regular,
        }
    }

    pub fn partition_key(mut self) -> Self {
        self.kind = ColumnKind::PartitionKey;
        self
    }

    pub fn clustering(mut self) -> Self {
        self.kind = ColumnKind::Clustering;
        self
    }

    pub fn static_column(mut self) -> Self {
        self.kind = ColumnKind::Static;
        self
    }

    pub fn is_partition_key(&self) -> bool {
        self.kind == ColumnKind::PartitionKey
    }
}
