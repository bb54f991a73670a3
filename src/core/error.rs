use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterInfoError {
    #[error("No such partitioner: {0}")]
    UnknownPartitioner(String),

    #[error("No such keyspace/table: {keyspace}/{table}")]
    SchemaNotFound { keyspace: String, table: String },

    #[error("No matching column for partition key column '{0}'")]
    PartitionKeyColumnMissing(String),

    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Invalid cluster topology: {0}")]
    InvalidTopology(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insert statement requires at least one column")]
    EmptyColumnList,

    #[error("Malformed metadata: {0}")]
    MetadataFormat(String),
}

impl ClusterInfoError {
    pub fn schema_not_found(keyspace: &str, table: &str) -> Self {
        Self::SchemaNotFound {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClusterInfoError>;

impl From<serde_json::Error> for ClusterInfoError {
    fn from(err: serde_json::Error) -> Self {
        Self::MetadataFormat(err.to_string())
    }
}
