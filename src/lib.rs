// ============================================================================
// cqlmeta Library
// ============================================================================
//
// Reads the schema and topology of a CQL cluster once and exposes what a
// bulk writer needs: partitioner, node count, table definition, partition key
// positions and the insert statement to bind rows against.

pub mod core;
pub mod connection;
pub mod metadata;
pub mod resolver;
pub mod snapshot;
pub mod statement;

// Re-export main types for convenience
pub use crate::core::{ClusterInfoError, ColumnDescriptor, ColumnKind, Partitioner, Result};
pub use crate::core::partitioner::routing_key;
pub use crate::connection::{MetadataConnector, MetadataSession, SessionGuard, config::ConnectionConfig};
pub use metadata::{ClusterMetadata, KeyspaceMetadata, StaticMetadataConnector, TableMetadata};
pub use resolver::ClusterInfo;
pub use snapshot::ClusterSchemaSnapshot;
pub use statement::{InsertStatement, build_insert_statement};
