use crate::connection::config::ConnectionConfig;
use crate::connection::{MetadataConnector, SessionGuard};
use crate::core::{ClusterInfoError, Result, quote_identifier};
use crate::snapshot::ClusterSchemaSnapshot;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};

/// Handle on a cluster coordinator, used to resolve table snapshots.
///
/// Holds only the connection coordinates; every [`resolve`](Self::resolve)
/// opens its own session and releases it before returning.
///
/// # Examples
///
/// ```
/// use cqlmeta::{ClusterInfo, ConnectionConfig};
/// use cqlmeta::core::ColumnDescriptor;
/// use cqlmeta::metadata::{ClusterMetadata, KeyspaceMetadata, StaticMetadataConnector, TableMetadata};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> cqlmeta::Result<()> {
/// let metadata = ClusterMetadata::new("org.apache.cassandra.dht.Murmur3Partitioner")
///     .host("10.0.0.1")
///     .keyspace(KeyspaceMetadata::new("ks").with_table(
///         TableMetadata::new("ks", "users")
///             .column(ColumnDescriptor::new("id", "uuid").partition_key())
///             .column(ColumnDescriptor::new("name", "text"))
///             .partition_key(["id"]),
///     ));
///
/// let cluster = ClusterInfo::new(
///     ConnectionConfig::new("10.0.0.1"),
///     Arc::new(StaticMetadataConnector::new(metadata)),
/// );
/// let snapshot = cluster.resolve("ks", "users").await?;
///
/// assert_eq!(snapshot.partition_key_indexes(), &[0]);
/// assert_eq!(
///     snapshot.build_insert_statement(&["id", "name"])?,
///     "INSERT INTO ks.users (id, name) VALUES (?, ?) USING TIMESTAMP ? AND TTL ?;"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClusterInfo {
    config: ConnectionConfig,
    connector: Arc<dyn MetadataConnector>,
}

impl ClusterInfo {
    pub fn new(config: ConnectionConfig, connector: Arc<dyn MetadataConnector>) -> Self {
        Self { config, connector }
    }

    /// Handle for a `cql://host[:port]` contact point.
    pub fn from_url(url: &str, connector: Arc<dyn MetadataConnector>) -> Result<Self> {
        let config = ConnectionConfig::from_url(url)?;
        Ok(Self::new(config, connector))
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Reads the metadata of `keyspace.table` and builds its snapshot.
    ///
    /// Names are matched case-sensitively. Any failure aborts the whole
    /// lookup; the session is released either way.
    pub async fn resolve(&self, keyspace: &str, table: &str) -> Result<ClusterSchemaSnapshot> {
        let span = info_span!("resolve_schema", keyspace, table);
        self.fetch_snapshot(keyspace, table).instrument(span).await
    }

    async fn fetch_snapshot(&self, keyspace: &str, table: &str) -> Result<ClusterSchemaSnapshot> {
        info!("getting cluster metadata for {}.{}", keyspace, table);
        let session = SessionGuard::open(self.connector.as_ref(), &self.config).await?;

        let keyspace_metadata = session
            .keyspace(&quote_identifier(keyspace))
            .await?
            .ok_or_else(|| ClusterInfoError::schema_not_found(keyspace, table))?;
        let table_metadata = keyspace_metadata
            .table(table)
            .ok_or_else(|| ClusterInfoError::schema_not_found(keyspace, table))?;
        let partitioner = session.partitioner_class_name().await?;
        let host_count = session.known_host_count().await?;
        drop(session);

        let snapshot =
            ClusterSchemaSnapshot::from_metadata(keyspace, table_metadata, &partitioner, host_count)?;
        info!(
            partitioner = %snapshot.partitioner(),
            nodes = snapshot.node_count(),
            columns = snapshot.columns().len(),
            "resolved cluster schema"
        );
        Ok(snapshot)
    }
}
