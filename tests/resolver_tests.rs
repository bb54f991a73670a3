/// Resolver tests
///
/// End-to-end lookups through the metadata connector seam.
/// Run with: cargo test --test resolver_tests
use async_trait::async_trait;
use cqlmeta::{
    ClusterInfo, ClusterInfoError, ClusterMetadata, ColumnDescriptor, ConnectionConfig,
    KeyspaceMetadata, MetadataConnector, MetadataSession, Partitioner, StaticMetadataConnector,
    TableMetadata,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const MURMUR3: &str = "org.apache.cassandra.dht.Murmur3Partitioner";

fn composite_key_table() -> TableMetadata {
    TableMetadata::new("ks", "tbl")
        .column(ColumnDescriptor::new("a", "int").partition_key())
        .column(ColumnDescriptor::new("b", "text").partition_key())
        .column(ColumnDescriptor::new("c", "blob"))
        .partition_key(["b", "a"])
}

fn cluster_with(partitioner: &str, table: TableMetadata) -> StaticMetadataConnector {
    let keyspace = table.keyspace.clone();
    StaticMetadataConnector::new(
        ClusterMetadata::new(partitioner)
            .host("10.0.0.1")
            .host("10.0.0.2")
            .host("10.0.0.3")
            .keyspace(KeyspaceMetadata::new(keyspace).with_table(table)),
    )
}

fn cluster_info(connector: &StaticMetadataConnector) -> ClusterInfo {
    ClusterInfo::new(ConnectionConfig::new("10.0.0.1"), Arc::new(connector.clone()))
}

#[tokio::test]
async fn test_partition_key_follows_declared_order() {
    let connector = cluster_with(MURMUR3, composite_key_table());
    let snapshot = cluster_info(&connector).resolve("ks", "tbl").await.unwrap();

    assert_eq!(snapshot.all_column_names(), vec!["a", "b", "c"]);
    assert_eq!(snapshot.partition_key_indexes(), &[1, 0]);
    assert_eq!(snapshot.partitioner(), Partitioner::Murmur3);
    assert_eq!(snapshot.partitioner_class_name(), MURMUR3);
    assert_eq!(snapshot.node_count(), 3);
    assert!(snapshot.cql_schema().contains("PRIMARY KEY ((b, a))"));
}

#[tokio::test]
async fn test_missing_partition_key_column() {
    let table = composite_key_table().partition_key(["b", "ghost"]);
    let connector = cluster_with(MURMUR3, table);

    let result = cluster_info(&connector).resolve("ks", "tbl").await;
    assert_eq!(
        result,
        Err(ClusterInfoError::PartitionKeyColumnMissing("ghost".into()))
    );
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn test_unknown_partitioner() {
    let connector = cluster_with("com.example.TeaLeafPartitioner", composite_key_table());

    let result = cluster_info(&connector).resolve("ks", "tbl").await;
    assert_eq!(
        result,
        Err(ClusterInfoError::UnknownPartitioner(
            "com.example.TeaLeafPartitioner".into()
        ))
    );
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn test_absent_keyspace_or_table() {
    let connector = cluster_with(MURMUR3, composite_key_table());
    let cluster = cluster_info(&connector);

    let err = cluster.resolve("nope", "tbl").await.unwrap_err();
    assert_eq!(
        err,
        ClusterInfoError::SchemaNotFound {
            keyspace: "nope".into(),
            table: "tbl".into()
        }
    );

    let err = cluster.resolve("ks", "missing").await.unwrap_err();
    assert_eq!(err.to_string(), "No such keyspace/table: ks/missing");
    assert_eq!(connector.open_sessions(), 0);
    assert_eq!(connector.sessions_opened(), 2);
}

#[tokio::test]
async fn test_names_are_case_sensitive() {
    let table = TableMetadata::new("Tracking", "PageViews")
        .column(ColumnDescriptor::new("visitorId", "uuid").partition_key())
        .column(ColumnDescriptor::new("url", "text"))
        .partition_key(["visitorId"]);
    let connector = cluster_with(MURMUR3, table);
    let cluster = cluster_info(&connector);

    let snapshot = cluster.resolve("Tracking", "PageViews").await.unwrap();
    assert_eq!(snapshot.partition_key_column_names(), vec!["visitorId"]);
    assert_eq!(
        snapshot.build_insert_statement(&["visitorId", "url"]).unwrap(),
        "INSERT INTO Tracking.PageViews (visitorId, url) VALUES (?, ?) USING TIMESTAMP ? AND TTL ?;"
    );

    assert!(matches!(
        cluster.resolve("tracking", "PageViews").await,
        Err(ClusterInfoError::SchemaNotFound { .. })
    ));
    assert!(matches!(
        cluster.resolve("Tracking", "pageviews").await,
        Err(ClusterInfoError::SchemaNotFound { .. })
    ));
}

#[tokio::test]
async fn test_names_with_embedded_quotes() {
    let table = TableMetadata::new("My\"Ks", "odd\"table")
        .column(ColumnDescriptor::new("id", "int").partition_key())
        .partition_key(["id"]);
    let connector = cluster_with(MURMUR3, table);
    let cluster = cluster_info(&connector);

    let snapshot = cluster.resolve("My\"Ks", "odd\"table").await.unwrap();
    assert_eq!(snapshot.keyspace(), "My\"Ks");
    assert_eq!(snapshot.table(), "odd\"table");
    assert_eq!(snapshot.partition_key_indexes(), &[0]);
    assert!(snapshot.cql_schema().starts_with("CREATE TABLE \"My\"\"Ks\".\"odd\"\"table\" ("));

    assert!(matches!(
        cluster.resolve("MyKs", "odd\"table").await,
        Err(ClusterInfoError::SchemaNotFound { .. })
    ));
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn test_table_without_partition_key_is_rejected() {
    let table = TableMetadata::new("ks", "t").column(ColumnDescriptor::new("a", "int"));
    let connector = cluster_with(MURMUR3, table);

    let result = cluster_info(&connector).resolve("ks", "t").await;
    assert_eq!(
        result,
        Err(ClusterInfoError::MetadataFormat(
            "table ks.t reports no partition key columns".into()
        ))
    );
    assert_eq!(connector.open_sessions(), 0);
}

#[tokio::test]
async fn test_connection_refused() {
    let connector = cluster_with(MURMUR3, composite_key_table()).refuse_connections("connection refused");
    let cluster = ClusterInfo::new(
        ConnectionConfig::new("10.9.9.9").port(9042),
        Arc::new(connector.clone()),
    );

    let err = cluster.resolve("ks", "tbl").await.unwrap_err();
    assert_eq!(
        err,
        ClusterInfoError::ConnectionFailure("10.9.9.9:9042: connection refused".into())
    );
}

#[tokio::test]
async fn test_invalid_config_fails_before_connecting() {
    let connector = cluster_with(MURMUR3, composite_key_table());
    let cluster = ClusterInfo::new(ConnectionConfig::new(""), Arc::new(connector.clone()));

    assert!(matches!(
        cluster.resolve("ks", "tbl").await,
        Err(ClusterInfoError::InvalidConfig(_))
    ));
    assert_eq!(connector.sessions_opened(), 0);
}

#[tokio::test]
async fn test_from_url_keeps_default_port() {
    let connector = cluster_with(MURMUR3, composite_key_table());
    let cluster = ClusterInfo::from_url("cql://10.0.0.1", Arc::new(connector)).unwrap();
    assert_eq!(cluster.config().port, None);
    assert!(cluster.resolve("ks", "tbl").await.is_ok());
}

#[tokio::test]
async fn test_statement_shapes() {
    let table = TableMetadata::new("ks", "tbl")
        .column(ColumnDescriptor::new("x", "int").partition_key())
        .column(ColumnDescriptor::new("y", "int"))
        .column(ColumnDescriptor::new("z", "int"))
        .partition_key(["x"]);
    let connector = cluster_with(MURMUR3, table);
    let snapshot = cluster_info(&connector).resolve("ks", "tbl").await.unwrap();

    assert_eq!(
        snapshot.build_insert_statement(&["x"]).unwrap(),
        "INSERT INTO ks.tbl (x) VALUES (?) USING TIMESTAMP ? AND TTL ?;"
    );
    assert_eq!(
        snapshot.build_insert_statement(&["x", "y", "z"]).unwrap(),
        "INSERT INTO ks.tbl (x, y, z) VALUES (?, ?, ?) USING TIMESTAMP ? AND TTL ?;"
    );

    let first = snapshot.build_insert_statement(&["z", "x"]).unwrap();
    let second = snapshot.build_insert_statement(&["z", "x"]).unwrap();
    assert_eq!(first, second);
    assert_eq!(snapshot.all_column_names(), snapshot.all_column_names());
}

#[tokio::test]
async fn test_snapshot_shared_across_tasks() {
    let connector = cluster_with(MURMUR3, composite_key_table());
    let snapshot = Arc::new(cluster_info(&connector).resolve("ks", "tbl").await.unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let snapshot = Arc::clone(&snapshot);
        handles.push(tokio::spawn(async move {
            let names = snapshot.all_column_names();
            (
                snapshot.build_insert_statement(&names).unwrap(),
                snapshot.partition_key_indexes().to_vec(),
            )
        }));
    }

    for handle in handles {
        let (statement, indexes) = handle.await.unwrap();
        assert_eq!(
            statement,
            "INSERT INTO ks.tbl (a, b, c) VALUES (?, ?, ?) USING TIMESTAMP ? AND TTL ?;"
        );
        assert_eq!(indexes, vec![1, 0]);
    }
}

#[tokio::test]
async fn test_independent_resolvers_in_parallel() {
    let orders = TableMetadata::new("shop", "orders")
        .column(ColumnDescriptor::new("id", "uuid").partition_key())
        .partition_key(["id"]);
    let items = TableMetadata::new("shop", "items")
        .column(ColumnDescriptor::new("sku", "text"))
        .column(ColumnDescriptor::new("store", "int").partition_key())
        .partition_key(["store"]);
    let connector = StaticMetadataConnector::new(
        ClusterMetadata::new("org.apache.cassandra.dht.RandomPartitioner")
            .host("a")
            .keyspace(KeyspaceMetadata::new("shop").with_table(orders).with_table(items)),
    );

    let first = cluster_info(&connector);
    let second = cluster_info(&connector);
    let (orders, items) = tokio::join!(
        tokio::spawn(async move { first.resolve("shop", "orders").await }),
        tokio::spawn(async move { second.resolve("shop", "items").await }),
    );

    assert_eq!(orders.unwrap().unwrap().partition_key_indexes(), &[0]);
    assert_eq!(items.unwrap().unwrap().partition_key_indexes(), &[1]);
    assert_eq!(connector.sessions_opened(), 2);
    assert_eq!(connector.open_sessions(), 0);
}

/// Session whose queries fail after connecting, counting closes.
struct FlakySession {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl MetadataSession for FlakySession {
    async fn keyspace(&self, _name: &str) -> cqlmeta::Result<Option<KeyspaceMetadata>> {
        Err(ClusterInfoError::ConnectionFailure("read timed out".into()))
    }

    async fn partitioner_class_name(&self) -> cqlmeta::Result<String> {
        Ok(MURMUR3.to_string())
    }

    async fn known_host_count(&self) -> cqlmeta::Result<usize> {
        Ok(1)
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct FlakyConnector {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl MetadataConnector for FlakyConnector {
    async fn connect(
        &self,
        _config: &ConnectionConfig,
    ) -> cqlmeta::Result<Box<dyn MetadataSession>> {
        Ok(Box::new(FlakySession {
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[tokio::test]
async fn test_session_released_on_transport_failure() {
    let closed = Arc::new(AtomicUsize::new(0));
    let cluster = ClusterInfo::new(
        ConnectionConfig::default(),
        Arc::new(FlakyConnector {
            closed: Arc::clone(&closed),
        }),
    );

    let err = cluster.resolve("ks", "tbl").await.unwrap_err();
    assert_eq!(err, ClusterInfoError::ConnectionFailure("read timed out".into()));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}
