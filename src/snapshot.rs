use crate::core::{ClusterInfoError, ColumnDescriptor, Partitioner, Result};
use crate::metadata::TableMetadata;
use crate::statement::InsertStatement;
use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::info;

/// What a bulk writer needs to know about one table, read once from the cluster.
///
/// Immutable after construction; share it behind an `Arc` between writer tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSchemaSnapshot {
    keyspace: String,
    table: String,
    partitioner: Partitioner,
    node_count: NonZeroUsize,
    cql_schema: String,
    columns: Vec<ColumnDescriptor>,
    partition_key_indexes: Vec<usize>,
}

impl ClusterSchemaSnapshot {
    /// Builds a snapshot from metadata already fetched for `keyspace`.
    ///
    /// Fails without producing anything when the partitioner is unknown, the
    /// host count is zero, the table declares no partition key, or a partition
    /// key column is not in the column list.
    pub fn from_metadata(
        keyspace: &str,
        table: &TableMetadata,
        partitioner_class_name: &str,
        host_count: usize,
    ) -> Result<Self> {
        let partitioner = Partitioner::from_class_name(partitioner_class_name)?;
        let node_count = NonZeroUsize::new(host_count).ok_or_else(|| {
            ClusterInfoError::InvalidTopology(format!(
                "coordinator reports no hosts for {}.{}",
                keyspace, table.name
            ))
        })?;
        if table.partition_key_columns().is_empty() {
            return Err(ClusterInfoError::MetadataFormat(format!(
                "table {}.{} reports no partition key columns",
                keyspace, table.name
            )));
        }
        let partition_key_indexes = map_partition_key(table.columns(), table.partition_key_columns())?;

        Ok(Self {
            keyspace: keyspace.to_string(),
            table: table.name.clone(),
            partitioner,
            node_count,
            cql_schema: table.as_cql_query(),
            columns: table.columns().to_vec(),
            partition_key_indexes,
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    /// The partitioner's fully qualified class name.
    ///
    /// Always the `org.apache.cassandra.dht.*` form, even when the cluster
    /// reported the bare class name (e.g. `Murmur3Partitioner`).
    pub fn partitioner_class_name(&self) -> String {
        self.partitioner.class_name()
    }

    /// Nodes known to the coordinator at resolution time.
    pub fn node_count(&self) -> usize {
        self.node_count.get()
    }

    /// CQL that creates the table.
    pub fn cql_schema(&self) -> &str {
        &self.cql_schema
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Position in [`columns`](Self::columns) of each partition key component,
    /// in declared key order.
    pub fn partition_key_indexes(&self) -> &[usize] {
        &self.partition_key_indexes
    }

    pub fn partition_key_column_names(&self) -> Vec<&str> {
        self.partition_key_indexes
            .iter()
            .map(|&i| self.columns[i].name.as_str())
            .collect()
    }

    /// Every column name in the order the cluster reports them.
    pub fn all_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Picks the partition key components out of a row laid out in column order.
    ///
    /// Returns `None` if the row is too short to hold every key component.
    pub fn partition_key_of<'a, T>(&self, row: &'a [T]) -> Option<Vec<&'a T>> {
        self.partition_key_indexes
            .iter()
            .map(|&i| row.get(i))
            .collect()
    }

    pub fn insert_statement<S: AsRef<str>>(&self, column_names: &[S]) -> Result<InsertStatement> {
        InsertStatement::new(&self.keyspace, &self.table, column_names)
    }

    /// Insert statement text writing `column_names` in the given order.
    pub fn build_insert_statement<S: AsRef<str>>(&self, column_names: &[S]) -> Result<String> {
        self.insert_statement(column_names).map(|stmt| stmt.to_cql())
    }

    /// Insert statement text over every column, in cluster order.
    pub fn build_insert_statement_for_all_columns(&self) -> Result<String> {
        self.build_insert_statement(&self.all_column_names())
    }
}

/// Locates each partition key component in `columns` by exact name.
fn map_partition_key(columns: &[ColumnDescriptor], key_names: &[String]) -> Result<Vec<usize>> {
    let mut indexes = Vec::with_capacity(key_names.len());
    for key_name in key_names {
        let index = columns
            .iter()
            .position(|c| &c.name == key_name)
            .ok_or_else(|| ClusterInfoError::PartitionKeyColumnMissing(key_name.clone()))?;
        info!(column = %key_name, index, "partition key column");
        indexes.push(index);
    }
    Ok(indexes)
}
