use super::KeyspaceMetadata;
use crate::connection::config::ConnectionConfig;
use crate::connection::{MetadataConnector, MetadataSession};
use crate::core::{ClusterInfoError, Result, normalize_identifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Point-in-time dump of cluster metadata.
///
/// ```json
/// {
///   "partitioner": "org.apache.cassandra.dht.Murmur3Partitioner",
///   "hosts": ["10.0.0.1", "10.0.0.2"],
///   "keyspaces": [{ "name": "ks", "tables": [ ... ] }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    pub partitioner: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub keyspaces: Vec<KeyspaceMetadata>,
}

impl ClusterMetadata {
    pub fn new(partitioner: impl Into<String>) -> Self {
        Self {
            partitioner: partitioner.into(),
            hosts: Vec::new(),
            keyspaces: Vec::new(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into());
        self
    }

    pub fn keyspace(mut self, keyspace: KeyspaceMetadata) -> Self {
        self.keyspaces.push(keyspace);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClusterInfoError::MetadataFormat(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    fn find_keyspace(&self, identifier: &str) -> Option<&KeyspaceMetadata> {
        let name = normalize_identifier(identifier);
        self.keyspaces.iter().find(|ks| ks.name == name)
    }
}

#[derive(Debug, Default)]
struct SessionCounters {
    opened: AtomicUsize,
    open: AtomicUsize,
}

/// Metadata connector backed by a [`ClusterMetadata`] value held in memory.
///
/// Serves metadata dumps to the CLI and stands in for a live cluster in tests.
#[derive(Debug, Clone)]
pub struct StaticMetadataConnector {
    metadata: Arc<ClusterMetadata>,
    refusal: Option<String>,
    counters: Arc<SessionCounters>,
}

impl StaticMetadataConnector {
    pub fn new(metadata: ClusterMetadata) -> Self {
        Self {
            metadata: Arc::new(metadata),
            refusal: None,
            counters: Arc::new(SessionCounters::default()),
        }
    }

    /// Makes every connection attempt fail with the given reason.
    pub fn refuse_connections(mut self, reason: impl Into<String>) -> Self {
        self.refusal = Some(reason.into());
        self
    }

    /// Sessions handed out so far.
    pub fn sessions_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Sessions handed out and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataConnector for StaticMetadataConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn MetadataSession>> {
        if let Some(reason) = &self.refusal {
            return Err(ClusterInfoError::ConnectionFailure(format!(
                "{}: {}",
                config.contact_point(),
                reason
            )));
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticMetadataSession {
            metadata: Arc::clone(&self.metadata),
            counters: Arc::clone(&self.counters),
            closed: false,
        }))
    }
}

struct StaticMetadataSession {
    metadata: Arc<ClusterMetadata>,
    counters: Arc<SessionCounters>,
    closed: bool,
}

impl StaticMetadataSession {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ClusterInfoError::ConnectionFailure(
                "session is closed".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataSession for StaticMetadataSession {
    async fn keyspace(&self, name: &str) -> Result<Option<KeyspaceMetadata>> {
        self.ensure_open()?;
        Ok(self.metadata.find_keyspace(name).cloned())
    }

    async fn partitioner_class_name(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.metadata.partitioner.clone())
    }

    async fn known_host_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.metadata.hosts.len())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
