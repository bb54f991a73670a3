pub mod config;

use crate::core::Result;
use crate::metadata::KeyspaceMetadata;
use async_trait::async_trait;
use config::ConnectionConfig;
use std::ops::Deref;
use tracing::debug;

/// Opens metadata sessions against a cluster coordinator.
///
/// Implemented by an adapter over whatever CQL client the job uses; the
/// resolver never talks to sockets itself.
#[async_trait]
pub trait MetadataConnector: Send + Sync {
    /// Connects to the contact point in `config`. Transport errors are
    /// reported as `ClusterInfoError::ConnectionFailure`.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn MetadataSession>>;
}

/// Metadata view of the cluster through one connected session.
#[async_trait]
pub trait MetadataSession: Send + Sync {
    /// Keyspace metadata by CQL identifier. Quoted identifiers are matched
    /// exactly; unquoted ones are folded to lower case before matching.
    async fn keyspace(&self, name: &str) -> Result<Option<KeyspaceMetadata>>;

    /// Class name of the partitioner the cluster is configured with.
    async fn partitioner_class_name(&self) -> Result<String>;

    /// Number of hosts the coordinator currently knows about.
    async fn known_host_count(&self) -> Result<usize>;

    /// Releases the session. Must be idempotent.
    fn close(&mut self);
}

/// Scoped metadata session, closed when dropped
///
/// Covers every exit path of a lookup, including early returns on validation
/// errors and a dropped future.
pub struct SessionGuard {
    session: Box<dyn MetadataSession>,
    contact_point: String,
}

impl SessionGuard {
    pub async fn open(
        connector: &dyn MetadataConnector,
        config: &ConnectionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let contact_point = config.contact_point();
        debug!(contact_point = %contact_point, "opening metadata session");
        let session = connector.connect(config).await?;
        Ok(Self {
            session,
            contact_point,
        })
    }

    pub fn contact_point(&self) -> &str {
        &self.contact_point
    }
}

impl Deref for SessionGuard {
    type Target = dyn MetadataSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        debug!(contact_point = %self.contact_point, "closing metadata session");
        self.session.close();
    }
}
