use crate::core::{ClusterInfoError, Result};
use std::time::Duration;

const URL_SCHEME: &str = "cql://";

/// Coordinates of the coordinator node used for the metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Contact point (host name or address of any node in the cluster)
    pub host: String,

    /// Native protocol port; `None` leaves the choice to the connector
    pub port: Option<u16>,

    /// Connection timeout handed to the connector
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a configuration for a contact point on the client-default port
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            port: None,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the port from an optional value (`None` means client default)
    pub fn maybe_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `host` or `host:port`, the form drivers take as a contact point
    pub fn contact_point(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Parse from connection string
    ///
    /// Format: "cql://host[:port]"
    ///
    /// # Examples
    ///
    /// ```
    /// use cqlmeta::ConnectionConfig;
    ///
    /// let config = ConnectionConfig::from_url("cql://cass-1.example.com:9042").unwrap();
    /// assert_eq!(config.port, Some(9042));
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let rest = url.strip_prefix(URL_SCHEME).ok_or_else(|| {
            ClusterInfoError::InvalidConfig(format!("URL must start with '{}'", URL_SCHEME))
        })?;
        let rest = rest.trim_end_matches('/');

        let config = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    ClusterInfoError::InvalidConfig(format!("Invalid port '{}'", port))
                })?;
                Self::new(host).port(port)
            }
            None => Self::new(rest),
        };

        config.validate()?;
        Ok(config)
    }

    /// Convert to connection string
    pub fn to_url(&self) -> String {
        format!("{}{}", URL_SCHEME, self.contact_point())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClusterInfoError::InvalidConfig(
                "Host cannot be empty".to_string(),
            ));
        }

        if self.port == Some(0) {
            return Err(ClusterInfoError::InvalidConfig(
                "Port must be > 0".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(ClusterInfoError::InvalidConfig(
                "connect_timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new("localhost")
    }
}
