use super::{ClusterInfoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DHT_PACKAGE: &str = "org.apache.cassandra.dht.";

/// Partitioning strategies a bulk writer knows how to compute tokens for.
///
/// Serialized as its fully qualified class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Partitioner {
    Murmur3,
    Random,
    ByteOrdered,
    OrderPreserving,
}

impl Partitioner {
    pub const ALL: [Partitioner; 4] = [
        Partitioner::Murmur3,
        Partitioner::Random,
        Partitioner::ByteOrdered,
        Partitioner::OrderPreserving,
    ];

    /// Simple class name, e.g. `Murmur3Partitioner`.
    pub fn simple_name(&self) -> &'static str {
        match self {
            Partitioner::Murmur3 => "Murmur3Partitioner",
            Partitioner::Random => "RandomPartitioner",
            Partitioner::ByteOrdered => "ByteOrderedPartitioner",
            Partitioner::OrderPreserving => "OrderPreservingPartitioner",
        }
    }

    /// Fully qualified class name as reported by the cluster.
    pub fn class_name(&self) -> String {
        format!("{}{}", DHT_PACKAGE, self.simple_name())
    }

    /// Whether tokens preserve key order (no hashing).
    pub fn is_order_preserving(&self) -> bool {
        matches!(self, Partitioner::ByteOrdered | Partitioner::OrderPreserving)
    }

    /// Resolves a partitioner identifier reported by cluster metadata.
    ///
    /// Accepts the fully qualified class name or the bare class name.
    pub fn from_class_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let simple = trimmed.strip_prefix(DHT_PACKAGE).unwrap_or(trimmed);
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.simple_name() == simple)
            .ok_or_else(|| ClusterInfoError::UnknownPartitioner(name.to_string()))
    }
}

impl FromStr for Partitioner {
    type Err = ClusterInfoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_class_name(s)
    }
}

impl TryFrom<String> for Partitioner {
    type Error = ClusterInfoError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_class_name(&value)
    }
}

impl From<Partitioner> for String {
    fn from(value: Partitioner) -> Self {
        value.class_name()
    }
}

impl fmt::Display for Partitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DHT_PACKAGE)?;
        f.write_str(self.simple_name())
    }
}

/// Builds the routing key hashed by the partitioner from serialized key components.
///
/// A single component is used verbatim. Composite keys use the CQL composite
/// layout: per component a big-endian u16 length, the bytes, and a `0x00`
/// end-of-component marker.
pub fn routing_key(components: &[&[u8]]) -> Result<Vec<u8>> {
    if let [single] = components {
        return Ok(single.to_vec());
    }

    let capacity = components.iter().map(|c| c.len() + 3).sum();
    let mut key = Vec::with_capacity(capacity);
    for component in components {
        let len = u16::try_from(component.len()).map_err(|_| {
            ClusterInfoError::InvalidConfig(format!(
                "partition key component of {} bytes exceeds {} bytes",
                component.len(),
                u16::MAX
            ))
        })?;
        key.extend_from_slice(&len.to_be_bytes());
        key.extend_from_slice(component);
        key.push(0);
    }
    Ok(key)
}
