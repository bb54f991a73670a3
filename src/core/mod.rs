pub mod error;
pub mod identifier;
pub mod partitioner;
pub mod types;

pub use error::{ClusterInfoError, Result};
pub use identifier::{escape_identifier, normalize_identifier, quote_identifier};
pub use partitioner::Partitioner;
pub use types::{ColumnDescriptor, ColumnKind};
