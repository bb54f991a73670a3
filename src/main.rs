use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cqlmeta::{ClusterInfo, ClusterMetadata, ClusterSchemaSnapshot, ConnectionConfig, StaticMetadataConnector};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cqlmeta")]
#[command(about = "Inspect the bulk-load view of a CQL table from a cluster metadata dump")]
struct Cli {
    /// JSON dump of cluster metadata
    #[arg(long)]
    metadata: PathBuf,
    /// Contact point host
    #[arg(long, default_value = "localhost", conflicts_with = "url")]
    host: String,
    /// Contact point port (client default when omitted)
    #[arg(long, conflicts_with = "url")]
    port: Option<u16>,
    /// Contact point as cql://host[:port]
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    keyspace: String,
    #[arg(long)]
    table: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Partitioner, node count and partition key layout
    Describe {
        #[arg(long)]
        json: bool,
    },
    /// CQL that creates the table
    Schema,
    /// Insert statement for the given columns (all columns when omitted)
    Statement {
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let metadata = ClusterMetadata::from_path(&cli.metadata)
        .with_context(|| format!("loading metadata from {}", cli.metadata.display()))?;
    let connector = Arc::new(StaticMetadataConnector::new(metadata));
    let config = match &cli.url {
        Some(url) => ConnectionConfig::from_url(url)?,
        None => ConnectionConfig::new(&cli.host).maybe_port(cli.port),
    };

    let snapshot = ClusterInfo::new(config, connector)
        .resolve(&cli.keyspace, &cli.table)
        .await
        .with_context(|| format!("resolving {}.{}", cli.keyspace, cli.table))?;

    match cli.command {
        Command::Describe { json } => describe(&snapshot, json)?,
        Command::Schema => println!("{}", snapshot.cql_schema()),
        Command::Statement { columns } => {
            let statement = if columns.is_empty() {
                snapshot.build_insert_statement_for_all_columns()?
            } else {
                snapshot.build_insert_statement(&columns)?
            };
            println!("{}", statement);
        }
    }

    Ok(())
}

fn describe(snapshot: &ClusterSchemaSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("table:       {}.{}", snapshot.keyspace(), snapshot.table());
    println!("partitioner: {}", snapshot.partitioner_class_name());
    println!("nodes:       {}", snapshot.node_count());
    println!("columns:     {}", snapshot.all_column_names().join(", "));
    let key: Vec<String> = snapshot
        .partition_key_column_names()
        .iter()
        .zip(snapshot.partition_key_indexes())
        .map(|(name, index)| format!("{}@{}", name, index))
        .collect();
    println!("key:         {}", key.join(", "));
    Ok(())
}
