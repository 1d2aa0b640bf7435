//! x402-registry: read-only command line access to the registry.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use x402_registry::files::{read_directory_entry, read_pointer_message};
use x402_registry::{Registry, RegistryConfig, TopicId};

/// Discover x402 endpoints and their pricing.
#[derive(Parser, Debug)]
#[command(name = "x402-registry", version)]
#[command(about = "Query the x402 API registry and validate registry records")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the current directory entries
    List {
        /// Print the endpoint summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current pricing record of an endpoint
    Schema {
        /// Pointer topic of the endpoint
        topic: String,
    },
    /// Validate a directory entry document
    ValidateEntry { file: PathBuf },
    /// Validate a pricing record document
    ValidatePointer { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::List { json } => {
            let registry = Registry::mirror(RegistryConfig::from_env()?)?;
            let endpoints = registry.endpoint_summaries().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&endpoints)?);
            } else if endpoints.is_empty() {
                println!("no endpoints registered");
            } else {
                for e in &endpoints {
                    println!(
                        "{:<24} {:<7} {:>12} USDC  {}  (pointer {})",
                        e.id,
                        e.method.as_str(),
                        e.price_usdc.to_string(),
                        e.url,
                        e.pointer_topic_id
                    );
                }
            }
        }
        Command::Schema { topic } => {
            let topic = TopicId::parse(&topic).with_context(|| format!("invalid topic id {:?}", topic))?;
            let registry = Registry::mirror(RegistryConfig::from_env()?)?;
            let record = registry.endpoint_schema(&topic).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::ValidateEntry { file } => {
            let entry = read_directory_entry(&file)?;
            println!("valid directory entry: {}", entry.id);
        }
        Command::ValidatePointer { file } => {
            let record = read_pointer_message(&file)?;
            println!(
                "valid pricing record: version {}, {} USDC",
                record.version, record.price_usdc
            );
        }
    }

    Ok(())
}
