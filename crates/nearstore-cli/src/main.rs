mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nearstore-cli")]
#[command(about = "Nearby-store search and delivery quotes from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find stores near a postal code and quote delivery for each
    Search {
        /// Customer postal code (CEP), with or without hyphen
        #[arg(long)]
        cep: String,
        /// Maximum number of stores to return
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Number of ranked stores to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// Resolve a postal code to a coordinate
    Resolve {
        #[arg(long)]
        cep: String,
    },
    /// Ask the carrier for quotes between two postal codes
    Quote {
        /// Origin postal code
        #[arg(long)]
        from: String,
        /// Destination postal code
        #[arg(long)]
        to: String,
    },
    /// Validate the store catalog file
    CheckCatalog {
        #[arg(long, env = "NEARSTORE_CATALOG_PATH", default_value = "./config/stores.yaml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { cep, limit, offset } => {
            let config = nearstore_core::load_app_config()?;
            commands::run_search(&config, &cep, limit, offset).await
        }
        Commands::Resolve { cep } => {
            let config = nearstore_core::load_app_config()?;
            commands::run_resolve(&config, &cep).await
        }
        Commands::Quote { from, to } => {
            let config = nearstore_core::load_app_config()?;
            commands::run_quote(&config, &from, &to).await
        }
        Commands::CheckCatalog { path } => commands::run_check_catalog(&path),
    }
}
