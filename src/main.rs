use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use curbside::config::CurbsideConfig;
use curbside::report::ReportStatus;

mod cmd;

#[derive(Parser)]
#[command(name = "curbside")]
#[command(version, about = "Municipal garbage-report dashboard")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Bearer token for the backend (overrides CURBSIDE_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to the config file. Defaults to ./curbside.toml if present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the report table
    List,
    /// Run the deadline watcher over the live table, re-rendering on change
    Watch {
        /// Stop after this many seconds (runs until Ctrl-C if omitted)
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Update a report's status and/or deadline
    Update {
        /// Report id
        id: String,
        /// New status: pending or completed
        #[arg(short, long)]
        status: ReportStatus,
        /// New promised completion time (RFC 3339 or YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Delete a report
    Delete {
        /// Report id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CurbsideConfig::load_or_default(cli.config.as_deref())?
        .overlay_env()
        .overlay(cli.backend_url.clone(), cli.token.clone());

    match &cli.command {
        Commands::List => cmd::cmd_list(&config).await?,
        Commands::Watch { duration_secs } => cmd::cmd_watch(&config, *duration_secs).await?,
        Commands::Update {
            id,
            status,
            deadline,
        } => cmd::cmd_update(&config, id, *status, deadline.as_deref()).await?,
        Commands::Delete { id } => cmd::cmd_delete(&config, id).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if verbose { "curbside=debug" } else { "curbside=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
