//! stratusctl — the Stratus operator CLI.
//!
//! Fetches the backend's flat resource snapshot, materializes it into
//! the linked graph, and renders the operator views. Mutations go
//! through the backend's whole-document protocol: every change returns
//! a full replacement snapshot, which is re-materialized before
//! rendering.
//!
//! # Usage
//!
//! ```text
//! stratusctl --api-url http://127.0.0.1:8080 summary
//! stratusctl buckets
//! stratusctl lb routes
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use stratus_client::ConsoleClient;
use stratus_model::ConsoleConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "stratusctl",
    about = "Stratus — operator console for the function-and-storage platform",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Base URL of the backend. Overrides the config file.
    #[arg(long)]
    api_url: Option<String>,

    /// Path to stratus.toml.
    #[arg(long, default_value = "stratus.toml")]
    config: PathBuf,

    /// Request timeout in seconds. Overrides the config file.
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Platform-wide headline counts.
    Summary,
    /// List clusters with zones and deployment counts.
    Clusters,
    /// List serverless function deployments.
    Faas,
    /// List storage deployments.
    Storage,
    /// List buckets with replication state.
    Buckets,
    /// List objects.
    Objects,
    /// Load-balancing configuration.
    Lb {
        #[command(subcommand)]
        action: LbAction,
    },
    /// Upload a file into a bucket.
    Upload {
        /// Target bucket id.
        #[arg(long)]
        bucket: i64,
        /// File to upload.
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum LbAction {
    /// Show settings and routes with their override status.
    Routes,
    /// Replace the editable settings (policy + match header).
    SetSettings {
        #[arg(long)]
        policy: String,
        #[arg(long)]
        match_header: String,
    },
    /// Add or replace the override for one bucket's route.
    SetOverride {
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        policy: String,
        /// Upstream URLs, repeatable.
        #[arg(long)]
        upstream: Vec<String>,
    },
    /// Remove the override for one bucket's route.
    ClearOverride {
        #[arg(long)]
        bucket: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stratus_graph=debug,stratus_client=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        ConsoleConfig::from_file(&cli.config)?
    } else {
        ConsoleConfig::default()
    };
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    let client = ConsoleClient::new(&config.api_url, Duration::from_secs(config.timeout_secs))?;

    match cli.command {
        Commands::Summary => commands::summary(&client).await,
        Commands::Clusters => commands::clusters(&client).await,
        Commands::Faas => commands::faas(&client).await,
        Commands::Storage => commands::storage(&client).await,
        Commands::Buckets => commands::buckets(&client).await,
        Commands::Objects => commands::objects(&client).await,
        Commands::Lb { action } => match action {
            LbAction::Routes => commands::lb_routes(&client).await,
            LbAction::SetSettings {
                policy,
                match_header,
            } => commands::lb_set_settings(&client, policy, match_header).await,
            LbAction::SetOverride {
                bucket,
                policy,
                upstream,
            } => commands::lb_set_override(&client, bucket, policy, upstream).await,
            LbAction::ClearOverride { bucket } => {
                commands::lb_clear_override(&client, bucket).await
            }
        },
        Commands::Upload { bucket, file } => commands::upload(&client, bucket, &file).await,
    }
}
