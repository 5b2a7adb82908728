//! onboardd — the onboarding catalog daemon.
//!
//! Serves the REST API over the three catalog collections (applications,
//! DevOps details, infrastructure details) and prepares a fresh data
//! directory.
//!
//! # Usage
//!
//! ```text
//! onboardd init --data-dir ./data
//! onboardd serve --port 8000 --data-dir ./data
//! onboardd --config onboard.toml serve
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Backend, OnboardConfig};

#[derive(Parser)]
#[command(name = "onboardd", about = "Application onboarding catalog daemon")]
struct Cli {
    /// Path to an onboard.toml configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Data directory for the catalog collections.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Storage backend.
        #[arg(long, value_enum)]
        backend: Option<Backend>,
    },
    /// Create any missing catalog collections.
    Init {
        /// Data directory for the catalog collections.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Storage backend.
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Environment to create in the infrastructure collection.
        /// Repeat for several; defaults to the configured list.
        #[arg(long = "environment")]
        environments: Vec<String>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,onboardd=debug,onboard=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = OnboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            backend,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            apply_storage_overrides(&mut config, data_dir, backend);
            run_serve(config).await
        }
        Command::Init {
            data_dir,
            backend,
            environments,
        } => {
            apply_storage_overrides(&mut config, data_dir, backend);
            if !environments.is_empty() {
                config.catalog.environments = environments;
            }
            run_init(config)
        }
    }
}

fn apply_storage_overrides(
    config: &mut OnboardConfig,
    data_dir: Option<PathBuf>,
    backend: Option<Backend>,
) {
    if let Some(data_dir) = data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(backend) = backend {
        config.storage.backend = backend;
    }
}

fn run_init(config: OnboardConfig) -> anyhow::Result<()> {
    let store = config.open_store()?;
    let created = store.seed(&config.catalog.environments)?;
    if created.is_empty() {
        info!(data_dir = ?config.storage.data_dir, "catalog already initialized");
    } else {
        for collection in &created {
            info!(%collection, "created");
        }
    }
    Ok(())
}

async fn run_serve(config: OnboardConfig) -> anyhow::Result<()> {
    info!(backend = ?config.storage.backend, "onboarding catalog starting");

    let store = config.open_store()?;
    info!(data_dir = ?config.storage.data_dir, "state store opened");

    let router = onboard_api::build_router(store);
    let addr = SocketAddr::new(config.server.bind, config.server.port);

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("onboarding catalog stopped");
    Ok(())
}
