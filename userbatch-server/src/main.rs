//! userbatch-server - HTTP API for bulk user management
//!
//! Serves `GET/POST/DELETE /api/users` over a SQLite database kept in the
//! resolved root folder.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use userbatch_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use userbatch_common::db::init_database;
use userbatch_server::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "userbatch-server", version, about = "HTTP API for bulk user management")]
struct Args {
    /// Root folder holding userbatch.db
    #[arg(long, env = "USERBATCH_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting userbatch-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_config(config.clone())
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let mut server = config.server;
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(server.bind_address()).await?;
    info!("userbatch-server listening on http://{}", listener.local_addr()?);
    info!("Health check: http://{}/health", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
