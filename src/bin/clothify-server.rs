// ABOUTME: Server binary for the Clothify assistant backend
// ABOUTME: Loads configuration, builds shared resources and serves the API until ctrl-c or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

//! # Clothify Server Binary

use anyhow::{Context, Result};
use clap::Parser;
use clothify::{
    config::ServerConfig, logging::LoggingConfig, resources::ServerResources,
    routes::build_router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "clothify-server")]
#[command(about = "Clothify - fashion and skincare chat assistant API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let address = format!("{}:{}", config.host, config.http_port);
    let (resources, otp_store) = ServerResources::from_config(config)
        .await
        .context("Failed to initialize server resources")?;
    let app = build_router(Arc::new(resources));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {address}"))?;
    info!("Clothify listening on {address}");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    otp_store.shutdown().await;

    if let Err(e) = served {
        error!("Server error: {e}");
        return Err(e).context("Server error");
    }
    info!("Clothify stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, stopping...");
}
