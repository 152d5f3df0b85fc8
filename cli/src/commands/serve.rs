// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `vantage serve`: HTTP gateway over the in-process backends

use anyhow::{Context, Result};
use clap::Args;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vantage_core::{
    application::{Gateway, StandardStorageService, StorageService},
    domain::gateway_config::GatewayConfigManifest,
    infrastructure::{
        InMemoryAgentRegistry, InMemoryApplicationLifecycle, InMemoryMonitoringControl,
        InMemoryTelemetryRepository,
    },
    presentation::api,
};

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Level used until the configured subscriber is installed
const BOOTSTRAP_LOG_LEVEL: &str = "info";

pub async fn run(args: ServeArgs, config_path: Option<PathBuf>, log_level: Option<String>) -> Result<()> {
    let bootstrap = crate::bootstrap_subscriber(
        log_level.as_deref().unwrap_or(BOOTSTRAP_LOG_LEVEL),
        std::io::stderr,
    )?;
    let config = tracing::subscriber::with_default(bootstrap, || load_config(&args, config_path))?;

    let logging = &config.spec.observability.logging;
    crate::init_logging(log_level.as_deref().unwrap_or(&logging.level), &logging.format)?;
    info!("Vantage gateway starting: name={}", config.metadata.name);

    let metrics = &config.spec.observability.metrics;
    if metrics.enabled {
        let addr: SocketAddr = format!("{}:{}", config.spec.network.bind_address, metrics.port)
            .parse()
            .context("Invalid metrics listen address")?;
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Metrics exposed on {}", addr);
    }

    let repository = Arc::new(InMemoryTelemetryRepository::new());
    let storage: Arc<dyn StorageService> = Arc::new(StandardStorageService::new(repository));
    let gateway = Gateway::new(
        Arc::new(InMemoryAgentRegistry::new(storage.clone())),
        Arc::new(InMemoryMonitoringControl::new()),
        storage.clone(),
        Arc::new(InMemoryApplicationLifecycle::new(storage)),
    );

    let shutdown = CancellationToken::new();
    let app = api::app(gateway, config.spec.requests.default_timeout(), shutdown.clone());

    let addr = format!("{}:{}", config.spec.network.bind_address, config.spec.network.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .context("HTTP server failed")?;

    info!("Gateway shutting down");

    Ok(())
}

fn load_config(args: &ServeArgs, config_path: Option<PathBuf>) -> Result<GatewayConfigManifest> {
    let mut config = GatewayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    if let Some(host) = &args.host {
        config.spec.network.bind_address = host.clone();
    }
    if let Some(port) = args.port {
        config.spec.network.port = port;
    }
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
