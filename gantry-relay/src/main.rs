//! Gantry relay service binary
//!
//! Wires configuration, logging, the tool inventory and the relay
//! collaborators, then serves the HTTP transport until SIGTERM/SIGINT.
//!
//! The provider listing client and credential store are deployment
//! concerns; this binary ships the static fixtures (one shared
//! service-account credential, sample listing data in dry-run setups) and
//! real deployments embed the library with their own implementations.

use anyhow::Context;
use gantry_common::ProviderCredential;
use gantry_relay::config::GantryConfig;
use gantry_relay::discovery::StaticClientFactory;
use gantry_relay::http::{router, AppState};
use gantry_relay::logging;
use gantry_relay::relay::credentials::ServiceAccountCredentialStore;
use gantry_relay::relay::inventory::ToolInventory;
use gantry_relay::relay::runner::{DryRunToolRunner, ProcessToolRunner, ToolRunner};
use gantry_relay::relay::CommandRelay;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GantryConfig::load();
    let _log_guard = logging::init(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let inventory = if config.tools.dry_run {
        match ToolInventory::discover(&config.tools.dir) {
            Ok(inventory) => inventory,
            Err(err) => {
                warn!(error = %err, "no tool inventory; dry run continues with an empty set");
                ToolInventory::from_versions(&config.tools.dir, Vec::new())
            }
        }
    } else {
        ToolInventory::discover(&config.tools.dir)
            .context("tool inventory discovery failed")?
    };

    let runner: Arc<dyn ToolRunner> = if config.tools.dry_run {
        Arc::new(DryRunToolRunner::new(&config.tools.dir))
    } else {
        Arc::new(ProcessToolRunner::new(&config.tools.dir))
    };

    let token = std::env::var("GANTRY_PROVIDER_TOKEN").unwrap_or_default();
    let credentials = Arc::new(ServiceAccountCredentialStore::new(ProviderCredential::bearer(
        token,
    )));

    let relay = CommandRelay::new(
        credentials,
        Arc::new(StaticClientFactory),
        inventory,
        runner,
    );

    let app = router(AppState {
        relay: Arc::new(relay),
    });

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, dry_run = config.tools.dry_run, "gantry-relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("gantry-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
            _ = sigterm.recv() => info!("received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to register ctrl-c handler");
        info!("received Ctrl+C");
    }
}
