//! Serve command: run the HTTP endpoint until Ctrl-C.

use anyhow::{Context, Result};
use sgate_core::config::GateConfig;
use sgate_core::gate::AccessPolicy;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::server;

pub async fn run_serve(cfg: &GateConfig) -> Result<()> {
    let addr: SocketAddr = cfg
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", cfg.bind))?;
    let gate = cfg.build_gate().context("invalid access configuration")?;

    if !cfg.scripts_dir.is_dir() {
        tracing::warn!(
            "scripts directory {} does not exist; every script will be reported missing",
            cfg.scripts_dir.display()
        );
    }
    let policy = match gate.policy() {
        AccessPolicy::Classifier => "classifier",
        AccessPolicy::SharedKey(_) => "shared_key",
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(
        %addr,
        policy,
        scripts_dir = %cfg.scripts_dir.display(),
        "sgate listening"
    );
    println!("sgate listening on http://{addr}/api/script/<name>");

    axum::serve(listener, server::router(Arc::new(gate)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("sgate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
