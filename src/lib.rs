//! howfucked -- continuous health monitoring for global Internet routing
//! and naming infrastructure.
//!
//! On a fixed cadence the engine ingests BGP table, RPKI validation, and
//! RIPE Atlas measurement snapshots, baselines every observed entity
//! against a bounded rolling history, folds detected anomalies into a
//! weighted score, and classifies the result onto a fixed status ladder.

pub mod api;
pub mod collect;
pub mod config;
pub mod detect;
pub mod engine;
pub mod history;
pub mod output;
pub mod score;

use anyhow::Result;
use config::Config;
use std::sync::Arc;

/// Start the daemon: monitor loop plus read-only status API.
pub async fn serve(bind: &str, cfg: Config) -> Result<()> {
    let cfg = Arc::new(cfg);
    let state = api::state::AppState::new();

    let monitor_state = state.clone();
    let monitor_cfg = cfg.clone();
    tokio::spawn(async move {
        if let Err(err) = engine::run(monitor_cfg, monitor_state).await {
            tracing::error!(error = %err, "monitor loop exited");
        }
    });

    let addr: std::net::SocketAddr = bind.parse()?;
    let app = api::router(state);

    tracing::info!(%addr, "howfucked listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run exactly one evaluation cycle against the live providers and return
/// the report. Used by the `check` subcommand.
pub async fn check_once(cfg: Config) -> Result<engine::CycleReport> {
    let cfg = Arc::new(cfg);
    let providers = collect::Providers::new(&cfg)?;
    let mut engine = engine::Engine::new(cfg.clone());
    let inputs = providers.gather(&cfg).await;
    Ok(engine.evaluate(&inputs))
}
