//! API route definitions.

use super::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/reasons", get(reasons))
        .route("/metrics", get(metrics))
        .route("/results", get(results))
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({
        "data": data,
        "meta": {
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

fn no_cycle_yet() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "data": null, "meta": { "message": "no completed cycle yet" } })),
    )
}

async fn status(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .with_latest(|latest| {
            envelope(json!({
                "status": latest.report.status,
                "checked_at": latest.report.checked_at,
                "duration_secs": latest.duration.as_secs(),
            }))
        })
        .await
        .ok_or_else(no_cycle_yet)
}

async fn reasons(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .with_latest(|latest| envelope(json!(latest.report.reasons)))
        .await
        .ok_or_else(no_cycle_yet)
}

async fn metrics(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .with_latest(|latest| envelope(json!(latest.report.metrics)))
        .await
        .ok_or_else(no_cycle_yet)
}

async fn results(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .with_latest(|latest| envelope(latest.report.results.clone()))
        .await
        .ok_or_else(no_cycle_yet)
}
