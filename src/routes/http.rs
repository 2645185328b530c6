// GET handlers: version, host info and usage

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::AppState;
use crate::error::TelemetryError;
use crate::version::{NAME, VERSION};

/// GET /version: service name and version from Cargo metadata.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// A probe failure only fails its own category: 503 with `{category, error}`.
fn respond<T: Serialize>(category: &'static str, result: Result<T, TelemetryError>) -> Response {
    match result {
        Ok(v) => Json(v).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, category, "telemetry query failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "category": category,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub(super) async fn cpu_info_handler(State(state): State<AppState>) -> Response {
    let r = state.telemetry_repo.cpu_info().await;
    respond("cpu", r.map(|v| v.as_ref().clone()))
}

pub(super) async fn memory_info_handler(State(state): State<AppState>) -> Response {
    let r = state.telemetry_repo.memory_info().await;
    respond("memory", r.map(|v| v.as_ref().clone()))
}

pub(super) async fn disk_info_handler(State(state): State<AppState>) -> Response {
    let r = state.telemetry_repo.disk_info().await;
    respond("disk", r.map(|v| v.as_ref().clone()))
}

pub(super) async fn nic_info_handler(State(state): State<AppState>) -> Response {
    let r = state.telemetry_repo.nic_info().await;
    respond("nic", r.map(|v| v.as_ref().clone()))
}

pub(super) async fn os_info_handler(State(state): State<AppState>) -> Response {
    let r = state.telemetry_repo.os_info().await;
    respond("os", r.map(|v| v.as_ref().clone()))
}

pub(super) async fn cpu_usage_handler(State(state): State<AppState>) -> Response {
    respond("cpu", state.telemetry_repo.cpu_usage().await)
}

pub(super) async fn memory_usage_handler(State(state): State<AppState>) -> Response {
    respond("memory", state.telemetry_repo.memory_usage().await)
}

pub(super) async fn disk_usage_handler(State(state): State<AppState>) -> Response {
    respond("disk", state.telemetry_repo.disk_usage().await)
}

pub(super) async fn nic_usage_handler(State(state): State<AppState>) -> Response {
    respond("nic", state.telemetry_repo.nic_usage().await)
}
