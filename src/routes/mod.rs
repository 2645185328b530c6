// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::telemetry_repo::TelemetryRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) telemetry_repo: Arc<TelemetryRepo>,
    pub(crate) config: AppConfig,
}

pub fn app(telemetry_repo: Arc<TelemetryRepo>, config: AppConfig) -> Router {
    let state = AppState {
        telemetry_repo,
        config,
    };
    Router::new()
        .route("/", get(|| async { "coreconsole host telemetry" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/host/cpu/info", get(http::cpu_info_handler))
        .route("/api/host/memory/info", get(http::memory_info_handler))
        .route("/api/host/disk/info", get(http::disk_info_handler))
        .route("/api/host/nic/info", get(http::nic_info_handler))
        .route("/api/host/os/info", get(http::os_info_handler))
        .route("/api/host/cpu/usage", get(http::cpu_usage_handler))
        .route("/api/host/memory/usage", get(http::memory_usage_handler))
        .route("/api/host/disk/usage", get(http::disk_usage_handler))
        .route("/api/host/nic/usage", get(http::nic_usage_handler))
        .route("/ws/cpu", get(ws::ws_cpu)) // WS /ws/cpu
        .route("/ws/nic", get(ws::ws_nic)) // WS /ws/nic
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
