// WebSocket handlers and stream logic

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::telemetry_repo::TelemetryRepo;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
enum UsageStream {
    Cpu,
    Nic,
}

impl UsageStream {
    fn label(self) -> &'static str {
        match self {
            UsageStream::Cpu => "CPU",
            UsageStream::Nic => "NIC",
        }
    }

    async fn sample_json(self, repo: &TelemetryRepo) -> anyhow::Result<String> {
        let json = match self {
            UsageStream::Cpu => serde_json::to_string(&repo.cpu_usage().await?)?,
            UsageStream::Nic => serde_json::to_string(&repo.nic_usage().await?)?,
        };
        Ok(json)
    }
}

pub(super) async fn ws_cpu(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let repo = state.telemetry_repo.clone();
    let interval_ms = state.config.streaming.cpu_usage_frequency_ms;
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_usage(socket, repo, interval_ms, UsageStream::Cpu).await {
            tracing::info!("CPU stream error: {}", e);
        }
    })
}

pub(super) async fn ws_nic(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let repo = state.telemetry_repo.clone();
    let interval_ms = state.config.streaming.nic_usage_frequency_ms;
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_usage(socket, repo, interval_ms, UsageStream::Nic).await {
            tracing::info!("NIC stream error: {}", e);
        }
    })
}

/// NIC streams share the repo's rate tracker with HTTP callers, so rates are always
/// relative to the most recent NIC usage query from any client.
async fn stream_usage(
    mut socket: WebSocket,
    repo: Arc<TelemetryRepo>,
    interval_ms: u64,
    kind: UsageStream,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to {} stream", kind.label());
    let mut tick = tokio::time::interval(Duration::from_millis(interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let json = match kind.sample_json(&repo).await {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::warn!(error = %e, "{} sample failed, skipping tick", kind.label());
                        continue;
                    }
                };
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
