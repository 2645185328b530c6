use serde::Deserialize;
use std::time::Duration;

use crate::telemetry_repo::TelemetrySettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// How long static host info (CPU, memory, disk, NIC, OS) is served from cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Per-core CPU sampling window; every CPU usage query blocks this long.
    #[serde(default = "default_cpu_sample_window_ms")]
    pub cpu_sample_window_ms: u64,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cpu_sample_window_ms() -> u64 {
    100
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            cpu_sample_window_ms: default_cpu_sample_window_ms(),
        }
    }
}

impl TelemetryConfig {
    pub fn settings(&self) -> TelemetrySettings {
        TelemetrySettings {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cpu_sample_window: Duration::from_millis(self.cpu_sample_window_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    pub cpu_usage_frequency_ms: u64,
    pub nic_usage_frequency_ms: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.telemetry.cache_ttl_secs > 0,
            "telemetry.cache_ttl_secs must be > 0, got {}",
            self.telemetry.cache_ttl_secs
        );
        anyhow::ensure!(
            self.telemetry.cpu_sample_window_ms > 0,
            "telemetry.cpu_sample_window_ms must be > 0, got {}",
            self.telemetry.cpu_sample_window_ms
        );
        // Streams re-sample CPU on every tick; a tick shorter than the window never idles.
        anyhow::ensure!(
            self.streaming.cpu_usage_frequency_ms >= self.telemetry.cpu_sample_window_ms,
            "streaming.cpu_usage_frequency_ms must be >= telemetry.cpu_sample_window_ms ({}), got {}",
            self.telemetry.cpu_sample_window_ms,
            self.streaming.cpu_usage_frequency_ms
        );
        anyhow::ensure!(
            self.streaming.nic_usage_frequency_ms > 0,
            "streaming.nic_usage_frequency_ms must be > 0, got {}",
            self.streaming.nic_usage_frequency_ms
        );
        Ok(())
    }
}
