// Host telemetry: cached static info, live usage, NIC throughput

mod cache;
mod rates;
pub mod transform;

pub use cache::TtlCache;
pub use rates::{NicRateTracker, byte_rate};

use crate::error::{Result, TelemetryError};
use crate::models::*;
use crate::snapshot::{ProbeResult, RawLoadAverage, RawSwapMemory, SnapshotSource};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::instrument;

/// Static info stays fresh this long.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
/// Sampling window for per-core CPU percentages.
pub const DEFAULT_CPU_SAMPLE_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct TelemetrySettings {
    pub cache_ttl: Duration,
    pub cpu_sample_window: Duration,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cpu_sample_window: DEFAULT_CPU_SAMPLE_WINDOW,
        }
    }
}

/// Answers host telemetry queries from a [`SnapshotSource`].
///
/// Static info (CPU, memory, disk, NIC, OS) is cached for `cache_ttl` and refreshed
/// lazily by the first caller that finds it stale. Usage queries always re-probe. NIC
/// usage keeps the previous counter snapshot to derive per-second rates. Probes run on
/// the blocking pool; instances share no state with each other.
pub struct TelemetryRepo {
    source: Arc<dyn SnapshotSource>,
    settings: TelemetrySettings,
    cpu_info: TtlCache<CpuInfo>,
    memory_info: TtlCache<MemoryInfo>,
    disk_info: TtlCache<DiskInfo>,
    nic_info: TtlCache<NicInfo>,
    os_info: TtlCache<OsInfo>,
    nic_tracker: Mutex<NicRateTracker>,
}

impl TelemetryRepo {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self::with_settings(source, TelemetrySettings::default())
    }

    pub fn with_settings(source: Arc<dyn SnapshotSource>, settings: TelemetrySettings) -> Self {
        let ttl = settings.cache_ttl;
        Self {
            source,
            settings,
            cpu_info: TtlCache::new(ttl),
            memory_info: TtlCache::new(ttl),
            disk_info: TtlCache::new(ttl),
            nic_info: TtlCache::new(ttl),
            os_info: TtlCache::new(ttl),
            nic_tracker: Mutex::new(NicRateTracker::new()),
        }
    }

    /// Runs `f` against the source on the blocking pool.
    async fn probe<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SnapshotSource) -> ProbeResult<T> + Send + 'static,
    {
        let source = self.source.clone();
        let value = tokio::task::spawn_blocking(move || f(source.as_ref())).await??;
        Ok(value)
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "cpu_info"))]
    pub async fn cpu_info(&self) -> Result<Arc<CpuInfo>> {
        self.cpu_info
            .get_or_refresh(|| async {
                let cpus = self.probe(|s| s.cpu_info()).await?;
                tracing::debug!(entries = cpus.len(), "CPU info refreshed");
                Ok::<_, TelemetryError>(transform::cpu_info_from_raw(&cpus))
            })
            .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "memory_info"))]
    pub async fn memory_info(&self) -> Result<Arc<MemoryInfo>> {
        self.memory_info
            .get_or_refresh(|| async {
                let vm = self.probe(|s| s.virtual_memory()).await?;
                tracing::debug!("memory info refreshed");
                Ok::<_, TelemetryError>(transform::memory_info_from_raw(&vm))
            })
            .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "disk_info"))]
    pub async fn disk_info(&self) -> Result<Arc<DiskInfo>> {
        self.disk_info
            .get_or_refresh(|| async {
                let info = self
                    .probe(|s| {
                        let partitions = s.disk_partitions()?;
                        Ok(transform::disk_info_from_partitions(&partitions, |mp| {
                            s.disk_usage(mp)
                        }))
                    })
                    .await?;
                tracing::debug!(disks = info.disks.len(), "disk info refreshed");
                Ok::<_, TelemetryError>(info)
            })
            .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "nic_info"))]
    pub async fn nic_info(&self) -> Result<Arc<NicInfo>> {
        self.nic_info
            .get_or_refresh(|| async {
                let interfaces = self.probe(|s| s.interfaces()).await?;
                let info = transform::nic_info_from_raw(interfaces);
                tracing::debug!(interfaces = info.interfaces.len(), "NIC info refreshed");
                Ok::<_, TelemetryError>(info)
            })
            .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "os_info"))]
    pub async fn os_info(&self) -> Result<Arc<OsInfo>> {
        self.os_info
            .get_or_refresh(|| async {
                let host = self.probe(|s| s.host_info()).await?;
                tracing::debug!("OS info refreshed");
                Ok::<_, TelemetryError>(transform::os_info_from_raw(host))
            })
            .await
    }

    /// Blocks for the configured sampling window while measuring per-core usage.
    /// Dropping the future does not cut the window short; the sample is discarded.
    #[instrument(skip(self), fields(repo = "telemetry", operation = "cpu_usage"))]
    pub async fn cpu_usage(&self) -> Result<CpuUsage> {
        let window = self.settings.cpu_sample_window;
        self.probe(move |s| {
            let per_core_percent = s.cpu_percent(window, true)?;
            let usage_percent = s
                .cpu_percent(Duration::ZERO, false)?
                .first()
                .copied()
                .unwrap_or(0.0);
            let breakdown = transform::cpu_breakdown(&s.cpu_times()?);
            let load = s.load_average().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "load average unavailable, reporting zeros");
                RawLoadAverage::default()
            });
            Ok(CpuUsage {
                usage_percent,
                user_percent: breakdown.user,
                system_percent: breakdown.system,
                idle_percent: breakdown.idle,
                iowait_percent: breakdown.iowait,
                per_core_percent,
                load_avg_1: load.one,
                load_avg_5: load.five,
                load_avg_15: load.fifteen,
            })
        })
        .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "memory_usage"))]
    pub async fn memory_usage(&self) -> Result<MemoryUsage> {
        self.probe(|s| {
            let vm = s.virtual_memory()?;
            let swap = s.swap_memory().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "swap unavailable, reporting zeros");
                RawSwapMemory::default()
            });
            Ok(transform::memory_usage_from_raw(&vm, &swap))
        })
        .await
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "disk_usage"))]
    pub async fn disk_usage(&self) -> Result<DiskUsage> {
        self.probe(|s| {
            let partitions = s.disk_partitions()?;
            Ok(transform::disk_usage_from_partitions(&partitions, |mp| {
                s.disk_usage(mp)
            }))
        })
        .await
    }

    /// Cumulative NIC counters plus bytes/sec since the previous call. Concurrent calls
    /// are serialized; a failed counter probe leaves the previous snapshot in place.
    #[instrument(skip(self), fields(repo = "telemetry", operation = "nic_usage"))]
    pub async fn nic_usage(&self) -> Result<NicUsage> {
        let counters = self.probe(|s| s.io_counters()).await?;
        let mut tracker = self.nic_tracker.lock().await;
        Ok(tracker.observe(&counters, Instant::now()))
    }
}
