// Raw OS facts and the probe trait the telemetry repo consumes

mod linux;
mod sysinfo_source;

pub use sysinfo_source::SysinfoSource;

use crate::error::ProbeError;
use std::time::Duration;

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// One logical CPU as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCpuInfo {
    pub model_name: String,
    pub vendor_id: String,
    /// `None` when the platform does not report core ids.
    pub core_id: Option<String>,
    pub mhz: f64,
    pub cache_size_kb: u32,
}

/// Cumulative CPU time per category (seconds), for one CPU or summed over all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawCpuTimes {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
}

impl RawCpuTimes {
    pub fn total(&self) -> f64 {
        self.user
            + self.system
            + self.idle
            + self.nice
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Share of the time elapsed since `prev` spent outside idle and iowait.
    /// `None` when no time has passed.
    pub fn busy_percent_since(&self, prev: &RawCpuTimes) -> Option<f64> {
        let total = self.total() - prev.total();
        if total <= 0.0 {
            return None;
        }
        let idle = (self.idle + self.iowait) - (prev.idle + prev.iowait);
        Some(((total - idle) / total * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawLoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawVirtualMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub cached: u64,
    pub buffers: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSwapMemory {
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPartition {
    pub device: String,
    pub mount_point: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawDiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub inodes_total: u64,
    pub inodes_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInterface {
    pub name: String,
    pub mac_address: String,
    pub mtu: u64,
    pub addresses: Vec<String>,
}

/// Cumulative per-interface IO counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIoCounters {
    pub name: String,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
    pub packets_recv: u64,
    pub packets_sent: u64,
    pub errin: u64,
    pub errout: u64,
    pub dropin: u64,
    pub dropout: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHostInfo {
    pub platform: String,
    pub platform_version: String,
    pub kernel_version: String,
    pub hostname: String,
    pub uptime_secs: u64,
}

/// Point-in-time OS/hardware facts.
///
/// Every method may block on syscalls (and `cpu_percent` sleeps for `interval`), so
/// callers on an async runtime must run these on the blocking pool. Any call may fail
/// transiently; implementations do not retry.
pub trait SnapshotSource: Send + Sync + 'static {
    fn cpu_info(&self) -> ProbeResult<Vec<RawCpuInfo>>;

    /// With `per_cpu` one value per logical CPU sampled over `interval`, otherwise a
    /// single overall value. An overall sample with a zero `interval` does not sleep;
    /// it compares against the previous overall sample.
    fn cpu_percent(&self, interval: Duration, per_cpu: bool) -> ProbeResult<Vec<f64>>;

    fn cpu_times(&self) -> ProbeResult<RawCpuTimes>;

    fn load_average(&self) -> ProbeResult<RawLoadAverage>;

    fn virtual_memory(&self) -> ProbeResult<RawVirtualMemory>;

    fn swap_memory(&self) -> ProbeResult<RawSwapMemory>;

    fn disk_partitions(&self) -> ProbeResult<Vec<RawPartition>>;

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<RawDiskUsage>;

    fn interfaces(&self) -> ProbeResult<Vec<RawInterface>>;

    fn io_counters(&self) -> ProbeResult<Vec<RawIoCounters>>;

    fn host_info(&self) -> ProbeResult<RawHostInfo>;
}
