// SnapshotSource backed by sysinfo, with /proc helpers on Linux

use super::linux;
use super::{
    ProbeResult, RawCpuInfo, RawCpuTimes, RawDiskUsage, RawHostInfo, RawInterface,
    RawIoCounters, RawLoadAverage, RawPartition, RawSwapMemory, RawVirtualMemory, SnapshotSource,
};
use crate::error::ProbeError;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use sysinfo::{DiskRefreshKind, Disks, MINIMUM_CPU_UPDATE_INTERVAL, Networks, System};

/// Each CPU sampler owns its lock so a sampling window never stalls memory probes.
pub struct SysinfoSource {
    sys: Mutex<System>,
    per_core: Mutex<System>,
    overall: Mutex<OverallCpu>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
}

/// Baseline for the non-blocking overall sample.
struct OverallCpu {
    times: Option<RawCpuTimes>,
    percent: f64,
    sys: System,
    refreshed_at: Option<Instant>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> ProbeResult<MutexGuard<'a, T>> {
    m.lock()
        .map_err(|e| ProbeError::LockPoisoned(format!("sysinfo {}: {}", what, e)))
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();
        let mut per_core = System::new();
        per_core.refresh_cpu_all();
        let mut overall_sys = System::new();
        overall_sys.refresh_cpu_all();
        Self {
            sys: Mutex::new(sys),
            per_core: Mutex::new(per_core),
            overall: Mutex::new(OverallCpu {
                times: linux::read_cpu_times_linux().ok(),
                percent: 0.0,
                sys: overall_sys,
                refreshed_at: Some(Instant::now()),
            }),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
        }
    }

    /// Usage over `interval`, from /proc/stat deltas when available. No lock is held
    /// while sleeping.
    fn sample_percent(&self, interval: Duration, per_cpu: bool) -> ProbeResult<Vec<f64>> {
        let read = || {
            if per_cpu {
                linux::read_per_cpu_times_linux()
            } else {
                linux::read_cpu_times_linux().map(|t| vec![t])
            }
        };
        if let Ok(before) = read() {
            std::thread::sleep(interval);
            let after = read()?;
            return Ok(after
                .iter()
                .zip(&before)
                .map(|(now, prev)| now.busy_percent_since(prev).unwrap_or(0.0))
                .collect());
        }

        // sysinfo ignores CPU refreshes closer together than its minimum interval.
        lock(&self.per_core, "cpu sampler")?.refresh_cpu_usage();
        std::thread::sleep(interval.max(MINIMUM_CPU_UPDATE_INTERVAL));
        let mut sys = lock(&self.per_core, "cpu sampler")?;
        sys.refresh_cpu_usage();
        if per_cpu {
            Ok(sys
                .cpus()
                .iter()
                .map(|c| (c.cpu_usage() as f64).clamp(0.0, 100.0))
                .collect())
        } else {
            Ok(vec![(sys.global_cpu_usage() as f64).clamp(0.0, 100.0)])
        }
    }

    /// Overall usage since the previous call; repeats the last value when called again
    /// before any time has been accounted.
    fn instant_percent(&self) -> ProbeResult<f64> {
        let mut overall = lock(&self.overall, "overall cpu")?;
        if let Ok(now) = linux::read_cpu_times_linux() {
            if let Some(percent) = overall.times.and_then(|prev| now.busy_percent_since(&prev)) {
                overall.percent = percent;
            }
            overall.times = Some(now);
            return Ok(overall.percent);
        }

        let now = Instant::now();
        let due = overall
            .refreshed_at
            .is_none_or(|at| now.duration_since(at) >= MINIMUM_CPU_UPDATE_INTERVAL);
        if due {
            overall.sys.refresh_cpu_usage();
            overall.percent = (overall.sys.global_cpu_usage() as f64).clamp(0.0, 100.0);
            overall.refreshed_at = Some(now);
        }
        Ok(overall.percent)
    }
}

impl SnapshotSource for SysinfoSource {
    fn cpu_info(&self) -> ProbeResult<Vec<RawCpuInfo>> {
        if let Some(cpus) = linux::read_cpu_info_linux() {
            return Ok(cpus);
        }
        let mut sys = lock(&self.sys, "system")?;
        sys.refresh_cpu_all();
        let cpus: Vec<RawCpuInfo> = sys
            .cpus()
            .iter()
            .map(|c| RawCpuInfo {
                model_name: c.brand().to_string(),
                vendor_id: c.vendor_id().to_string(),
                core_id: None,
                mhz: c.frequency() as f64,
                cache_size_kb: 0,
            })
            .collect();
        if cpus.is_empty() {
            return Err(ProbeError::NotFound("no CPUs reported".into()));
        }
        Ok(cpus)
    }

    fn cpu_percent(&self, interval: Duration, per_cpu: bool) -> ProbeResult<Vec<f64>> {
        if interval.is_zero() && !per_cpu {
            return Ok(vec![self.instant_percent()?]);
        }
        self.sample_percent(interval, per_cpu)
    }

    fn cpu_times(&self) -> ProbeResult<RawCpuTimes> {
        linux::read_cpu_times_linux()
    }

    fn load_average(&self) -> ProbeResult<RawLoadAverage> {
        #[cfg(windows)]
        {
            Err(ProbeError::Unsupported("load average"))
        }
        #[cfg(not(windows))]
        {
            let load = System::load_average();
            Ok(RawLoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            })
        }
    }

    fn virtual_memory(&self) -> ProbeResult<RawVirtualMemory> {
        let mut sys = lock(&self.sys, "system")?;
        sys.refresh_memory();
        let (cached, buffers) = linux::read_cached_buffers_linux();
        Ok(RawVirtualMemory {
            total: sys.total_memory(),
            used: sys.used_memory(),
            free: sys.free_memory(),
            available: sys.available_memory(),
            cached,
            buffers,
        })
    }

    fn swap_memory(&self) -> ProbeResult<RawSwapMemory> {
        let mut sys = lock(&self.sys, "system")?;
        sys.refresh_memory();
        Ok(RawSwapMemory {
            total: sys.total_swap(),
            used: sys.used_swap(),
        })
    }

    fn disk_partitions(&self) -> ProbeResult<Vec<RawPartition>> {
        let mut disks = lock(&self.disks, "disks")?;
        disks.refresh(true);
        Ok(disks
            .list()
            .iter()
            .map(|d| RawPartition {
                device: d.name().to_string_lossy().into_owned(),
                mount_point: d.mount_point().to_string_lossy().into_owned(),
            })
            .collect())
    }

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<RawDiskUsage> {
        let mut disks = lock(&self.disks, "disks")?;
        let disk = disks
            .list_mut()
            .iter_mut()
            .find(|d| d.mount_point().to_string_lossy() == mount_point)
            .ok_or_else(|| ProbeError::NotFound(format!("mount point {}", mount_point)))?;
        if !disk.refresh_specifics(DiskRefreshKind::nothing().with_storage()) {
            return Err(ProbeError::NotFound(format!("usage for mount point {}", mount_point)));
        }
        let total = disk.total_space();
        let free = disk.available_space();
        // sysinfo has no inode counters.
        Ok(RawDiskUsage {
            total,
            used: total.saturating_sub(free),
            free,
            inodes_total: 0,
            inodes_used: 0,
        })
    }

    fn interfaces(&self) -> ProbeResult<Vec<RawInterface>> {
        let mut networks = lock(&self.networks, "networks")?;
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| RawInterface {
                name: name.clone(),
                mac_address: data.mac_address().to_string(),
                mtu: data.mtu(),
                addresses: data
                    .ip_networks()
                    .iter()
                    .map(|n| format!("{}/{}", n.addr, n.prefix))
                    .collect(),
            })
            .collect())
    }

    fn io_counters(&self) -> ProbeResult<Vec<RawIoCounters>> {
        let mut networks = lock(&self.networks, "networks")?;
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| {
                let (dropin, dropout) = linux::read_interface_drops_linux(name);
                RawIoCounters {
                    name: name.clone(),
                    bytes_recv: data.total_received(),
                    bytes_sent: data.total_transmitted(),
                    packets_recv: data.total_packets_received(),
                    packets_sent: data.total_packets_transmitted(),
                    errin: data.total_errors_on_received(),
                    errout: data.total_errors_on_transmitted(),
                    dropin,
                    dropout,
                }
            })
            .collect())
    }

    fn host_info(&self) -> ProbeResult<RawHostInfo> {
        let hostname = System::host_name()
            .ok_or_else(|| ProbeError::NotFound("hostname".into()))?;
        Ok(RawHostInfo {
            platform: System::name().unwrap_or_else(|| std::env::consts::OS.into()),
            platform_version: System::os_version().unwrap_or_default(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            hostname,
            uptime_secs: System::uptime(),
        })
    }
}
