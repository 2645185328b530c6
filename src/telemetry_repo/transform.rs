// Raw probe facts -> public models

use crate::models::*;
use crate::snapshot::{
    ProbeResult, RawCpuInfo, RawCpuTimes, RawDiskUsage, RawHostInfo, RawInterface,
    RawPartition, RawSwapMemory, RawVirtualMemory,
};
use std::collections::HashSet;

/// Percent of `part` in `total`, 0 when `total` is 0.
pub fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total * 100.0 } else { 0.0 }
}

/// Physical cores are distinct core ids; platforms without core ids report one core per
/// entry. Model, vendor, frequency and cache come from the first entry only, which
/// misdescribes heterogeneous (big.LITTLE) CPUs.
pub fn cpu_info_from_raw(cpus: &[RawCpuInfo]) -> CpuInfo {
    let core_ids: HashSet<&str> = cpus.iter().filter_map(|c| c.core_id.as_deref()).collect();
    let physical_cores = if core_ids.is_empty() {
        cpus.len()
    } else {
        core_ids.len()
    };
    let first = cpus.first();
    CpuInfo {
        model_name: first.map(|c| c.model_name.clone()).unwrap_or_default(),
        vendor: first.map(|c| c.vendor_id.clone()).unwrap_or_default(),
        physical_cores: physical_cores as u32,
        threads: cpus.len() as u32,
        frequency_mhz: first.map(|c| c.mhz).unwrap_or(0.0),
        cache_size_kb: first.map(|c| c.cache_size_kb).unwrap_or(0),
    }
}

/// User/system/idle/iowait share of cumulative CPU time. irq, softirq and steal count
/// toward the total but are not reported, so the four may sum to less than 100.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuBreakdown {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
}

pub fn cpu_breakdown(times: &RawCpuTimes) -> CpuBreakdown {
    let total = times.total();
    if total <= 0.0 {
        return CpuBreakdown::default();
    }
    CpuBreakdown {
        user: percent(times.user + times.nice, total),
        system: percent(times.system, total),
        idle: percent(times.idle, total),
        iowait: percent(times.iowait, total),
    }
}

pub fn memory_info_from_raw(vm: &RawVirtualMemory) -> MemoryInfo {
    MemoryInfo {
        total_bytes: vm.total,
        type_: "unknown".into(),
        speed_mhz: 0,
        slots: 0,
    }
}

pub fn memory_usage_from_raw(vm: &RawVirtualMemory, swap: &RawSwapMemory) -> MemoryUsage {
    MemoryUsage {
        used: vm.used,
        free: vm.free,
        available: vm.available,
        cached: vm.cached,
        buffers: vm.buffers,
        swap_total: swap.total,
        swap_used: swap.used,
        usage_percent: percent(vm.used as f64, vm.total as f64),
    }
}

/// One disk per device path (first partition wins). Devices whose usage probe fails are
/// left out.
pub fn disk_info_from_partitions<F>(partitions: &[RawPartition], mut usage: F) -> DiskInfo
where
    F: FnMut(&str) -> ProbeResult<RawDiskUsage>,
{
    let mut seen = HashSet::new();
    let mut disks = Vec::new();
    for p in partitions {
        if !seen.insert(p.device.as_str()) {
            continue;
        }
        match usage(&p.mount_point) {
            Ok(u) => disks.push(Disk {
                device: p.device.clone(),
                disk_type: DiskType::infer(&p.device),
                size_bytes: u.total,
                mount_point: (!p.mount_point.is_empty()).then(|| p.mount_point.clone()),
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    device = %p.device,
                    mount_point = %p.mount_point,
                    "disk usage probe failed, skipping disk"
                );
            }
        }
    }
    DiskInfo { disks }
}

/// One entry per mount point (first partition wins). Mount points whose usage probe
/// fails are left out.
pub fn disk_usage_from_partitions<F>(partitions: &[RawPartition], mut usage: F) -> DiskUsage
where
    F: FnMut(&str) -> ProbeResult<RawDiskUsage>,
{
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for p in partitions {
        if !seen.insert(p.mount_point.as_str()) {
            continue;
        }
        match usage(&p.mount_point) {
            Ok(u) => entries.push(DiskUsageEntry {
                mount_point: p.mount_point.clone(),
                device: p.device.clone(),
                total: u.total,
                used: u.used,
                free: u.free,
                usage_percent: percent(u.used as f64, u.total as f64),
                inodes_total: u.inodes_total,
                inodes_used: u.inodes_used,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    mount_point = %p.mount_point,
                    "disk usage probe failed, skipping mount point"
                );
            }
        }
    }
    DiskUsage { entries }
}

pub fn nic_info_from_raw(interfaces: Vec<RawInterface>) -> NicInfo {
    NicInfo {
        interfaces: interfaces
            .into_iter()
            .filter(|i| !is_loopback(&i.name))
            .map(|i| NetworkInterface {
                name: i.name,
                mac_address: i.mac_address,
                mtu: i.mtu,
                addresses: i.addresses,
                driver: String::new(),
                speed_mbps: 0,
            })
            .collect(),
    }
}

/// Architecture is this binary's compile target.
pub fn os_info_from_raw(host: RawHostInfo) -> OsInfo {
    OsInfo {
        platform: host.platform,
        platform_version: host.platform_version,
        kernel_version: host.kernel_version,
        architecture: std::env::consts::ARCH.to_string(),
        hostname: host.hostname,
        uptime_secs: host.uptime_secs,
    }
}
