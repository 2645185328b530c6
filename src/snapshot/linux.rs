// Linux-specific helpers: /proc/cpuinfo, /proc/stat, /proc/meminfo.

use super::{ProbeResult, RawCpuInfo, RawCpuTimes};
#[cfg(target_os = "linux")]
use crate::error::ProbeError;

/// Kernel clock ticks per second for /proc/stat (USER_HZ is 100 on every mainstream arch).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const USER_HZ: f64 = 100.0;

/// Per-processor entries from /proc/cpuinfo. `None` when unreadable or not Linux.
pub(super) fn read_cpu_info_linux() -> Option<Vec<RawCpuInfo>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        let cpus = parse_cpuinfo(&content);
        if !cpus.is_empty() {
            return Some(cpus);
        }
    }
    None
}

/// Aggregate `cpu` line of /proc/stat, converted to seconds.
pub(super) fn read_cpu_times_linux() -> ProbeResult<RawCpuTimes> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat")?;
        parse_proc_stat(&content).ok_or_else(|| ProbeError::Parse {
            what: "/proc/stat",
            detail: "missing aggregate cpu line".into(),
        })
    }
    #[cfg(not(target_os = "linux"))]
    Err(crate::error::ProbeError::Unsupported("cpu time counters"))
}

/// Per-CPU lines of /proc/stat, converted to seconds.
pub(super) fn read_per_cpu_times_linux() -> ProbeResult<Vec<RawCpuTimes>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat")?;
        let cpus = parse_proc_stat_per_cpu(&content);
        if cpus.is_empty() {
            return Err(ProbeError::Parse {
                what: "/proc/stat",
                detail: "no per-cpu lines".into(),
            });
        }
        Ok(cpus)
    }
    #[cfg(not(target_os = "linux"))]
    Err(crate::error::ProbeError::Unsupported("per-cpu time counters"))
}

/// (cached, buffers) in bytes from /proc/meminfo; zeros when unavailable.
pub(super) fn read_cached_buffers_linux() -> (u64, u64) {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
            return parse_meminfo_cached_buffers(&content);
        }
    }
    (0, 0)
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cpuinfo(content: &str) -> Vec<RawCpuInfo> {
    let mut cpus = Vec::new();
    // Processor blocks are separated by blank lines.
    for block in content.split("\n\n") {
        let mut cpu = RawCpuInfo::default();
        let mut seen_processor = false;
        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "processor" => seen_processor = true,
                "model name" => cpu.model_name = value.to_string(),
                "vendor_id" => cpu.vendor_id = value.to_string(),
                "core id" => cpu.core_id = Some(value.to_string()),
                "cpu MHz" => cpu.mhz = value.parse().unwrap_or(0.0),
                "cache size" => {
                    cpu.cache_size_kb = value
                        .split_whitespace()
                        .next()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0)
                }
                _ => {}
            }
        }
        if seen_processor {
            cpus.push(cpu);
        }
    }
    cpus
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_stat(content: &str) -> Option<RawCpuTimes> {
    content.lines().find_map(|l| {
        let mut fields = l.split_whitespace();
        if fields.next() != Some("cpu") {
            return None;
        }
        parse_cpu_fields(fields)
    })
}

/// `cpuN` lines in file order, which is CPU index order.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_stat_per_cpu(content: &str) -> Vec<RawCpuTimes> {
    content
        .lines()
        .filter_map(|l| {
            let mut fields = l.split_whitespace();
            let index = fields.next()?.strip_prefix("cpu")?;
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            parse_cpu_fields(fields)
        })
        .collect()
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cpu_fields<'a>(fields: impl Iterator<Item = &'a str>) -> Option<RawCpuTimes> {
    let ticks: Vec<f64> = fields
        .map(|v| v.parse::<f64>().unwrap_or(0.0) / USER_HZ)
        .collect();
    if ticks.len() < 4 {
        return None;
    }
    let at = |i: usize| ticks.get(i).copied().unwrap_or(0.0);
    Some(RawCpuTimes {
        user: at(0),
        nice: at(1),
        system: at(2),
        idle: at(3),
        iowait: at(4),
        irq: at(5),
        softirq: at(6),
        steal: at(7),
    })
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo_cached_buffers(content: &str) -> (u64, u64) {
    let kb = |key: &str| -> u64 {
        content
            .lines()
            .find_map(|l| l.strip_prefix(key))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|v| v * 1024)
            .unwrap_or(0)
    };
    (kb("Cached:"), kb("Buffers:"))
}

/// (rx_dropped, tx_dropped) from /sys/class/net/<interface>/statistics; zeros when unavailable.
pub(super) fn read_interface_drops_linux(interface_name: &str) -> (u64, u64) {
    #[cfg(target_os = "linux")]
    {
        let read = |counter: &str| -> u64 {
            let path = format!("/sys/class/net/{}/statistics/{}", interface_name, counter);
            std::fs::read_to_string(&path)
                .ok()
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(0)
        };
        (read("rx_dropped"), read("tx_dropped"))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        (0, 0)
    }
}
