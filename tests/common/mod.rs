// Shared test helpers: a scripted SnapshotSource with per-probe call counters

#![allow(dead_code)]

use coreconsole::error::ProbeError;
use coreconsole::snapshot::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned probe results. Disk usage for a mount point missing from `disk_usage` fails.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub cpus: Vec<RawCpuInfo>,
    pub per_core: Vec<f64>,
    pub overall: f64,
    pub times: RawCpuTimes,
    pub load: RawLoadAverage,
    pub vm: RawVirtualMemory,
    pub swap: RawSwapMemory,
    pub partitions: Vec<RawPartition>,
    pub disk_usage: HashMap<String, RawDiskUsage>,
    pub interfaces: Vec<RawInterface>,
    pub counters: Vec<RawIoCounters>,
    pub host: RawHostInfo,
    /// Probe names that currently fail.
    pub failing: HashSet<&'static str>,
    /// Blocking delay added to every probe.
    pub delay: Duration,
}

pub struct MockSource {
    state: Mutex<MockState>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockSource {
    pub fn new(state: MockState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            calls: Mutex::new(HashMap::new()),
        })
    }

    pub fn calls(&self, probe: &str) -> usize {
        self.calls.lock().unwrap().get(probe).copied().unwrap_or(0)
    }

    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn fail(&self, probe: &'static str, failing: bool) {
        self.update(|s| {
            if failing {
                s.failing.insert(probe);
            } else {
                s.failing.remove(probe);
            }
        });
    }

    fn enter(&self, probe: &'static str) -> Result<MockState, ProbeError> {
        *self.calls.lock().unwrap().entry(probe).or_insert(0) += 1;
        let state = self.state.lock().unwrap().clone();
        if !state.delay.is_zero() {
            std::thread::sleep(state.delay);
        }
        if state.failing.contains(probe) {
            return Err(ProbeError::NotFound(format!("mock {} failure", probe)));
        }
        Ok(state)
    }
}

impl SnapshotSource for MockSource {
    fn cpu_info(&self) -> ProbeResult<Vec<RawCpuInfo>> {
        Ok(self.enter("cpu_info")?.cpus)
    }

    fn cpu_percent(&self, _interval: Duration, per_cpu: bool) -> ProbeResult<Vec<f64>> {
        let s = self.enter("cpu_percent")?;
        Ok(if per_cpu { s.per_core } else { vec![s.overall] })
    }

    fn cpu_times(&self) -> ProbeResult<RawCpuTimes> {
        Ok(self.enter("cpu_times")?.times)
    }

    fn load_average(&self) -> ProbeResult<RawLoadAverage> {
        Ok(self.enter("load_average")?.load)
    }

    fn virtual_memory(&self) -> ProbeResult<RawVirtualMemory> {
        Ok(self.enter("virtual_memory")?.vm)
    }

    fn swap_memory(&self) -> ProbeResult<RawSwapMemory> {
        Ok(self.enter("swap_memory")?.swap)
    }

    fn disk_partitions(&self) -> ProbeResult<Vec<RawPartition>> {
        Ok(self.enter("disk_partitions")?.partitions)
    }

    fn disk_usage(&self, mount_point: &str) -> ProbeResult<RawDiskUsage> {
        self.enter("disk_usage")?
            .disk_usage
            .get(mount_point)
            .copied()
            .ok_or_else(|| ProbeError::NotFound(format!("mount point {}", mount_point)))
    }

    fn interfaces(&self) -> ProbeResult<Vec<RawInterface>> {
        Ok(self.enter("interfaces")?.interfaces)
    }

    fn io_counters(&self) -> ProbeResult<Vec<RawIoCounters>> {
        Ok(self.enter("io_counters")?.counters)
    }

    fn host_info(&self) -> ProbeResult<RawHostInfo> {
        Ok(self.enter("host_info")?.host)
    }
}

pub fn cpu(core_id: Option<&str>) -> RawCpuInfo {
    RawCpuInfo {
        model_name: "AMD EPYC 7443P".into(),
        vendor_id: "AuthenticAMD".into(),
        core_id: core_id.map(String::from),
        mhz: 2850.0,
        cache_size_kb: 512,
    }
}

pub fn partition(device: &str, mount_point: &str) -> RawPartition {
    RawPartition {
        device: device.into(),
        mount_point: mount_point.into(),
    }
}

pub fn usage(total: u64, used: u64) -> RawDiskUsage {
    RawDiskUsage {
        total,
        used,
        free: total - used,
        inodes_total: 1000,
        inodes_used: 10,
    }
}

pub fn counters(name: &str, rx: u64, tx: u64) -> RawIoCounters {
    RawIoCounters {
        name: name.into(),
        bytes_recv: rx,
        bytes_sent: tx,
        packets_recv: rx / 100,
        packets_sent: tx / 100,
        ..Default::default()
    }
}

/// A host with two physical cores / four threads, two disks, eth0 + lo.
pub fn typical_state() -> MockState {
    let mut disk_usage = HashMap::new();
    disk_usage.insert("/".to_string(), usage(100_000, 25_000));
    disk_usage.insert("/data".to_string(), usage(400_000, 100_000));
    MockState {
        cpus: vec![cpu(Some("0")), cpu(Some("0")), cpu(Some("1")), cpu(Some("1"))],
        per_core: vec![10.0, 20.0, 30.0, 40.0],
        overall: 25.0,
        times: RawCpuTimes {
            user: 30.0,
            nice: 10.0,
            system: 20.0,
            idle: 35.0,
            iowait: 5.0,
            ..Default::default()
        },
        load: RawLoadAverage {
            one: 0.5,
            five: 0.25,
            fifteen: 0.125,
        },
        vm: RawVirtualMemory {
            total: 8_000,
            used: 2_000,
            free: 4_000,
            available: 6_000,
            cached: 1_500,
            buffers: 500,
        },
        swap: RawSwapMemory {
            total: 1_000,
            used: 100,
        },
        partitions: vec![partition("/dev/sda1", "/"), partition("/dev/nvme0n1p1", "/data")],
        disk_usage,
        interfaces: vec![
            RawInterface {
                name: "eth0".into(),
                mac_address: "52:54:00:12:34:56".into(),
                mtu: 1500,
                addresses: vec!["10.0.0.5/24".into(), "fe80::1/64".into()],
            },
            RawInterface {
                name: "lo".into(),
                mac_address: "00:00:00:00:00:00".into(),
                mtu: 65536,
                addresses: vec!["127.0.0.1/8".into()],
            },
        ],
        counters: vec![counters("eth0", 1_000, 500), counters("lo", 9_999, 9_999)],
        host: RawHostInfo {
            platform: "ubuntu".into(),
            platform_version: "22.04".into(),
            kernel_version: "5.15.0".into(),
            hostname: "core-node-1".into(),
            uptime_secs: 3600,
        },
        failing: HashSet::new(),
        delay: Duration::ZERO,
    }
}
