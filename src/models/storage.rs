// Storage / disk models

use serde::{Deserialize, Serialize};

/// Device class guessed from the device path; see [`DiskType::infer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskType {
    Nvme,
    Ssd,
    Hdd,
    Virtual,
    #[serde(other)]
    Unknown,
}

impl DiskType {
    /// Case-insensitive substring match on the device path, first rule wins.
    ///
    /// Approximate: any `sd*` device is reported as `ssd`, spinning SATA disks included,
    /// because nothing else in the probe data tells them apart.
    pub fn infer(device: &str) -> Self {
        let d = device.to_lowercase();
        if d.contains("nvme") {
            DiskType::Nvme
        } else if d.contains("sd") {
            DiskType::Ssd
        } else if d.contains("hd") {
            DiskType::Hdd
        } else if d.contains("vd") || d.contains("xvd") {
            DiskType::Virtual
        } else {
            DiskType::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiskType::Nvme => "nvme",
            DiskType::Ssd => "ssd",
            DiskType::Hdd => "hdd",
            DiskType::Virtual => "virtual",
            DiskType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub device: String,
    #[serde(rename = "type")]
    pub disk_type: DiskType,
    pub size_bytes: u64,
    pub mount_point: Option<String>,
}

/// One entry per unique block device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub disks: Vec<Disk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsageEntry {
    pub mount_point: String,
    pub device: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percent: f64,
    pub inodes_total: u64,
    pub inodes_used: u64,
}

/// One entry per unique mount point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    pub entries: Vec<DiskUsageEntry>,
}
