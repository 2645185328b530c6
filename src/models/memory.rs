// Memory models

use serde::{Deserialize, Serialize};

/// Static memory identity. Type, speed and slots are not reported by the probe
/// layer and are always `"unknown"` / 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_bytes: u64,
    #[serde(rename = "type")]
    pub type_: String,
    pub speed_mhz: u32,
    pub slots: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub cached: u64,
    pub buffers: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub usage_percent: f64,
}
