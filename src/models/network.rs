// Network interface models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub name: String,
    pub mac_address: String,
    pub mtu: u64,
    pub addresses: Vec<String>,
    /// Always empty; the probe layer has no driver data.
    pub driver: String,
    /// Always 0; the probe layer has no link speed data.
    pub speed_mbps: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicInfo {
    pub interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicUsageEntry {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_drops: u64,
    pub tx_drops: u64,
    #[serde(default)]
    pub rx_bytes_per_sec: f64,
    #[serde(default)]
    pub tx_bytes_per_sec: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicUsage {
    pub interfaces: Vec<NicUsageEntry>,
}

/// Loopback interfaces (`lo`, `lo0`, ...) are never reported.
pub fn is_loopback(name: &str) -> bool {
    name.starts_with("lo")
}
