// CPU identity and usage models

use serde::{Deserialize, Serialize};

/// Static CPU identity. Aggregate fields come from the first logical CPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub model_name: String,
    pub vendor: String,
    pub physical_cores: u32,
    pub threads: u32,
    pub frequency_mhz: f64,
    pub cache_size_kb: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub usage_percent: f64,
    pub user_percent: f64,
    pub system_percent: f64,
    pub idle_percent: f64,
    pub iowait_percent: f64,
    pub per_core_percent: Vec<f64>,
    pub load_avg_1: f64,
    pub load_avg_5: f64,
    pub load_avg_15: f64,
}
