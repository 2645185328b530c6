// OS identity model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub platform: String,
    pub platform_version: String,
    pub kernel_version: String,
    /// Target architecture of this binary, not of the host.
    pub architecture: String,
    pub hostname: String,
    pub uptime_secs: u64,
}
