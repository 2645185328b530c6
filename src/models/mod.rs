// Domain models returned by the telemetry queries

mod cpu;
mod memory;
mod network;
mod os;
mod storage;

pub use cpu::{CpuInfo, CpuUsage};
pub use memory::{MemoryInfo, MemoryUsage};
pub use network::{NetworkInterface, NicInfo, NicUsage, NicUsageEntry, is_loopback};
pub use os::OsInfo;
pub use storage::{Disk, DiskInfo, DiskType, DiskUsage, DiskUsageEntry};
