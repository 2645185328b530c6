// Per-interface throughput from successive cumulative counter snapshots

use crate::models::{NicUsage, NicUsageEntry, is_loopback};
use crate::snapshot::RawIoCounters;
use std::collections::HashMap;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct NicCounters {
    rx_bytes: u64,
    tx_bytes: u64,
    rx_packets: u64,
    tx_packets: u64,
}

/// Last observed counters per interface, sharing one observation instant.
///
/// The whole counter probe is a single batch, so every interface in it was sampled at
/// the same time and one timestamp is enough.
#[derive(Debug, Default)]
pub struct NicRateTracker {
    last: HashMap<String, NicCounters>,
    last_observed: Option<Instant>,
}

/// Bytes per second between two cumulative readings; 0 when the counter went backwards.
pub fn byte_rate(prev: u64, now: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    ((now as f64 - prev as f64) / elapsed_secs).max(0.0)
}

impl NicRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored (rx_bytes, tx_bytes, rx_packets, tx_packets) for `name`.
    pub fn last_counters(&self, name: &str) -> Option<(u64, u64, u64, u64)> {
        self.last
            .get(name)
            .map(|c| (c.rx_bytes, c.tx_bytes, c.rx_packets, c.tx_packets))
    }

    /// Builds usage entries for `counters` observed at `now` and records them as the new
    /// baseline. Loopback interfaces are skipped and never stored.
    pub fn observe(&mut self, counters: &[RawIoCounters], now: Instant) -> NicUsage {
        let elapsed_secs = self
            .last_observed
            .map(|prev| now.saturating_duration_since(prev).as_secs_f64())
            .unwrap_or(0.0);

        let mut interfaces = Vec::with_capacity(counters.len());
        for c in counters.iter().filter(|c| !is_loopback(&c.name)) {
            let mut entry = NicUsageEntry {
                name: c.name.clone(),
                rx_bytes: c.bytes_recv,
                tx_bytes: c.bytes_sent,
                rx_packets: c.packets_recv,
                tx_packets: c.packets_sent,
                rx_errors: c.errin,
                tx_errors: c.errout,
                rx_drops: c.dropin,
                tx_drops: c.dropout,
                rx_bytes_per_sec: 0.0,
                tx_bytes_per_sec: 0.0,
            };
            if let Some(prev) = self.last.get(&c.name)
                && elapsed_secs > 0.0
            {
                entry.rx_bytes_per_sec = byte_rate(prev.rx_bytes, c.bytes_recv, elapsed_secs);
                entry.tx_bytes_per_sec = byte_rate(prev.tx_bytes, c.bytes_sent, elapsed_secs);
            }
            self.last.insert(
                c.name.clone(),
                NicCounters {
                    rx_bytes: c.bytes_recv,
                    tx_bytes: c.bytes_sent,
                    rx_packets: c.packets_recv,
                    tx_packets: c.packets_sent,
                },
            );
            interfaces.push(entry);
        }
        self.last_observed = Some(now);

        tracing::debug!(
            operation = "nic_rates",
            interfaces = interfaces.len(),
            elapsed_secs,
            "NIC rates computed"
        );
        NicUsage { interfaces }
    }
}
