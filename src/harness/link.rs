//! Point-to-point link stand-in
//!
//! Serializes payloads FIFO at the link rate, adds propagation delay, and
//! applies a rate error model at the receiving end.

use crate::harness::config::LinkConfig;
use crate::sim::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Statistics collected by the link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkStats {
    pub packets_transmitted: u64,
    pub bytes_transmitted: u64,
    pub packets_corrupted: u64,
}

pub struct PointToPointLink {
    config: LinkConfig,
    busy_until: SimTime,
    rng: StdRng,
    stats: LinkStats,
}

impl PointToPointLink {
    pub fn new(config: LinkConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            busy_until: SimTime::ZERO,
            rng,
            stats: LinkStats::default(),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Queue `bytes` for transmission at `now` and return when the last bit
    /// reaches the far end.
    pub fn transmit(&mut self, now: SimTime, bytes: usize) -> SimTime {
        let start = now.max(self.busy_until);
        let serialization = self
            .config
            .data_rate
            .transmit_time(bytes as u64)
            .unwrap_or_default();

        self.busy_until = start + serialization;
        self.stats.packets_transmitted += 1;
        self.stats.bytes_transmitted += bytes as u64;

        self.busy_until + self.config.delay
    }

    /// Decide whether a packet of `bytes` arrives corrupted.
    pub fn corrupts(&mut self, bytes: usize) -> bool {
        let p = self.config.error_model.packet_error_probability(bytes);
        let corrupted = p > 0.0 && self.rng.gen::<f64>() < p;
        if corrupted {
            self.stats.packets_corrupted += 1;
        }
        corrupted
    }
}
