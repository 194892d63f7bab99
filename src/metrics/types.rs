use crate::metrics::error::MeasurementError;
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};

/// Instrumentation points fired by the transport and channel layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    CongestionWindow { old: u32, new: u32 },
    RxDrop,
    RxEnd,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsState {
    pub drop_count: u64,
    pub congestion_signal_count: u64,
    pub last_completion: SimTime,
    pub completion_count: u64,
    pub last_congestion_window: Option<u32>,
}

impl MetricsState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Post-run measurement summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub elapsed_seconds: f64,
    /// Average bits per second, or why it could not be computed
    pub average_throughput: Result<f64, MeasurementError>,
    pub drop_count: u64,
    pub congestion_signal_count: u64,
}

impl Summary {
    pub fn throughput_bps(&self) -> Option<f64> {
        self.average_throughput.ok()
    }

    pub fn throughput_mbps(&self) -> Option<f64> {
        self.throughput_bps().map(|bps| bps / 1_000_000.0)
    }

    pub fn is_defined(&self) -> bool {
        self.average_throughput.is_ok()
    }
}
