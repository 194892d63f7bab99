//! Passive handlers for transport and channel trace points.
//!
//! All mutation happens inside scheduler-dispatched callbacks on a single
//! timeline, so the state is a plain struct owned by the harness.

use crate::metrics::error::MeasurementError;
use crate::metrics::recorder;
use crate::metrics::types::{MetricsState, Summary, TraceEvent};
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};

/// Receiver of trace point callbacks.
pub trait TraceSink {
    fn on_trace(&mut self, now: SimTime, event: &TraceEvent);
}

#[derive(Debug, Default)]
pub struct MetricsAggregator {
    state: MetricsState,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    /// Clear counters before reusing the aggregator for an independent run.
    pub fn reset(&mut self) {
        self.state = MetricsState::new();
    }

    pub fn on_congestion_signal(&mut self, old: u32, new: u32) {
        self.state.congestion_signal_count += 1;
        self.state.last_congestion_window = Some(new);
        recorder::record_congestion_signal(old, new);
    }

    pub fn on_drop(&mut self) {
        self.state.drop_count += 1;
        recorder::record_rx_drop();
    }

    pub fn on_receive_complete(&mut self, now: SimTime) {
        if now < self.state.last_completion {
            // Dispatch is time-ordered, so this only happens on misuse
            tracing::warn!(
                "Receive completion at {} precedes last recorded {}",
                now,
                self.state.last_completion
            );
        } else {
            self.state.last_completion = now;
        }
        self.state.completion_count += 1;
        recorder::record_rx_completed();
    }

    /// Summarise the run relative to the application start time.
    pub fn compute_summary(&self, start: SimTime, total_bytes_received: u64) -> Summary {
        let elapsed_seconds = self.state.last_completion.seconds_since(start);

        let average_throughput = if elapsed_seconds > 0.0 {
            Ok(total_bytes_received as f64 * 8.0 / elapsed_seconds)
        } else {
            Err(MeasurementError::NonPositiveElapsed { elapsed_seconds })
        };

        Summary {
            elapsed_seconds,
            average_throughput,
            drop_count: self.state.drop_count,
            congestion_signal_count: self.state.congestion_signal_count,
        }
    }
}

impl TraceSink for MetricsAggregator {
    fn on_trace(&mut self, now: SimTime, event: &TraceEvent) {
        match *event {
            TraceEvent::CongestionWindow { old, new } => self.on_congestion_signal(old, new),
            TraceEvent::RxDrop => self.on_drop(),
            TraceEvent::RxEnd => self.on_receive_complete(now),
        }
    }
}

/// One timestamped trace point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub time_seconds: f64,
    pub event: TraceEvent,
}

/// Keeps every trace point in firing order, e.g. for plotting window evolution.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    entries: Vec<TraceEntry>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl TraceSink for TraceRecorder {
    fn on_trace(&mut self, now: SimTime, event: &TraceEvent) {
        self.entries.push(TraceEntry {
            time_seconds: now.as_secs_f64(),
            event: *event,
        });
    }
}
