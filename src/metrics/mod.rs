//! Run measurement and observability
//!
//! The aggregator turns trace points into a throughput/loss summary. The
//! recorder and exporter mirror the same counters into the `metrics`
//! facade for Prometheus scraping.
//!
//! Key metrics exposed:
//! - Packets and bytes sent per application
//! - Receive drops and completions
//! - Congestion window changes
//! - Per-run throughput and elapsed time

pub mod aggregator;
mod error;
pub mod exporter;
pub mod recorder;
mod types;

pub use aggregator::{MetricsAggregator, TraceEntry, TraceRecorder, TraceSink};
pub use error::{MeasurementError, MetricsError};
pub use exporter::{install_exporter, render_metrics, MetricsConfig};
pub use types::{MetricsState, Summary, TraceEvent};
