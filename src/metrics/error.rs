use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Throughput cannot be derived from the observed timestamps.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementError {
    #[error("Elapsed time {elapsed_seconds}s is not positive; throughput undefined")]
    NonPositiveElapsed { elapsed_seconds: f64 },
}

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Failed to setup metrics: {0}")]
    SetupFailed(String),
}
