//! linkprobe: discrete-event measurement of a paced sender over a lossy
//! point-to-point link.
//!
//! - [`sim`]: simulated clock, event queue, rate and delay units
//! - [`endpoint`]: connection-oriented endpoint abstraction and its in-sim socket
//! - [`generator`]: constant-rate, finite-budget traffic generator
//! - [`metrics`]: trace-point aggregation and Prometheus instrumentation
//! - [`harness`]: run configuration, execution, reporting, and sweeps

pub mod endpoint;
pub mod generator;
pub mod harness;
pub mod metrics;
pub mod sim;
