//! Measurement run harness
//!
//! Builds the sender, link, and sink for one configured run, drives the
//! event queue to completion, and reports the result. A sweep runs many
//! such configurations side by side.

mod config;
mod error;
#[allow(clippy::module_inception)]
mod harness;
mod link;
mod report;
mod sink;
mod sweep;

pub use config::{ErrorModelConfig, ErrorUnit, LinkConfig, RunConfig, TransportVariant};
pub use error::{HarnessError, HarnessResult};
pub use harness::{SimEvent, SimulationHarness};
pub use link::{LinkStats, PointToPointLink};
pub use report::{render_table, RunReport};
pub use sink::PacketSink;
pub use sweep::ComparisonSweep;
