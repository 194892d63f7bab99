//! Self-clocked traffic generator.

mod error;
mod generator;
mod types;

pub use error::{ConfigurationError, GeneratorError, GeneratorResult};
pub use generator::{Application, TrafficGenerator};
pub use types::{AppId, GeneratorConfig, GeneratorState, GeneratorTimer};
