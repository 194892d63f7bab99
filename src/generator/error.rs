use crate::endpoint::ConnectionError;
use crate::generator::types::GeneratorState;
use crate::sim::UnitParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Packet size must be greater than zero")]
    ZeroPacketSize,

    #[error("Packet budget must be greater than zero")]
    ZeroPacketBudget,

    #[error("Data rate must be greater than zero")]
    ZeroDataRate,

    #[error("Unknown transport variant: {0}")]
    UnknownVariant(String),

    #[error("Error rate {0} is outside [0, 1]")]
    InvalidErrorRate(f64),

    #[error("Link data rate must be greater than zero")]
    ZeroLinkRate,

    #[error("Application stop time {stop} precedes start time {start}")]
    StopBeforeStart { start: String, stop: String },

    #[error(transparent)]
    Unit(#[from] UnitParseError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Cannot start generator in state {0:?}")]
    InvalidState(GeneratorState),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
