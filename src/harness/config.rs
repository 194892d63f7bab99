//! Run configuration and named link presets

use crate::generator::{ConfigurationError, GeneratorConfig};
use crate::harness::error::HarnessResult;
use crate::sim::{format_delay, parse_delay, DataRate, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Transport protocol flavour under comparison. Only its label reaches the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransportVariant {
    NewReno,
    Hybla,
    HighSpeed,
    Htcp,
    Vegas,
    Scalable,
    Veno,
    Bic,
    Yeah,
    Illinois,
    Westwood,
    WestwoodPlus,
    Ledbat,
    Cubic,
}

impl TransportVariant {
    pub const ALL: [TransportVariant; 14] = [
        TransportVariant::NewReno,
        TransportVariant::Hybla,
        TransportVariant::HighSpeed,
        TransportVariant::Htcp,
        TransportVariant::Vegas,
        TransportVariant::Scalable,
        TransportVariant::Veno,
        TransportVariant::Bic,
        TransportVariant::Yeah,
        TransportVariant::Illinois,
        TransportVariant::Westwood,
        TransportVariant::WestwoodPlus,
        TransportVariant::Ledbat,
        TransportVariant::Cubic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransportVariant::NewReno => "TcpNewReno",
            TransportVariant::Hybla => "TcpHybla",
            TransportVariant::HighSpeed => "TcpHighSpeed",
            TransportVariant::Htcp => "TcpHtcp",
            TransportVariant::Vegas => "TcpVegas",
            TransportVariant::Scalable => "TcpScalable",
            TransportVariant::Veno => "TcpVeno",
            TransportVariant::Bic => "TcpBic",
            TransportVariant::Yeah => "TcpYeah",
            TransportVariant::Illinois => "TcpIllinois",
            TransportVariant::Westwood => "TcpWestwood",
            TransportVariant::WestwoodPlus => "TcpWestwoodPlus",
            TransportVariant::Ledbat => "TcpLedbat",
            TransportVariant::Cubic => "TcpCubic",
        }
    }
}

impl FromStr for TransportVariant {
    type Err = ConfigurationError;

    /// Accepts `TcpCubic`, `cubic`, or `Cubic`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| {
                let label = v.label();
                label.eq_ignore_ascii_case(name) || label["Tcp".len()..].eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| ConfigurationError::UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for TransportVariant {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransportVariant> for String {
    fn from(v: TransportVariant) -> Self {
        v.label().to_string()
    }
}

impl fmt::Display for TransportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Granularity at which the receive error model applies its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorUnit {
    Bit,
    Byte,
    Packet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorModelConfig {
    /// Per-unit error probability (0.0 - 1.0)
    pub rate: f64,
    pub unit: ErrorUnit,
}

impl Default for ErrorModelConfig {
    fn default() -> Self {
        Self::none()
    }
}

impl ErrorModelConfig {
    pub fn none() -> Self {
        Self {
            rate: 0.0,
            unit: ErrorUnit::Byte,
        }
    }

    pub fn per_bit(rate: f64) -> Self {
        Self {
            rate,
            unit: ErrorUnit::Bit,
        }
    }

    pub fn per_byte(rate: f64) -> Self {
        Self {
            rate,
            unit: ErrorUnit::Byte,
        }
    }

    pub fn per_packet(rate: f64) -> Self {
        Self {
            rate,
            unit: ErrorUnit::Packet,
        }
    }

    /// Probability that a packet of `bytes` length is corrupted.
    pub fn packet_error_probability(&self, bytes: usize) -> f64 {
        let units = match self.unit {
            ErrorUnit::Bit => bytes as f64 * 8.0,
            ErrorUnit::Byte => bytes as f64,
            ErrorUnit::Packet => return self.rate,
        };
        1.0 - (1.0 - self.rate).powf(units)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub data_rate: DataRate,
    /// One-way propagation delay
    pub delay: Duration,
    pub error_model: ErrorModelConfig,
    /// Seed for the error model RNG
    pub seed: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            data_rate: DataRate::from_mbps(5),
            delay: Duration::from_millis(2),
            error_model: ErrorModelConfig::none(),
            seed: 1,
        }
    }
}

impl LinkConfig {
    /// Build from the textual forms used in experiment notes, e.g. `("5Mbps", "2ms")`.
    pub fn parse(data_rate: &str, delay: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            data_rate: data_rate.parse()?,
            delay: parse_delay(delay)?,
            ..Default::default()
        })
    }

    pub fn delay_label(&self) -> String {
        format_delay(self.delay)
    }
}

/// Everything needed to execute one measurement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub variant: TransportVariant,
    pub link: LinkConfig,
    pub generator: GeneratorConfig,
    pub sender_addr: SocketAddr,
    pub sink_addr: SocketAddr,
    /// When the generator starts
    pub app_start: SimTime,
    /// When the generator is stopped; `None` lets it finish its budget
    pub app_stop: Option<SimTime>,
    /// Run ceiling; events after this instant are not dispatched
    pub max_sim_time: Option<SimTime>,
    /// Keep every trace point in the report
    pub record_trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::solar_flare()
    }
}

impl RunConfig {
    /// Terrestrial point-to-point link: 5Mbps, 2ms, light byte errors,
    /// 1000 x 1040 byte packets paced at 1Mbps, stopped at 20s.
    pub fn baseline() -> Self {
        Self {
            variant: TransportVariant::NewReno,
            link: LinkConfig {
                data_rate: DataRate::from_mbps(5),
                delay: Duration::from_millis(2),
                error_model: ErrorModelConfig::per_byte(0.00001),
                seed: 1,
            },
            generator: GeneratorConfig::new(1040, 1000, DataRate::from_mbps(1)),
            sender_addr: default_sender_addr(),
            sink_addr: default_sink_addr(),
            app_start: SimTime::from_millis(1000),
            app_stop: Some(SimTime::from_millis(20_000)),
            max_sim_time: Some(SimTime::from_millis(20_000)),
            record_trace: false,
        }
    }

    /// Deep-space link during a strong solar flare: 50000Mbps, 1.28s delay,
    /// bit error rate 1e-4, 1000 x 1500 byte packets paced at 50Mbps.
    pub fn solar_flare() -> Self {
        Self {
            variant: TransportVariant::Cubic,
            link: LinkConfig {
                data_rate: DataRate::from_mbps(50_000),
                delay: Duration::from_millis(1280),
                error_model: ErrorModelConfig::per_bit(0.0001),
                seed: 1,
            },
            generator: GeneratorConfig::new(1500, 1000, DataRate::from_mbps(50)),
            sender_addr: default_sender_addr(),
            sink_addr: default_sink_addr(),
            app_start: SimTime::from_millis(1000),
            app_stop: None,
            max_sim_time: None,
            record_trace: false,
        }
    }

    pub fn with_variant(mut self, variant: TransportVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_error_rate(mut self, rate: f64) -> Self {
        self.link.error_model.rate = rate;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.link.delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.link.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.generator.validate()?;

        if self.link.data_rate.is_zero() {
            return Err(ConfigurationError::ZeroLinkRate);
        }

        let rate = self.link.error_model.rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigurationError::InvalidErrorRate(rate));
        }

        if let Some(stop) = self.app_stop {
            if stop < self.app_start {
                return Err(ConfigurationError::StopBeforeStart {
                    start: self.app_start.to_string(),
                    stop: stop.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Load a JSON run configuration.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> HarnessResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn default_sender_addr() -> SocketAddr {
    SocketAddr::from(([10, 1, 1, 1], 49153))
}

fn default_sink_addr() -> SocketAddr {
    SocketAddr::from(([10, 1, 1, 2], 8080))
}
