use crate::generator::error::ConfigurationError;
use crate::sim::DataRate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorState {
    Idle,
    Running,
    Stopped,
}

impl GeneratorState {
    pub fn is_running(&self) -> bool {
        matches!(self, GeneratorState::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GeneratorState::Stopped)
    }
}

/// Identifies one application within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(pub u32);

/// Timer expiry delivered back to the generator that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorTimer {
    pub app: AppId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Payload bytes per emission
    pub packet_size: u32,
    /// Total emissions per run
    pub packet_budget: u32,
    /// Pacing rate in bits per second
    pub data_rate: DataRate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            packet_size: 1500,
            packet_budget: 1000,
            data_rate: DataRate::from_mbps(50),
        }
    }
}

impl GeneratorConfig {
    pub fn new(packet_size: u32, packet_budget: u32, data_rate: DataRate) -> Self {
        Self {
            packet_size,
            packet_budget,
            data_rate,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.packet_size == 0 {
            return Err(ConfigurationError::ZeroPacketSize);
        }
        if self.packet_budget == 0 {
            return Err(ConfigurationError::ZeroPacketBudget);
        }
        if self.data_rate.is_zero() {
            return Err(ConfigurationError::ZeroDataRate);
        }
        Ok(())
    }

    /// Gap between consecutive emissions: `packet_size * 8 / rate` seconds.
    pub fn inter_packet_delay(&self) -> Option<Duration> {
        self.data_rate.transmit_time(self.packet_size as u64)
    }

    /// Simulated time from the first to the last emission.
    pub fn emission_span(&self) -> Option<Duration> {
        let gap = self.inter_packet_delay()?;
        Some(gap * self.packet_budget.saturating_sub(1))
    }

    pub fn total_bytes(&self) -> u64 {
        self.packet_size as u64 * self.packet_budget as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let rate = DataRate::from_mbps(1);
        assert_eq!(
            GeneratorConfig::new(0, 10, rate).validate(),
            Err(ConfigurationError::ZeroPacketSize)
        );
        assert_eq!(
            GeneratorConfig::new(10, 0, rate).validate(),
            Err(ConfigurationError::ZeroPacketBudget)
        );
        assert_eq!(
            GeneratorConfig::new(10, 10, DataRate::from_bps(0)).validate(),
            Err(ConfigurationError::ZeroDataRate)
        );
    }

    #[test]
    fn test_inter_packet_delay() {
        let config = GeneratorConfig::new(1500, 1000, DataRate::from_mbps(50));
        assert_eq!(config.inter_packet_delay(), Some(Duration::from_micros(240)));
        assert_eq!(config.emission_span(), Some(Duration::from_micros(239_760)));
        assert_eq!(config.total_bytes(), 1_500_000);

        let baseline = GeneratorConfig::new(1040, 1000, DataRate::from_mbps(1));
        assert_eq!(baseline.inter_packet_delay(), Some(Duration::from_micros(8320)));
    }
}
