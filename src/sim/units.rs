//! Textual rate and delay values such as `"50Mbps"` and `"1.28s"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitParseError {
    #[error("Invalid data rate '{0}': expected a number followed by bps, kbps, Mbps or Gbps")]
    DataRate(String),

    #[error("Invalid delay '{0}': expected a number followed by s, ms, us or ns")]
    Delay(String),
}

/// Bit rate in bits per second.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DataRate(u64);

impl DataRate {
    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub const fn from_mbps(mbps: u64) -> Self {
        Self(mbps * 1_000_000)
    }

    pub const fn bits_per_second(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Time to clock `bytes` onto a wire at this rate. `None` for a zero rate.
    pub fn transmit_time(&self, bytes: u64) -> Option<Duration> {
        if self.0 == 0 {
            return None;
        }
        let nanos = bytes as u128 * 8 * 1_000_000_000 / self.0 as u128;
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }
}

impl FromStr for DataRate {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| UnitParseError::DataRate(s.to_string()))?;
        let (number, unit) = trimmed.split_at(split);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| UnitParseError::DataRate(s.to_string()))?;

        let multiplier = match unit {
            "bps" | "b/s" => 1.0,
            "kbps" | "Kbps" | "kb/s" => 1e3,
            "Mbps" | "Mb/s" => 1e6,
            "Gbps" | "Gb/s" => 1e9,
            _ => return Err(UnitParseError::DataRate(s.to_string())),
        };

        if !value.is_finite() || value < 0.0 {
            return Err(UnitParseError::DataRate(s.to_string()));
        }

        // u64::MAX as f64 rounds up to 2^64, so anything at or above it overflows
        let bps = (value * multiplier).round();
        if bps >= u64::MAX as f64 {
            return Err(UnitParseError::DataRate(s.to_string()));
        }

        Ok(Self(bps as u64))
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bps = self.0;
        if bps >= 1_000_000_000 && bps % 1_000_000_000 == 0 {
            write!(f, "{}Gbps", bps / 1_000_000_000)
        } else if bps >= 1_000_000 && bps % 1_000_000 == 0 {
            write!(f, "{}Mbps", bps / 1_000_000)
        } else if bps >= 1_000 && bps % 1_000 == 0 {
            write!(f, "{}kbps", bps / 1_000)
        } else {
            write!(f, "{}bps", bps)
        }
    }
}

/// Parse a delay string like `"2ms"` or `"1.28s"`.
pub fn parse_delay(s: &str) -> Result<Duration, UnitParseError> {
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| UnitParseError::Delay(s.to_string()))?;
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| UnitParseError::Delay(s.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(UnitParseError::Delay(s.to_string()));
    }

    let secs = match unit {
        "s" => value,
        "ms" => value / 1e3,
        "us" => value / 1e6,
        "ns" => value / 1e9,
        _ => return Err(UnitParseError::Delay(s.to_string())),
    };

    Duration::try_from_secs_f64(secs).map_err(|_| UnitParseError::Delay(s.to_string()))
}

/// Render a delay the way [`parse_delay`] reads it.
pub fn format_delay(delay: Duration) -> String {
    let nanos = delay.as_nanos();
    if nanos % 1_000_000_000 == 0 {
        format!("{}s", delay.as_secs())
    } else if nanos % 1_000_000 == 0 && nanos < 1_000_000_000 {
        format!("{}ms", delay.as_millis())
    } else {
        format!("{}s", delay.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_rates() {
        assert_eq!("50Mbps".parse::<DataRate>().unwrap().bits_per_second(), 50_000_000);
        assert_eq!("5kbps".parse::<DataRate>().unwrap().bits_per_second(), 5_000);
        assert_eq!("1Gbps".parse::<DataRate>().unwrap().bits_per_second(), 1_000_000_000);
        assert_eq!("800bps".parse::<DataRate>().unwrap().bits_per_second(), 800);
        assert_eq!(
            "50000Mbps".parse::<DataRate>().unwrap().bits_per_second(),
            50_000_000_000
        );
        assert_eq!("1.5Mbps".parse::<DataRate>().unwrap().bits_per_second(), 1_500_000);
    }

    #[test]
    fn test_reject_bad_rates() {
        assert!("fast".parse::<DataRate>().is_err());
        assert!("50".parse::<DataRate>().is_err());
        assert!("50Xbps".parse::<DataRate>().is_err());
        assert!("-1Mbps".parse::<DataRate>().is_err());
    }

    #[test]
    fn test_reject_rate_beyond_u64() {
        assert_eq!(
            "99999999999999999999999Gbps".parse::<DataRate>(),
            Err(UnitParseError::DataRate("99999999999999999999999Gbps".to_string()))
        );
        assert!("18446744073709551616bps".parse::<DataRate>().is_err());
        assert_eq!(
            "1000000Gbps".parse::<DataRate>().unwrap().bits_per_second(),
            1_000_000_000_000_000
        );
    }

    #[test]
    fn test_display_rates() {
        assert_eq!(DataRate::from_mbps(50).to_string(), "50Mbps");
        assert_eq!(DataRate::from_bps(50_000_000_000).to_string(), "50Gbps");
        assert_eq!(DataRate::from_bps(1_500).to_string(), "1500bps");
    }

    #[test]
    fn test_transmit_time() {
        let rate = DataRate::from_mbps(50);
        assert_eq!(rate.transmit_time(1500), Some(Duration::from_micros(240)));
        assert_eq!(DataRate::from_bps(0).transmit_time(1500), None);
    }

    #[test]
    fn test_parse_delays() {
        assert_eq!(parse_delay("2ms").unwrap(), Duration::from_millis(2));
        assert_eq!(parse_delay("1.28s").unwrap(), Duration::from_millis(1280));
        assert_eq!(parse_delay("10us").unwrap(), Duration::from_micros(10));
        assert!(parse_delay("soon").is_err());
        assert!(parse_delay("3h").is_err());
    }

    #[test]
    fn test_reject_delay_beyond_duration() {
        assert_eq!(
            parse_delay("99999999999999999999999s"),
            Err(UnitParseError::Delay("99999999999999999999999s".to_string()))
        );
        assert!(parse_delay("1000000000000000000000000000000ms").is_err());
        assert_eq!(parse_delay("86400s").unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_format_delay() {
        assert_eq!(format_delay(Duration::from_millis(2)), "2ms");
        assert_eq!(format_delay(Duration::from_secs(3)), "3s");
        assert_eq!(format_delay(Duration::from_millis(1280)), "1.28s");
    }
}
