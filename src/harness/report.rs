//! Run report
//!
//! Serializable record of one run, printable in the classic textual form.

use crate::harness::config::{ErrorUnit, RunConfig, TransportVariant};
use crate::harness::error::HarnessResult;
use crate::metrics::{Summary, TraceEntry};
use crate::sim::{format_delay, DataRate, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: String,
    pub variant: TransportVariant,
    /// Generator pacing rate
    pub data_rate: DataRate,
    pub link_rate: DataRate,
    pub error_rate: f64,
    pub error_unit: ErrorUnit,
    pub delay: String,
    pub packets_sent: u32,
    pub bytes_received: u64,
    pub first_emission_seconds: Option<f64>,
    pub last_emission_seconds: Option<f64>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

impl RunReport {
    pub(crate) fn new(
        config: &RunConfig,
        summary: Summary,
        packets_sent: u32,
        bytes_received: u64,
        first_emission: Option<SimTime>,
        last_emission: Option<SimTime>,
        trace: Vec<TraceEntry>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            variant: config.variant,
            data_rate: config.generator.data_rate,
            link_rate: config.link.data_rate,
            error_rate: config.link.error_model.rate,
            error_unit: config.link.error_model.unit,
            delay: format_delay(config.link.delay),
            packets_sent,
            bytes_received,
            first_emission_seconds: first_emission.map(SimTime::as_secs_f64),
            last_emission_seconds: last_emission.map(SimTime::as_secs_f64),
            summary,
            trace,
        }
    }

    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> HarnessResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TCP Variant: {}, Data Rate: {}, Error Rate: {}, Delay: {}",
            self.variant, self.data_rate, self.error_rate, self.delay
        )?;
        writeln!(
            f,
            "Total simulation time (seconds): {}",
            self.summary.elapsed_seconds
        )?;
        match self.summary.throughput_bps() {
            Some(bps) => writeln!(f, "Average throughput: {} bit/s", bps)?,
            None => writeln!(f, "Average throughput: undefined (no data received after start)")?,
        }
        writeln!(f, "Packets dropped: {}", self.summary.drop_count)?;
        write!(
            f,
            "Times congestion window changed: {}",
            self.summary.congestion_signal_count
        )
    }
}

/// Render several reports as a fixed-width comparison table.
pub fn render_table(reports: &[RunReport]) -> String {
    let mut out = format!(
        "{:<16} {:>10} {:>8} {:>10} {:>16} {:>8} {:>6}\n",
        "variant", "error", "delay", "elapsed_s", "throughput_mbps", "drops", "cwnd"
    );
    for report in reports {
        let throughput = report
            .summary
            .throughput_mbps()
            .map(|mbps| format!("{mbps:.3}"))
            .unwrap_or_else(|| "undefined".to_string());
        out.push_str(&format!(
            "{:<16} {:>10} {:>8} {:>10.4} {:>16} {:>8} {:>6}\n",
            report.variant.label(),
            report.error_rate,
            report.delay,
            report.summary.elapsed_seconds,
            throughput,
            report.summary.drop_count,
            report.summary.congestion_signal_count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MeasurementError;

    fn summary(throughput: Result<f64, MeasurementError>) -> Summary {
        Summary {
            elapsed_seconds: 0.24,
            average_throughput: throughput,
            drop_count: 3,
            congestion_signal_count: 7,
        }
    }

    #[test]
    fn test_display_matches_classic_output() {
        let report = RunReport::new(
            &RunConfig::solar_flare(),
            summary(Ok(50_000_000.0)),
            1000,
            1_500_000,
            Some(SimTime::from_millis(1000)),
            None,
            Vec::new(),
        );
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "TCP Variant: TcpCubic, Data Rate: 50Mbps, Error Rate: 0.0001, Delay: 1.28s"
        );
        assert_eq!(lines[1], "Total simulation time (seconds): 0.24");
        assert_eq!(lines[2], "Average throughput: 50000000 bit/s");
        assert_eq!(lines[3], "Packets dropped: 3");
        assert_eq!(lines[4], "Times congestion window changed: 7");
    }

    #[test]
    fn test_display_undefined_throughput() {
        let report = RunReport::new(
            &RunConfig::baseline(),
            summary(Err(MeasurementError::NonPositiveElapsed {
                elapsed_seconds: 0.0,
            })),
            0,
            0,
            None,
            None,
            Vec::new(),
        );
        assert!(report.to_string().contains("Average throughput: undefined"));
    }

    #[test]
    fn test_json_omits_empty_trace() {
        let report = RunReport::new(
            &RunConfig::baseline(),
            summary(Ok(1.0)),
            1,
            1040,
            None,
            None,
            Vec::new(),
        );
        let json = report.to_json().unwrap();
        assert!(json.contains("\"variant\": \"TcpNewReno\""));
        assert!(!json.contains("\"trace\""));
    }

    #[test]
    fn test_table_has_row_per_report() {
        let reports: Vec<RunReport> = [TransportVariant::Vegas, TransportVariant::Bic]
            .into_iter()
            .map(|v| {
                RunReport::new(
                    &RunConfig::baseline().with_variant(v),
                    summary(Ok(2_000_000.0)),
                    1,
                    1,
                    None,
                    None,
                    Vec::new(),
                )
            })
            .collect();

        let table = render_table(&reports);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("TcpVegas"));
        assert!(table.contains("2.000"));
    }
}
