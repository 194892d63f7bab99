use linkprobe::harness::{
    ErrorModelConfig, HarnessError, RunConfig, RunReport, SimulationHarness, TransportVariant,
};
use linkprobe::metrics::{MeasurementError, TraceEvent};
use linkprobe::sim::SimTime;
use tempfile::TempDir;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= expected.abs() * 1e-9,
        "{actual} != {expected}"
    );
}

fn lossless(mut config: RunConfig) -> RunConfig {
    config.link.error_model = ErrorModelConfig::none();
    config
}

/// 1000 x 1500 B at 50 Mbit/s from t = 1.0 s over the deep-space link
#[test]
fn test_solar_flare_emission_schedule() {
    println!("\n=== Solar flare emission schedule ===\n");

    let report = SimulationHarness::new(lossless(RunConfig::solar_flare()))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.packets_sent, 1000);
    assert_close(report.first_emission_seconds.unwrap(), 1.0);
    // 999 gaps of 240us each
    assert_close(report.last_emission_seconds.unwrap(), 1.23976);
    println!("✓ Emitted {} packets", report.packets_sent);

    assert_eq!(report.bytes_received, 1_500_000);
    assert_eq!(report.summary.drop_count, 0);

    // Last packet: 240ns on the wire plus 1.28s propagation
    let elapsed = 0.23976 + 0.000_000_24 + 1.28;
    assert_close(report.summary.elapsed_seconds, elapsed);
    assert_close(report.summary.throughput_bps().unwrap(), 12_000_000.0 / elapsed);
    println!("✓ {}", report);
}

#[test]
fn test_solar_flare_losses_account_for_every_packet() {
    let config = RunConfig::solar_flare();
    let packet_size = config.generator.packet_size as u64;
    let report = SimulationHarness::new(config).unwrap().run().unwrap();

    let delivered = report.bytes_received / packet_size;
    assert_eq!(delivered + report.summary.drop_count, 1000);

    // Around 70% of 1500 byte packets see at least one bit error at 1e-4
    assert!(
        (600..=800).contains(&report.summary.drop_count),
        "drops = {}",
        report.summary.drop_count
    );
}

#[test]
fn test_baseline_run() {
    let report = SimulationHarness::new(RunConfig::baseline())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.variant, TransportVariant::NewReno);
    assert_eq!(report.packets_sent, 1000);
    let delivered = report.bytes_received / 1040;
    assert_eq!(delivered + report.summary.drop_count, 1000);
    // Roughly 1% loss at a byte error rate of 1e-5
    assert!(report.summary.drop_count < 50);
    assert!(report.summary.is_defined());

    // Pacing at 1Mbps dominates: 999 gaps of 8.32ms
    assert_close(report.last_emission_seconds.unwrap(), 1.0 + 999.0 * 0.00832);
}

#[test]
fn test_stop_leaves_no_outstanding_send() {
    let mut config = lossless(RunConfig::baseline());
    config.app_stop = Some(SimTime::from_millis(2000));

    let mut harness = SimulationHarness::new(config).unwrap();
    while harness.step().unwrap() {}

    assert!(harness.generator().outstanding_event().is_none());
    assert!(harness.generator().packets_sent() < 1000);
    assert_eq!(harness.pending_events(), 0);
}

#[test]
fn test_injected_window_changes() {
    let mut config = lossless(RunConfig::solar_flare());
    config.record_trace = true;

    let mut harness = SimulationHarness::new(config).unwrap();
    let mut cwnd = 536;
    for i in 0..25 {
        harness.inject_trace(
            SimTime::from_millis(1000 + i * 10),
            TraceEvent::CongestionWindow {
                old: cwnd,
                new: cwnd + 536,
            },
        );
        cwnd += 536;
    }

    let report = harness.run().unwrap();
    assert_eq!(report.summary.congestion_signal_count, 25);
    assert_eq!(report.trace.len(), 25 + 1000);
    assert!(report
        .trace
        .windows(2)
        .all(|pair| pair[0].time_seconds <= pair[1].time_seconds));
}

#[test]
fn test_nothing_received_is_undefined_throughput() {
    let mut config = RunConfig::baseline();
    config.link.error_model = ErrorModelConfig::per_packet(1.0);

    let report = SimulationHarness::new(config).unwrap().run().unwrap();
    assert_eq!(report.bytes_received, 0);
    assert!(matches!(
        report.summary.average_throughput,
        Err(MeasurementError::NonPositiveElapsed { .. })
    ));
    assert!(report.to_string().contains("undefined"));
}

#[test]
fn test_unknown_variant_in_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.json");

    let json = serde_json::to_string(&RunConfig::baseline())
        .unwrap()
        .replace("TcpNewReno", "TcpQuantum");
    std::fs::write(&path, json).unwrap();

    assert!(matches!(
        RunConfig::load(&path),
        Err(HarnessError::Serialization(_))
    ));
}

#[test]
fn test_config_file_round_trip_drives_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.json");

    let mut config = lossless(RunConfig::baseline()).with_variant(TransportVariant::Vegas);
    config.generator.packet_budget = 20;
    config.save(&path).unwrap();

    let loaded = RunConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let report = SimulationHarness::new(loaded).unwrap().run().unwrap();
    assert_eq!(report.variant, TransportVariant::Vegas);
    assert_eq!(report.packets_sent, 20);
    assert_eq!(report.bytes_received, 20 * 1040);
}

#[test]
fn test_report_saved_as_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");

    let mut config = lossless(RunConfig::solar_flare());
    config.generator.packet_budget = 10;
    let report = SimulationHarness::new(config).unwrap().run().unwrap();
    report.save_json(&path).unwrap();

    let loaded = RunReport::load_json(&path).unwrap();
    assert_eq!(loaded.run_id, report.run_id);
    assert_eq!(loaded.variant, TransportVariant::Cubic);
    assert_eq!(loaded.summary, report.summary);
    assert_eq!(loaded.delay, "1.28s");
}
