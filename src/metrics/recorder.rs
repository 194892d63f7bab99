//! Mirrors run counters into the global `metrics` facade.
//!
//! Without an installed recorder every call here is a no-op.

use crate::generator::AppId;
use crate::metrics::types::Summary;
use ::metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        "linkprobe_packets_sent_total",
        "Payloads handed to the connection by traffic generators"
    );
    describe_counter!(
        "linkprobe_bytes_sent_total",
        "Payload bytes handed to the connection by traffic generators"
    );
    describe_counter!(
        "linkprobe_rx_drops_total",
        "Units declared undeliverable by a lower layer"
    );
    describe_counter!(
        "linkprobe_rx_completed_total",
        "Units completely received from the channel"
    );
    describe_counter!(
        "linkprobe_congestion_signals_total",
        "Congestion window changes reported by the transport"
    );

    describe_gauge!(
        "linkprobe_congestion_window",
        "Most recent congestion window value"
    );

    describe_histogram!(
        "linkprobe_run_throughput_bps",
        "Average throughput of completed runs"
    );
    describe_histogram!(
        "linkprobe_run_elapsed_seconds",
        "Simulated time from application start to last completion"
    );
}

// ============== Generator ==============

pub fn record_packet_sent(app: AppId, bytes: u64) {
    let app = app.0.to_string();
    counter!("linkprobe_packets_sent_total", "app" => app.clone()).increment(1);
    counter!("linkprobe_bytes_sent_total", "app" => app).increment(bytes);
}

// ============== Trace points ==============

pub fn record_rx_drop() {
    counter!("linkprobe_rx_drops_total").increment(1);
}

pub fn record_rx_completed() {
    counter!("linkprobe_rx_completed_total").increment(1);
}

pub fn record_congestion_signal(_old: u32, new: u32) {
    counter!("linkprobe_congestion_signals_total").increment(1);
    gauge!("linkprobe_congestion_window").set(new as f64);
}

// ============== Runs ==============

pub fn record_run_summary(variant: &str, summary: &Summary) {
    histogram!("linkprobe_run_elapsed_seconds", "variant" => variant.to_string())
        .record(summary.elapsed_seconds);
    if let Some(bps) = summary.throughput_bps() {
        histogram!("linkprobe_run_throughput_bps", "variant" => variant.to_string()).record(bps);
    }
}
