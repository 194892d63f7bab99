//! Prometheus metrics exporter
//!
//! Installs the global recorder, optionally with an HTTP scrape endpoint.

use crate::metrics::error::MetricsError;
use crate::metrics::recorder::init_metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;

/// Global prometheus handle
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Scrape endpoint address; `None` keeps metrics in-process only
    pub listen_addr: Option<SocketAddr>,
}

impl MetricsConfig {
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: Some(addr),
        }
    }

    /// Read `LINKPROBE_METRICS_ADDR` if set.
    pub fn from_env() -> Result<Self, MetricsError> {
        match std::env::var("LINKPROBE_METRICS_ADDR") {
            Ok(raw) => raw
                .parse()
                .map(Self::with_addr)
                .map_err(|e| MetricsError::SetupFailed(format!("invalid address '{raw}': {e}"))),
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Initialize the exporter. Later calls return the existing handle.
pub fn install_exporter(config: MetricsConfig) -> Result<&'static PrometheusHandle, MetricsError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle);
    }

    let handle = match config.listen_addr {
        // Binding the listener requires a running tokio runtime
        Some(addr) => {
            let (recorder, exporter) = PrometheusBuilder::new()
                .with_http_listener(addr)
                .build()
                .map_err(|e| MetricsError::SetupFailed(e.to_string()))?;
            let handle = recorder.handle();
            ::metrics::set_global_recorder(recorder)
                .map_err(|e| MetricsError::SetupFailed(e.to_string()))?;
            tokio::spawn(async move {
                if let Err(e) = exporter.await {
                    tracing::warn!("Metrics exporter stopped: {:?}", e);
                }
            });
            tracing::info!("Serving metrics on http://{}/metrics", addr);
            handle
        }
        None => PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| MetricsError::SetupFailed(e.to_string()))?,
    };

    let _ = PROMETHEUS_HANDLE.set(handle);
    // Descriptions only reach a recorder that is already installed
    init_metrics();
    PROMETHEUS_HANDLE
        .get()
        .ok_or_else(|| MetricsError::SetupFailed("handle not stored".to_string()))
}

/// Render metrics in Prometheus text format, if the exporter is installed.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}
