//! Telemetry module
//!
//! Logging, Prometheus metrics, and the console dashboard

pub mod dashboard;
mod logging;
mod metrics;

pub use dashboard::render_status;
pub use logging::init_logging;
pub use self::metrics::{
    record_latency, record_risk_state, record_trade, record_veto, set_gauge, GaugeMetric,
    LatencyMetric,
};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Guard that keeps telemetry alive for the process lifetime
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter on {}: {}", addr, e))?;
        tracing::info!(%addr, "Prometheus metrics exporter started");
    }

    Ok(TelemetryGuard { _priv: () })
}
