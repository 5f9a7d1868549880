//! Prometheus metrics for Ariadne.
//!
//! Recording goes through the `metrics` facade, so every function here is a
//! no-op until [`init_metrics`] installs the Prometheus recorder.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `ariadne_dispatch_total` | Counter | `outcome` | Dispatched requests |
//! | `ariadne_dispatch_duration_seconds` | Histogram | `outcome` | Dispatch latency |
//! | `ariadne_dispatch_matched_routes` | Histogram | - | Routes matched per request |
//! | `ariadne_in_flight_requests` | Gauge | - | Requests being dispatched |
//! | `ariadne_request_timeouts_total` | Counter | - | Requests cut off by the transport |
//!
//! # Example
//!
//! ```rust
//! use ariadne_telemetry::metrics::{record_dispatch, DispatchOutcome};
//! use std::time::Duration;
//!
//! record_dispatch(DispatchOutcome::Fallback, 0, Duration::from_micros(80));
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names.
pub mod names {
    /// Dispatched requests, labelled by outcome.
    pub const DISPATCH_TOTAL: &str = "ariadne_dispatch_total";
    /// Dispatch latency in seconds, labelled by outcome.
    pub const DISPATCH_DURATION_SECONDS: &str = "ariadne_dispatch_duration_seconds";
    /// Routes whose matcher accepted the request.
    pub const DISPATCH_MATCHED_ROUTES: &str = "ariadne_dispatch_matched_routes";
    /// Requests currently being dispatched.
    pub const IN_FLIGHT_REQUESTS: &str = "ariadne_in_flight_requests";
    /// Requests answered with a timeout by the transport.
    pub const REQUEST_TIMEOUTS_TOTAL: &str = "ariadne_request_timeouts_total";
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// A resolver finalized the response, or wrote its head and was ended
    /// by the dispatcher.
    Handled,
    /// No resolver finalized the response; the 404 fallback was written.
    Fallback,
    /// A resolver failed.
    Failed,
}

impl DispatchOutcome {
    /// Returns the metric label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::Fallback => "fallback",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Value of the global `service` label.
    pub service_name: String,

    /// Histogram buckets for dispatch duration.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "ariadne".to_string(),
            // 100us .. 10s
            duration_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
                10.0,
            ],
        }
    }
}

/// Metrics registry for Ariadne.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with the given handle.
    #[must_use]
    pub fn new(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Renders all metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Installs the Prometheus recorder.
///
/// Metrics are exposed by rendering [`MetricsRegistry::render`] (or
/// [`render_metrics`]) from a route of the application's choosing.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed
/// and `TelemetryError::InvalidConfig` for unusable buckets.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<Option<MetricsRegistry>> {
    if !config.enabled {
        return Ok(None);
    }

    let builder = PrometheusBuilder::new()
        .add_global_label("service", config.service_name.clone())
        .set_buckets_for_metric(
            Matcher::Full(names::DISPATCH_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))?;

    let handle = builder
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle.clone());

    register_metric_descriptions();

    Ok(Some(MetricsRegistry::new(handle)))
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(names::DISPATCH_TOTAL, "Total number of dispatched requests");
    describe_histogram!(
        names::DISPATCH_DURATION_SECONDS,
        "Time spent in the forward and backward passes, in seconds"
    );
    describe_histogram!(
        names::DISPATCH_MATCHED_ROUTES,
        "Number of routes whose matcher accepted a request"
    );
    describe_gauge!(
        names::IN_FLIGHT_REQUESTS,
        "Number of requests currently being dispatched"
    );
    describe_counter!(
        names::REQUEST_TIMEOUTS_TOTAL,
        "Total number of requests cut off by the request timeout"
    );
}

/// Records a finished dispatch.
///
/// Updates `ariadne_dispatch_total`, `ariadne_dispatch_duration_seconds` and
/// `ariadne_dispatch_matched_routes`.
pub fn record_dispatch(outcome: DispatchOutcome, matched: usize, duration: Duration) {
    counter!(names::DISPATCH_TOTAL, "outcome" => outcome.as_str()).increment(1);

    histogram!(names::DISPATCH_DURATION_SECONDS, "outcome" => outcome.as_str())
        .record(duration.as_secs_f64());

    #[allow(clippy::cast_precision_loss)]
    histogram!(names::DISPATCH_MATCHED_ROUTES).record(matched as f64);
}

/// Records a request cut off by the transport timeout.
pub fn record_timeout() {
    counter!(names::REQUEST_TIMEOUTS_TOTAL).increment(1);
}

/// Guard that tracks one in-flight request.
///
/// Increments `ariadne_in_flight_requests` on creation and decrements it on
/// drop, including when the request future is cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(names::IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(names::IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.service_name, "ariadne");
        assert!(!config.duration_buckets.is_empty());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(DispatchOutcome::Handled.as_str(), "handled");
        assert_eq!(DispatchOutcome::Fallback.to_string(), "fallback");
        assert_eq!(DispatchOutcome::Failed.as_str(), "failed");
    }

    #[test]
    fn test_disabled_metrics_install_nothing() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(init_metrics(&config).unwrap().is_none());
    }

    #[test]
    fn test_record_functions_dont_panic() {
        // No recorder installed: the facade drops everything.
        record_dispatch(DispatchOutcome::Handled, 2, Duration::from_millis(3));
        record_timeout();
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
