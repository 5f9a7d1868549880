//! Configuration schema types.
//!
//! Each section deserializes with per-field defaults and rejects unknown
//! keys, and converts into the runtime type of the crate that consumes it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use ariadne_server::ServerConfig;
use ariadne_telemetry::{LogConfig, MetricsConfig};

/// Server configuration section.
///
/// # Example
///
/// ```
/// use ariadne_config::ServerSection;
///
/// let section = ServerSection {
///     http_addr: "0.0.0.0:8080".to_string(),
///     request_timeout_ms: Some(5000),
///     ..Default::default()
/// };
///
/// let config = section.to_server_config();
/// assert_eq!(config.request_timeout().unwrap().as_millis(), 5000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// HTTP server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Reuse connections for several requests.
    #[serde(default = "default_true")]
    pub keep_alive: bool,

    /// Time allowed for a request head to arrive. None means unlimited.
    #[serde(default = "default_header_read_timeout")]
    pub header_read_timeout_secs: Option<u64>,

    /// Time allowed for one dispatch. None means unlimited.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            keep_alive: true,
            header_read_timeout_secs: default_header_read_timeout(),
            request_timeout_ms: None,
        }
    }
}

impl ServerSection {
    /// Builds the server's runtime configuration.
    #[must_use]
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(self.shutdown_timeout_secs))
            .keep_alive(self.keep_alive)
            .header_read_timeout(self.header_read_timeout_secs.map(Duration::from_secs))
            .request_timeout(self.request_timeout_ms.map(Duration::from_millis))
            .build()
    }
}

fn default_http_addr() -> String {
    ariadne_server::config::DEFAULT_HTTP_ADDR.to_string()
}

fn default_shutdown_timeout() -> u64 {
    ariadne_server::config::DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

#[allow(clippy::unnecessary_wraps)]
fn default_header_read_timeout() -> Option<u64> {
    Some(ariadne_server::config::DEFAULT_HEADER_READ_TIMEOUT_SECS)
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "ariadne_server=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Include span open/close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            span_events: false,
        }
    }
}

impl LoggingSection {
    /// Builds the telemetry logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            span_events: self.span_events,
            file_line_info: self.include_location,
            ..LogConfig::production()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Value of the `service` label on every metric.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Histogram bucket boundaries for dispatch duration, in seconds.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: default_service_name(),
            duration_buckets: default_duration_buckets(),
        }
    }
}

impl MetricsSection {
    /// Builds the telemetry metrics configuration.
    #[must_use]
    pub fn to_metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            enabled: self.enabled,
            service_name: self.service_name.clone(),
            duration_buckets: self.duration_buckets.clone(),
        }
    }
}

fn default_service_name() -> String {
    "ariadne".to_string()
}

fn default_duration_buckets() -> Vec<f64> {
    MetricsConfig::default().duration_buckets
}
