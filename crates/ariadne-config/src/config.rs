//! The root configuration type.

use serde::{Deserialize, Serialize};

use ariadne_telemetry::TelemetryConfig;

use crate::{ConfigError, LogFormat, LoggingSection, MetricsSection, ServerSection};

/// Complete Ariadne configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use ariadne_config::AriadneConfig;
///
/// let config = AriadneConfig::default();
/// assert_eq!(config.server.http_addr, "127.0.0.1:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct AriadneConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl AriadneConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The shutdown timeout is zero
    /// - The log level is empty
    /// - The service name is empty while metrics are enabled
    /// - Duration buckets are empty or not strictly increasing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        if self.metrics.enabled {
            if self.metrics.service_name.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "metrics.service_name",
                    "must not be empty",
                ));
            }

            let buckets = &self.metrics.duration_buckets;
            if buckets.is_empty() || buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(ConfigError::invalid_value(
                    "metrics.duration_buckets",
                    "must be non-empty and strictly increasing",
                ));
            }
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use ariadne_config::{AriadneConfig, LogFormat};
    ///
    /// let config = AriadneConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Production preset: JSON logs at info level, listening on all
    /// interfaces.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.server.http_addr = "0.0.0.0:8080".to_string();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;

        config
    }

    /// Builds the telemetry configuration from the logging and metrics
    /// sections.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(&self.metrics.service_name)
            .logging(self.logging.to_log_config())
            .metrics(self.metrics.to_metrics_config())
            .build()
    }
}
