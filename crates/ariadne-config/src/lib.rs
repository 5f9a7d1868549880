//! Typed configuration for Ariadne.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! Each section converts into the runtime configuration of the crate that
//! uses it: [`ServerSection::to_server_config`] for the server,
//! [`AriadneConfig::telemetry_config`] for logging and metrics.
//!
//! # Example
//!
//! ```no_run
//! use ariadne_config::ConfigLoader;
//!
//! # fn main() -> Result<(), ariadne_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("ariadne.toml")?
//!     .with_env_prefix("ARIADNE")
//!     .load()?;
//!
//! println!("Server will listen on: {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! keep_alive = true
//! header_read_timeout_secs = 30
//! request_timeout_ms = 10000
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//! service_name = "my-service"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `ARIADNE__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `ARIADNE__SERVER__REQUEST_TIMEOUT_MS=none`
//! - `ARIADNE__LOGGING__LEVEL=ariadne_server=debug`
//! - `ARIADNE__METRICS__ENABLED=false`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AriadneConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingSection, MetricsSection, ServerSection};
