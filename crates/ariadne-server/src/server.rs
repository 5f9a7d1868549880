//! HTTP server implementation.
//!
//! The server accepts TCP connections with Tokio and serves HTTP/1.1 with
//! Hyper, one task per connection, handing every request to an
//! [`HttpAdapter`].
//!
//! # Architecture
//!
//! - TCP listener bound to the configured address
//! - One connection task per client, tracked for graceful shutdown
//! - Request dispatch through the [`Router`](crate::Router)
//! - Graceful shutdown on a [`ShutdownSignal`]
//!
//! # Example
//!
//! ```rust,ignore
//! use ariadne_server::{Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router: Router = Router::new();
//!     // register routes...
//!
//!     let server = Server::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .router(router)
//!         .build();
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::adapter::HttpAdapter;
use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::registry::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The Ariadne HTTP server.
///
/// # Example
///
/// ```rust
/// use ariadne_server::{Router, Server, ServerConfig};
///
/// let config = ServerConfig::builder()
///     .http_addr("127.0.0.1:3000")
///     .build();
///
/// let server = Server::new(config, Router::new());
/// assert_eq!(server.config().http_addr(), "127.0.0.1:3000");
/// ```
#[derive(Debug)]
pub struct Server {
    /// Server configuration
    config: ServerConfig,

    /// Shared request handler
    adapter: HttpAdapter,
}

/// Per-connection protocol settings.
#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    keep_alive: bool,
    header_read_timeout: Option<Duration>,
}

impl Server {
    /// Creates a server for a fully registered router.
    #[must_use]
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let adapter = HttpAdapter::new(router).with_request_timeout(config.request_timeout());
        Self { config, adapter }
    }

    /// Creates a new server builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ariadne_server::Server;
    ///
    /// let server = Server::builder()
    ///     .http_addr("0.0.0.0:8080")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the adapter requests are handed to.
    #[must_use]
    pub fn adapter(&self) -> &HttpAdapter {
        &self.adapter
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        self.adapter.router()
    }

    /// Runs the server until SIGTERM or SIGINT is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// is triggered, then waits up to the shutdown timeout for open
    /// connections to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            routes = self.router().len(),
            "Server listening"
        );

        let settings = ConnectionSettings {
            keep_alive: self.config.keep_alive(),
            header_read_timeout: self.config.header_read_timeout(),
        };
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let adapter = self.adapter.clone();
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = serve_connection(adapter, settings, stream, shutdown).await {
                                    tracing::debug!(remote = %remote_addr, error = %e, "Connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        // Stop accepting before draining.
        drop(listener);

        let shutdown_timeout = self.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            connections = tracker.active_connections(),
            "Waiting for connections to close"
        );

        tokio::select! {
            () = tracker.wait_for_idle() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    connections = tracker.active_connections(),
                    "Shutdown timeout reached, connections still active"
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Serves one connection until the client leaves or shutdown completes it.
async fn serve_connection(
    adapter: HttpAdapter,
    settings: ConnectionSettings,
    stream: TcpStream,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);
    let service = adapter.service::<Incoming>();

    let mut builder = http1::Builder::new();
    builder.keep_alive(settings.keep_alive).timer(TokioTimer::new());
    if let Some(timeout) = settings.header_read_timeout {
        builder.header_read_timeout(timeout);
    }

    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            // Finish the request in progress, then close.
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

/// Builder for configuring and creating a [`Server`].
///
/// # Example
///
/// ```rust
/// use ariadne_server::{Router, ServerBuilder};
/// use std::time::Duration;
///
/// let server = ServerBuilder::new()
///     .http_addr("0.0.0.0:9090")
///     .shutdown_timeout(Duration::from_secs(60))
///     .request_timeout(Some(Duration::from_secs(30)))
///     .router(Router::new())
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config_builder: ServerConfigBuilder,
    router: Option<Router>,
}

impl ServerBuilder {
    /// Creates a new server builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every setting with an existing configuration.
    #[must_use]
    pub fn config(mut self, config: &ServerConfig) -> Self {
        self.config_builder = ServerConfigBuilder::new()
            .http_addr(config.http_addr())
            .shutdown_timeout(config.shutdown_timeout())
            .keep_alive(config.keep_alive())
            .header_read_timeout(config.header_read_timeout())
            .request_timeout(config.request_timeout());
        self
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.http_addr(addr);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.shutdown_timeout(timeout);
        self
    }

    /// Enables or disables HTTP keep-alive.
    #[must_use]
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.keep_alive(enabled);
        self
    }

    /// Sets the request head read timeout.
    #[must_use]
    pub fn header_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config_builder = self.config_builder.header_read_timeout(timeout);
        self
    }

    /// Sets the per-request dispatch timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config_builder = self.config_builder.request_timeout(timeout);
        self
    }

    /// Sets the router. Defaults to an empty one, which answers `404` to
    /// everything.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Builds the server with the configured settings.
    #[must_use]
    pub fn build(self) -> Server {
        Server::new(self.config_builder.build(), self.router.unwrap_or_default())
    }
}

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configured bind address does not parse.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// Parse failure.
        source: AddrParseError,
    },

    /// Failed to bind to the configured address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
