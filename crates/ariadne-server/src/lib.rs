//! # Ariadne Server
//!
//! The route registry, the two-phase dispatcher and the HTTP transport for
//! Ariadne.
//!
//! - [`Router`] - Ordered, append-only route registry
//! - [`Router::dispatch`] - Forward pass, backward unwind, `404` fallback
//! - [`HttpAdapter`] - Hyper request/response translation
//! - [`Server`] - Tokio accept loop with graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use ariadne_core::Outcome;
//! use ariadne_server::{Router, Server};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router: Router = Router::new();
//!     router.static_get("/", |_req, res, _ctx| async move {
//!         res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
//!         Ok(Outcome::Done)
//!     });
//!
//!     Server::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .router(router)
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ariadne-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
pub mod config;
mod dispatch;
mod registry;
mod server;
pub mod shutdown;

pub use adapter::{HttpAdapter, HttpResponse, ResponseBody};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use dispatch::{DispatchError, DispatchReport};
pub use registry::{Route, Router};
pub use server::{Server, ServerBuilder, ServerError};
pub use shutdown::ShutdownSignal;
