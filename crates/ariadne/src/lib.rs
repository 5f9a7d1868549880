//! # Ariadne
//!
//! **A minimal ordered HTTP router with two-phase resolvers.**
//!
//! - Routes are tried in registration order; every route whose method and
//!   path match runs, not just the first one
//! - A forward resolver may defer work to the backward pass, which runs in
//!   reverse order once the forward pass is over
//! - A request no route finalized gets `404 Not Found`
//! - Static paths compare exactly; dynamic paths bind `:name` segments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ariadne::prelude::*;
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router: Router = Router::new();
//!     router
//!         .static_get("/", |_req, res, _ctx| async move {
//!             res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
//!             Ok(Outcome::Done)
//!         })
//!         .dynamic_get("/hello/:name", |_req, res, ctx| async move {
//!             let name = ctx.param("name").unwrap_or_default().to_string();
//!             res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
//!             Ok(Outcome::Done)
//!         });
//!
//!     Server::builder()
//!         .http_addr("127.0.0.1:8080")
//!         .router(router)
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Dispatch
//!
//! ```text
//! forward:  route 0 → route 1 → … → route n   (matching routes only)
//!                                        ↓
//! backward: deferred n ← … ← deferred 0     → 404 if nothing ended the response
//! ```

#![doc(html_root_url = "https://docs.rs/ariadne/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use ariadne_core as core;

// Re-export matching types
pub use ariadne_router as router;

// Re-export registry, dispatcher and transport
pub use ariadne_server as server;

// Re-export logging and metrics setup
pub use ariadne_telemetry as telemetry;

// Re-export configuration loading
pub use ariadne_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use ariadne::prelude::*;
///
/// let router: Router = Router::new();
/// assert!(router.is_empty());
/// ```
pub mod prelude {
    pub use ariadne_core::{
        BackwardResolver, HandlerError, HandlerResult, MatchContext, Outcome, Params, Request,
        RequestId, Resolver, Response, RouteRequest, RouteResponse,
    };

    pub use ariadne_router::{MethodFilter, PathMatcher};

    pub use ariadne_server::{
        DispatchError, DispatchReport, HttpAdapter, Router, Server, ServerBuilder, ServerConfig,
        ShutdownSignal,
    };

    pub use ariadne_telemetry::{init_telemetry, TelemetryConfig};

    pub use ariadne_config::{AriadneConfig, ConfigLoader};
}
