//! # Ariadne Test
//!
//! In-memory testing for Ariadne routers: requests go through the same
//! adapter and dispatcher as network traffic, without binding a port.
//!
//! ## Example
//!
//! ```
//! use ariadne_core::Outcome;
//! use ariadne_server::Router;
//! use ariadne_test::TestClient;
//! use http::StatusCode;
//!
//! # tokio_test::block_on(async {
//! let mut router: Router = Router::new();
//! router.static_get("/", |_req, res, _ctx| async move {
//!     res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
//!     Ok(Outcome::Done)
//! });
//!
//! let client = TestClient::new(router);
//!
//! client.get("/").send().await.assert_text("Hello, World!");
//! client
//!     .get("/not-found/")
//!     .send()
//!     .await
//!     .assert_status(StatusCode::NOT_FOUND)
//!     .assert_text("Not Found");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/ariadne-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use response::TestResponse;
