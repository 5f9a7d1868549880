//! # Ariadne Core
//!
//! Core types shared by the Ariadne router and its transports.
//!
//! - [`RouteRequest`] / [`RouteResponse`] - The capabilities dispatch needs
//! - [`Request`] / [`Response`] - Cloneable handles implementing them
//! - [`MatchContext`] - Per-invocation parameters, request id and extensions
//! - [`RequestId`] - UUID v7 dispatch identifier
//! - [`Resolver`], [`BackwardResolver`], [`Outcome`] - The two-phase handler protocol
//! - [`HandlerError`], [`ResponseError`] - Error types

#![doc(html_root_url = "https://docs.rs/ariadne-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod request;
mod resolver;
mod response;

pub use context::{MatchContext, RequestId};
pub use error::{HandlerError, HandlerResult, ResponseError};
pub use request::{Request, RouteRequest};
pub use resolver::{BackwardResolver, BoxFuture, Outcome, Resolver};
pub use response::{Response, ResponseSnapshot, RouteResponse};

/// Re-exported so resolvers can name parameters without depending on the
/// router crate directly.
pub use ariadne_router::Params;
