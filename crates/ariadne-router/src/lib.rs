//! Ordered path matching for Ariadne.
//!
//! This crate holds the pure, transport-free half of the router: path
//! normalization, pattern compilation and the per-route match predicate. It
//! knows nothing about handlers; the server crate pairs each
//! [`RouteMatcher`] with a resolver and walks them in registration order.
//!
//! # Features
//!
//! - **Normalization**: separator runs collapse and a trailing `/` is dropped
//! - **Path Parameters**: `:name` segments bind one non-empty segment
//! - **Static Routes**: exact comparison against the normalized target
//! - **Wildcards**: `*` accepts every method or every path
//!
//! # Example
//!
//! ```rust
//! use ariadne_router::{normalize, MethodFilter, PathMatcher, RouteMatcher};
//! use http::Method;
//!
//! let route = RouteMatcher::new(MethodFilter::GET, PathMatcher::parse("/hello/:name"));
//!
//! let target = normalize("/hello//John/");
//! let params = route.matches(&Method::GET, &target).unwrap();
//! assert_eq!(params.get("name"), Some("John"));
//!
//! assert!(route.matches(&Method::POST, &target).is_none());
//! ```
//!
//! # Matching model
//!
//! ```text
//!   target ──normalize──▶ "/hello/John"
//!                              │
//!        ┌─────────────────────┼──────────────────────┐
//!        ▼                     ▼                      ▼
//!   Static("/hello")   Dynamic("/hello/:name")       Any
//!     no match          {name: "John"}             match
//! ```

mod matcher;
mod method;
mod params;
pub mod path;
mod pattern;

pub use matcher::{PathMatcher, RouteMatcher};
pub use method::{InvalidMethod, MethodFilter, WILDCARD};
pub use params::Params;
pub use path::normalize;
pub use pattern::{Pattern, PARAM_PREFIX};
