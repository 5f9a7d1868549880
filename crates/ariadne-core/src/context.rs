//! Match context types.
//!
//! A [`MatchContext`] is created fresh for every route that matches a request
//! and handed to that route's resolver by value. Nothing in it is shared with
//! the next route except the [`RequestId`].

use std::fmt;

use ariadne_router::Params;
use http::Extensions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each dispatch, using UUID v7.
///
/// All resolvers invoked for one request observe the same id, which makes it
/// suitable for log correlation.
///
/// # Example
///
/// ```
/// use ariadne_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-invocation state handed to a resolver.
///
/// # Example
///
/// ```
/// use ariadne_core::{MatchContext, Params, RequestId};
///
/// let params: Params = [("name", "John")].into_iter().collect();
/// let ctx = MatchContext::new(RequestId::new(), 2, "/hello/:name", params);
///
/// assert_eq!(ctx.param("name"), Some("John"));
/// assert_eq!(ctx.route_index(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MatchContext {
    request_id: RequestId,
    route_index: usize,
    route_path: String,
    params: Params,
    extensions: Extensions,
}

impl MatchContext {
    /// Creates a context for the route at `route_index`.
    #[must_use]
    pub fn new(
        request_id: RequestId,
        route_index: usize,
        route_path: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            request_id,
            route_index,
            route_path: route_path.into(),
            params,
            extensions: Extensions::new(),
        }
    }

    /// Creates a context with a fresh request id and no parameters.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(RequestId::new(), 0, "*", Params::new())
    }

    /// Returns the id shared by every resolver of this dispatch.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the registration index of the matched route.
    #[must_use]
    pub const fn route_index(&self) -> usize {
        self.route_index
    }

    /// Returns the path or pattern the route was registered with.
    #[must_use]
    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    /// Returns the parameters bound by a dynamic route.
    ///
    /// Static and wildcard routes always see an empty set.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns one bound parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the typed extensions.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the typed extensions mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Returns a new context with `value` stored as an extension.
    #[must_use]
    pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }
}
