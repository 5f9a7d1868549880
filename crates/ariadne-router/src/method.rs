//! HTTP method filtering.
//!
//! A route accepts either one method or every method. The wildcard is spelled
//! `*` at registration time.

use std::fmt;
use std::str::FromStr;

use http::Method;

/// The wildcard token accepted for both methods and paths.
pub const WILDCARD: &str = "*";

/// Which request methods a route accepts.
///
/// # Example
///
/// ```rust
/// use ariadne_router::MethodFilter;
/// use http::Method;
///
/// let any: MethodFilter = "*".parse().unwrap();
/// assert!(any.matches(&Method::DELETE));
///
/// let get = MethodFilter::GET;
/// assert!(get.matches(&Method::GET));
/// assert!(!get.matches(&Method::POST));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Accepts every method.
    Any,
    /// Accepts exactly one method.
    Only(Method),
}

impl MethodFilter {
    /// Accepts `GET` only.
    pub const GET: Self = Self::Only(Method::GET);
    /// Accepts `POST` only.
    pub const POST: Self = Self::Only(Method::POST);
    /// Accepts `PUT` only.
    pub const PUT: Self = Self::Only(Method::PUT);
    /// Accepts `DELETE` only.
    pub const DELETE: Self = Self::Only(Method::DELETE);
    /// Accepts `PATCH` only.
    pub const PATCH: Self = Self::Only(Method::PATCH);
    /// Accepts `HEAD` only.
    pub const HEAD: Self = Self::Only(Method::HEAD);
    /// Accepts `OPTIONS` only.
    pub const OPTIONS: Self = Self::Only(Method::OPTIONS);

    /// Returns true if a request with `method` passes this filter.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(expected) => expected == method,
        }
    }

    /// Returns true for the wildcard filter.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl From<&Method> for MethodFilter {
    fn from(method: &Method) -> Self {
        Self::Only(method.clone())
    }
}

/// Error returned when a method token is not a valid HTTP method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMethod(String);

impl InvalidMethod {
    /// Returns the rejected token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvalidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HTTP method: {:?}", self.0)
    }
}

impl std::error::Error for InvalidMethod {}

impl FromStr for MethodFilter {
    type Err = InvalidMethod;

    /// Parses `*` or a method token.
    ///
    /// Tokens are case sensitive, so `get` is an extension method distinct
    /// from `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WILDCARD {
            return Ok(Self::Any);
        }
        Method::from_bytes(s.as_bytes())
            .map(Self::Only)
            .map_err(|_| InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Only(method) => f.write_str(method.as_str()),
        }
    }
}
