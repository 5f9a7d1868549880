//! Route match predicates.
//!
//! A [`RouteMatcher`] combines a [`MethodFilter`] with a [`PathMatcher`]. It
//! is built once at registration time and evaluated against every request
//! in registration order.

use std::fmt;

use http::Method;

use crate::method::{MethodFilter, WILDCARD};
use crate::params::Params;
use crate::path::normalize;
use crate::pattern::Pattern;

/// How a route selects request paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Matches every path.
    Any,
    /// Matches one normalized path by exact string equality.
    Static(String),
    /// Matches a compiled pattern and binds its parameters.
    Dynamic(Pattern),
}

impl PathMatcher {
    /// Builds a static matcher, normalizing `path` once.
    ///
    /// `*` yields [`PathMatcher::Any`].
    #[must_use]
    pub fn static_path(path: &str) -> Self {
        if path == WILDCARD {
            Self::Any
        } else {
            Self::Static(normalize(path))
        }
    }

    /// Builds a dynamic matcher by compiling `pattern`.
    ///
    /// `*` yields [`PathMatcher::Any`].
    #[must_use]
    pub fn dynamic(pattern: &str) -> Self {
        if pattern == WILDCARD {
            Self::Any
        } else {
            Self::Dynamic(Pattern::compile(pattern))
        }
    }

    /// Builds a matcher, choosing dynamic when any segment is a `:name`
    /// placeholder and static otherwise.
    ///
    /// ```rust
    /// use ariadne_router::PathMatcher;
    ///
    /// assert!(matches!(PathMatcher::parse("*"), PathMatcher::Any));
    /// assert!(matches!(PathMatcher::parse("/hello"), PathMatcher::Static(_)));
    /// assert!(matches!(PathMatcher::parse("/hello/:name"), PathMatcher::Dynamic(_)));
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if Pattern::has_params(path) {
            Self::dynamic(path)
        } else {
            Self::static_path(path)
        }
    }

    /// Tests a normalized request target.
    ///
    /// Static matchers compare the whole target, query string included.
    /// Dynamic matchers ignore the query string and return the bindings.
    #[must_use]
    pub fn matches(&self, target: &str) -> Option<Params> {
        match self {
            Self::Any => Some(Params::new()),
            Self::Static(path) => (path == target).then(Params::new),
            Self::Dynamic(pattern) => pattern.matches(target),
        }
    }

    /// Returns the path as registered (normalized for static matchers).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => WILDCARD,
            Self::Static(path) => path,
            Self::Dynamic(pattern) => pattern.as_str(),
        }
    }

    /// Returns true for dynamic matchers.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full predicate of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    method: MethodFilter,
    path: PathMatcher,
}

impl RouteMatcher {
    /// Creates a matcher from its two halves.
    #[must_use]
    pub fn new(method: MethodFilter, path: PathMatcher) -> Self {
        Self { method, path }
    }

    /// Evaluates the route against a request.
    ///
    /// `target` must already be normalized. The method is checked first so
    /// the path is never inspected for a request of the wrong method.
    #[must_use]
    pub fn matches(&self, method: &Method, target: &str) -> Option<Params> {
        if !self.method.matches(method) {
            return None;
        }
        self.path.matches(target)
    }

    /// Returns the method filter.
    #[must_use]
    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    /// Returns the path matcher.
    #[must_use]
    pub fn path(&self) -> &PathMatcher {
        &self.path
    }
}

impl fmt::Display for RouteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
