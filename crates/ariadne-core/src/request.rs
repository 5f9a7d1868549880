//! Request capability and handle.

use std::sync::Arc;

use ariadne_router::path::strip_query;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Version};

/// What the dispatcher needs from a request.
///
/// The router only reads these two values and never mutates the request.
pub trait RouteRequest {
    /// Returns the request method.
    fn method(&self) -> &Method;

    /// Returns the request target as received: path plus optional query.
    fn target(&self) -> &str;
}

#[derive(Debug)]
struct Inner {
    method: Method,
    target: String,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

/// A cheaply cloneable, immutable request handle.
///
/// Every resolver invoked for a request receives its own clone; all clones
/// share the same underlying data.
///
/// # Example
///
/// ```
/// use ariadne_core::{Request, RouteRequest};
/// use http::Method;
///
/// let req = Request::new(Method::GET, "/hello/John?lang=en");
/// assert_eq!(req.target(), "/hello/John?lang=en");
/// assert_eq!(req.path(), "/hello/John");
/// assert_eq!(req.query(), Some("lang=en"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    inner: Arc<Inner>,
}

impl Request {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self::from_parts(method, target, Version::HTTP_11, HeaderMap::new(), Bytes::new())
    }

    /// Creates a request from its parts.
    #[must_use]
    pub fn from_parts(
        method: Method,
        target: impl Into<String>,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                method,
                target: target.into(),
                version,
                headers,
                body,
            }),
        }
    }

    /// Returns the target without its query string or fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        strip_query(&self.inner.target)
    }

    /// Returns the query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        let target = self.inner.target.as_str();
        let without_fragment = target.find('#').map_or(target, |i| &target[..i]);
        without_fragment.split_once('?').map(|(_, query)| query)
    }

    /// Returns the HTTP version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.inner.version
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Returns a header value if it is present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }
}

impl RouteRequest for Request {
    fn method(&self) -> &Method {
        &self.inner.method
    }

    fn target(&self) -> &str {
        &self.inner.target
    }
}

// Builders for tests and transports that assemble requests field by field.
impl Request {
    /// Returns a copy of this request with an extra header.
    #[must_use]
    pub fn with_header(self, name: HeaderName, value: HeaderValue) -> Self {
        let mut headers = self.inner.headers.clone();
        headers.append(name, value);
        Self::from_parts(
            self.inner.method.clone(),
            self.inner.target.clone(),
            self.inner.version,
            headers,
            self.inner.body.clone(),
        )
    }

    /// Returns a copy of this request with `body`.
    #[must_use]
    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        Self::from_parts(
            self.inner.method.clone(),
            self.inner.target.clone(),
            self.inner.version,
            self.inner.headers.clone(),
            body.into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_target_is_kept_verbatim() {
        let req = Request::new(Method::GET, "//hello//?x=1");
        assert_eq!(req.target(), "//hello//?x=1");
        assert_eq!(req.method(), &Method::GET);
    }

    #[test]
    fn test_path_and_query() {
        let req = Request::new(Method::GET, "/a/b?x=1&y=2#frag");
        assert_eq!(req.path(), "/a/b");
        assert_eq!(req.query(), Some("x=1&y=2"));
    }

    #[test]
    fn test_no_query() {
        let req = Request::new(Method::GET, "/a#frag");
        assert_eq!(req.path(), "/a");
        assert_eq!(req.query(), None);
    }

    #[test]
    fn test_empty_query() {
        let req = Request::new(Method::GET, "/a?");
        assert_eq!(req.query(), Some(""));
    }

    #[test]
    fn test_headers_and_body() {
        let req = Request::new(Method::POST, "/upload")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body("payload");

        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.body().as_ref(), b"payload");
        assert_eq!(req.version(), Version::HTTP_11);
    }

    #[test]
    fn test_clones_share_data() {
        let req = Request::new(Method::GET, "/");
        let clone = req.clone();
        assert!(Arc::ptr_eq(&req.inner, &clone.inner));
    }
}
