//! Test client for in-memory HTTP testing.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use http_body_util::Full;

use ariadne_server::{HttpAdapter, Router};

use crate::error::TestError;
use crate::response::TestResponse;

/// A test client that runs requests through a router without binding a
/// port.
///
/// Requests travel the same path as requests from the network: the
/// adapter collects them into core requests, the router dispatches them
/// and the response is read back with any custom reason phrase intact.
///
/// # Example
///
/// ```
/// use ariadne_core::Outcome;
/// use ariadne_server::Router;
/// use ariadne_test::TestClient;
/// use http::StatusCode;
///
/// # tokio_test::block_on(async {
/// let mut router: Router = Router::new();
/// router.dynamic_get("/hello/:name", |_req, res, ctx| async move {
///     let name = ctx.param("name").unwrap_or("World").to_string();
///     res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
///     Ok(Outcome::Done)
/// });
///
/// let client = TestClient::new(router);
/// client
///     .get("/hello/John")
///     .send()
///     .await
///     .assert_status(StatusCode::OK)
///     .assert_text("Hello, John!");
/// # });
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    adapter: HttpAdapter,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a test client for a fully registered router.
    pub fn new(router: Router) -> Self {
        Self::from_adapter(HttpAdapter::new(router))
    }

    /// Creates a test client for an existing adapter, keeping its request
    /// timeout.
    pub fn from_adapter(adapter: HttpAdapter) -> Self {
        Self {
            adapter,
            default_headers: Vec::new(),
        }
    }

    /// Adds a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the adapter requests are sent through.
    #[must_use]
    pub fn adapter(&self) -> &HttpAdapter {
        &self.adapter
    }

    /// Creates a GET request builder.
    pub fn get(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, target)
    }

    /// Creates a POST request builder.
    pub fn post(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, target)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, target)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, target)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, target)
    }

    /// Creates an OPTIONS request builder.
    pub fn options(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::OPTIONS, target)
    }

    /// Creates a HEAD request builder.
    pub fn head(&self, target: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::HEAD, target)
    }

    /// Creates a request builder with any method, including extension
    /// methods such as `PURGE`.
    pub fn request(&self, method: Method, target: impl AsRef<str>) -> TestClientRequest<'_> {
        let mut builder = http::Request::builder()
            .method(method)
            .uri(target.as_ref());
        for (name, value) in &self.default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        TestClientRequest {
            client: self,
            builder,
            body: Bytes::new(),
            error: None,
        }
    }
}

/// A request builder bound to a test client.
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: http::request::Builder,
    body: Bytes,
    error: Option<TestError>,
}

impl TestClientRequest<'_> {
    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name.as_ref(), value.as_ref());
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the request body and sets the JSON content
    /// type.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.body = Bytes::from(body);
                self.content_type("application/json")
            }
            Err(e) => {
                self.error = Some(e.into());
                self
            }
        }
    }

    /// Sends the request and returns the response.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built.
    pub async fn send(self) -> TestResponse {
        self.try_send().await.expect("valid request")
    }

    /// Sends the request and returns a Result.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let request = self.builder.body(Full::new(self.body))?;
        let response = self.client.adapter.handle(request).await;
        Ok(TestResponse::from_http(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ariadne_core::{HandlerError, Outcome, RouteRequest};
    use http::StatusCode;
    use serde_json::json;

    fn echo_router() -> Router {
        let mut router: Router = Router::new();
        router.static_all("*", |req, res, _ctx| async move {
            let body = json!({
                "method": req.method().as_str(),
                "target": req.target(),
                "custom": req.header("x-custom"),
                "content_type": req.header("content-type"),
                "body": String::from_utf8_lossy(req.body()),
            });
            res.send(StatusCode::OK, "application/json", body.to_string())?;
            Ok(Outcome::Done)
        });
        router
    }

    #[tokio::test]
    async fn test_echo_through_router() {
        let client = TestClient::new(echo_router());
        let response = client.get("/test/path?x=1").send().await;

        response
            .assert_status(StatusCode::OK)
            .assert_header("content-type", "application/json");
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["target"], "/test/path?x=1");
    }

    #[tokio::test]
    async fn test_all_methods() {
        let client = TestClient::new(echo_router());

        let cases = [
            (client.get("/"), "GET"),
            (client.post("/"), "POST"),
            (client.put("/"), "PUT"),
            (client.patch("/"), "PATCH"),
            (client.delete("/"), "DELETE"),
            (client.options("/"), "OPTIONS"),
            (client.head("/"), "HEAD"),
        ];
        for (request, method) in cases {
            let value: serde_json::Value = request.send().await.json().unwrap();
            assert_eq!(value["method"], method);
        }
    }

    #[tokio::test]
    async fn test_json_body() {
        let client = TestClient::new(echo_router());
        let response = client
            .post("/users")
            .json(&json!({"name": "Alice"}))
            .send()
            .await;

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["content_type"], "application/json");
        assert_eq!(value["body"], r#"{"name":"Alice"}"#);
    }

    #[tokio::test]
    async fn test_default_headers() {
        let client = TestClient::new(echo_router()).with_default_header("X-Custom", "default-value");
        let value: serde_json::Value = client.get("/").send().await.json().unwrap();
        assert_eq!(value["custom"], "default-value");
    }

    #[tokio::test]
    async fn test_fallback() {
        let client = TestClient::new(Router::new());
        client
            .get("/missing")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_reason("Not Found")
            .assert_text("Not Found");
    }

    #[tokio::test]
    async fn test_handler_error_status() {
        let mut router: Router = Router::new();
        router.static_post("/items", |_req, _res, _ctx| async move {
            Err::<Outcome, _>(HandlerError::with_status(StatusCode::BAD_REQUEST, "missing name"))
        });

        let client = TestClient::new(router);
        client
            .post("/items")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_text("Bad Request");
    }

    #[tokio::test]
    async fn test_from_shared_adapter() {
        let router = Arc::new(echo_router());
        let client = TestClient::from_adapter(HttpAdapter::from_shared(Arc::clone(&router)));
        assert_eq!(client.adapter().router().len(), 1);
        client.get("/").send().await.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_target() {
        let client = TestClient::new(Router::new());
        let result = client.get("not a target").try_send().await;
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }
}
