//! Bridge between hyper and the dispatcher.
//!
//! [`HttpAdapter`] collects an `http::Request<B>` into a core [`Request`],
//! dispatches it against a shared [`Router`] and turns the resulting
//! [`Response`] back into an `http::Response`. It adds no routing of its own.
//!
//! # Example
//!
//! ```rust
//! use ariadne_core::Outcome;
//! use ariadne_server::{HttpAdapter, Router};
//! use bytes::Bytes;
//! use http::StatusCode;
//! use http_body_util::Full;
//!
//! # tokio_test::block_on(async {
//! let mut router: Router = Router::new();
//! router.static_get("/", |_req, res, _ctx| async move {
//!     res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
//!     Ok(Outcome::Done)
//! });
//!
//! let adapter = HttpAdapter::new(router);
//! let request = http::Request::get("/").body(Full::new(Bytes::new())).unwrap();
//! let response = adapter.handle(request).await;
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! # });
//! ```

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::ext::ReasonPhrase;
use hyper::service::{service_fn, Service};

use ariadne_core::{Request, Response, ResponseSnapshot};
use ariadne_telemetry::metrics::{record_timeout, InFlightGuard};

use crate::registry::Router;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = http::Response<ResponseBody>;

/// Runs a [`Router`] behind hyper's request/response types.
///
/// Cloning is cheap; every clone shares the same router.
#[derive(Debug, Clone)]
pub struct HttpAdapter {
    router: Arc<Router>,
    request_timeout: Option<Duration>,
}

impl HttpAdapter {
    /// Wraps a fully registered router.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self::from_shared(Arc::new(router))
    }

    /// Wraps a router that is already shared.
    #[must_use]
    pub fn from_shared(router: Arc<Router>) -> Self {
        Self {
            router,
            request_timeout: None,
        }
    }

    /// Limits how long a single dispatch may take.
    ///
    /// A dispatch still running when the limit is hit is dropped and the
    /// client gets `504 Gateway Timeout`.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the configured dispatch timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Handles one request.
    ///
    /// Never fails: resolver failures were already turned into a status
    /// page by the dispatcher and are logged here. A body that cannot be
    /// read is answered with `400 Bad Request`.
    pub async fn handle<B>(&self, request: http::Request<B>) -> HttpResponse
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Display,
    {
        let _in_flight = InFlightGuard::new();

        let (parts, body) = request.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to collect request body");
                return status_page(StatusCode::BAD_REQUEST);
            }
        };

        // The target keeps the query string, as received.
        let target = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path(), |pq| pq.as_str())
            .to_string();

        let request = Request::from_parts(parts.method, target, parts.version, parts.headers, body);
        let response = Response::new();

        let dispatch = self.dispatch(request, response.clone());
        match self.request_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, dispatch).await.is_err() {
                    tracing::warn!(timeout = ?limit, "Request timed out");
                    record_timeout();
                    return status_page(StatusCode::GATEWAY_TIMEOUT);
                }
            }
            None => dispatch.await,
        }

        into_http_response(response.snapshot())
    }

    async fn dispatch(&self, request: Request, response: Response) {
        if let Err(e) = self.router.dispatch(request, response).await {
            tracing::error!(request_id = %e.request_id(), error = %e, "Request failed");
        }
    }

    /// Returns a hyper service calling [`handle`](Self::handle).
    pub fn service<B>(
        &self,
    ) -> impl Service<
        http::Request<B>,
        Response = HttpResponse,
        Error = Infallible,
        Future = impl Future<Output = Result<HttpResponse, Infallible>> + Send,
    > + Clone
    where
        B: Body + Send + 'static,
        B::Data: Send,
        B::Error: Display,
    {
        let adapter = self.clone();
        service_fn(move |request: http::Request<B>| {
            let adapter = adapter.clone();
            async move { Ok::<_, Infallible>(adapter.handle(request).await) }
        })
    }
}

/// Converts a dispatched response into the wire response.
fn into_http_response(snapshot: ResponseSnapshot) -> HttpResponse {
    let ResponseSnapshot {
        status,
        reason,
        headers,
        body,
        ..
    } = snapshot;

    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    if let Some(reason) = reason.filter(|r| Some(r.as_str()) != status.canonical_reason()) {
        match ReasonPhrase::try_from(reason.into_bytes()) {
            Ok(phrase) => {
                response.extensions_mut().insert(phrase);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping invalid reason phrase"),
        }
    }

    response
}

/// Builds a plain-text page for a transport-level failure.
fn status_page(status: StatusCode) -> HttpResponse {
    let reason = status.canonical_reason().unwrap_or_default();
    let mut response = http::Response::new(Full::new(Bytes::from_static(reason.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::{HandlerError, Outcome, RouteRequest, RouteResponse};
    use http::HeaderMap;
    use http_body_util::StreamBody;

    fn get(uri: &str) -> http::Request<Full<Bytes>> {
        http::Request::get(uri).body(Full::new(Bytes::new())).unwrap()
    }

    async fn text(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn hello_router() -> Router {
        let mut router: Router = Router::new();
        router
            .static_get("/", |_req, res, _ctx| async move {
                res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
                Ok(Outcome::Done)
            })
            .dynamic_get("/hello/:name", |_req, res, ctx| async move {
                let name = ctx.param("name").unwrap_or_default().to_string();
                res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
                Ok(Outcome::Done)
            });
        router
    }

    #[tokio::test]
    async fn test_handle_static_route() {
        let adapter = HttpAdapter::new(hello_router());
        let response = adapter.handle(get("/")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(text(response).await, "Hello, World!");
    }

    #[tokio::test]
    async fn test_handle_dynamic_route() {
        let adapter = HttpAdapter::new(hello_router());
        let response = adapter.handle(get("/hello/John")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "Hello, John!");
    }

    #[tokio::test]
    async fn test_handle_fallback() {
        let adapter = HttpAdapter::new(hello_router());
        let response = adapter.handle(get("/not-found/")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        // Canonical reason, so no extension is needed.
        assert!(response.extensions().get::<ReasonPhrase>().is_none());
        assert_eq!(text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_target_keeps_query() {
        let mut router: Router = Router::new();
        router.static_all("*", |req: Request, res: Response, _ctx| async move {
            let echo = format!("{} {} {:?}", req.method(), req.target(), req.query());
            res.send(StatusCode::OK, "text/plain", echo)?;
            Ok(Outcome::Done)
        });

        let adapter = HttpAdapter::new(router);
        let response = adapter.handle(get("/search?q=rust")).await;

        assert_eq!(text(response).await, r#"GET /search?q=rust Some("q=rust")"#);
    }

    #[tokio::test]
    async fn test_request_body_is_collected() {
        let mut router: Router = Router::new();
        router.static_post("/echo", |req: Request, res: Response, _ctx| async move {
            res.send(StatusCode::OK, "application/octet-stream", req.body().clone())?;
            Ok(Outcome::Done)
        });

        let adapter = HttpAdapter::new(router);
        let request = http::Request::post("/echo")
            .body(Full::new(Bytes::from_static(b"ping")))
            .unwrap();
        let response = adapter.handle(request).await;

        assert_eq!(text(response).await, "ping");
    }

    #[tokio::test]
    async fn test_unreadable_body_is_bad_request() {
        let adapter = HttpAdapter::new(hello_router());
        let chunks: Vec<Result<hyper::body::Frame<Bytes>, std::io::Error>> = vec![Err(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"),
        )];
        let body = StreamBody::new(futures_util::stream::iter(chunks));
        let request = http::Request::get("/").body(body).unwrap();

        let response = adapter.handle(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_custom_reason_phrase() {
        let mut router: Router = Router::new();
        router.static_get("/teapot", |_req, res: Response, _ctx| async move {
            res.write_head(StatusCode::IM_A_TEAPOT, Some("Short And Stout"), HeaderMap::new())?;
            res.end()?;
            Ok(Outcome::Done)
        });

        let adapter = HttpAdapter::new(router);
        let response = adapter.handle(get("/teapot")).await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let phrase = response.extensions().get::<ReasonPhrase>().unwrap();
        assert_eq!(phrase.as_bytes(), b"Short And Stout");
    }

    #[tokio::test]
    async fn test_failure_becomes_status_page() {
        let mut router: Router = Router::new();
        router.static_get("/", |_req, _res, _ctx| async {
            Err(HandlerError::message("no database"))
        });

        let adapter = HttpAdapter::new(router);
        let response = adapter.handle(get("/")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mut router: Router = Router::new();
        router.static_get("/slow", |_req, _res, _ctx| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Outcome::Done)
        });

        let adapter =
            HttpAdapter::new(router).with_request_timeout(Some(Duration::from_millis(20)));
        let response = adapter.handle(get("/slow")).await;

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(text(response).await, "Gateway Timeout");
    }

    #[tokio::test]
    async fn test_service_calls_handle() {
        let adapter = HttpAdapter::new(hello_router());
        let service = adapter.service::<Full<Bytes>>();

        let response = service.call(get("/hello/Ada")).await.unwrap();
        assert_eq!(text(response).await, "Hello, Ada!");

        let response = service.clone().call(get("/")).await.unwrap();
        assert_eq!(text(response).await, "Hello, World!");
    }
}
