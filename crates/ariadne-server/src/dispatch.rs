//! The two-phase dispatcher.
//!
//! For every request the dispatcher walks the whole registry in order. Each
//! route whose matcher accepts the request has its forward resolver awaited
//! before the next route is evaluated; backward resolvers handed back through
//! [`Outcome::Defer`] are stacked and unwound once the forward pass is over.
//! If nothing finalized the response by then, a plain-text `404 Not Found`
//! is written.
//!
//! ```text
//!   route 0 ──▶ A ─┐ defer bA
//!   route 1    (no match)
//!   route 2 ──▶ B ─┤ defer bB
//!                  ▼
//!              bB ──▶ bA ──▶ finalized? ──no──▶ 404
//! ```
//!
//! A resolver that fails or panics stops the forward pass. The backward
//! resolvers collected so far still run, and the response, unless already
//! finalized, becomes the error's status page (`500` unless the error
//! carries its own status).

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::FutureExt;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use thiserror::Error;
use tracing::Instrument;

use ariadne_core::{
    BackwardResolver, BoxFuture, HandlerError, MatchContext, Outcome, RequestId, ResponseError,
    RouteRequest, RouteResponse,
};
use ariadne_router::normalize;
use ariadne_telemetry::metrics::{record_dispatch, DispatchOutcome};

use crate::registry::Router;

const TEXT_PLAIN: &str = "text/plain";

/// Summary of a dispatch that completed without resolver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Id shared by every resolver of the request.
    pub request_id: RequestId,
    /// Number of routes whose matcher accepted the request.
    pub matched: usize,
    /// Number of backward resolvers that ran.
    pub deferred: usize,
    /// Whether the `404` fallback page was written. A response whose head a
    /// resolver already wrote is only ended, and does not count.
    pub fallback: bool,
}

/// A resolver failure, scoped to the request it happened in.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A forward resolver failed; later routes were not evaluated.
    #[error("forward resolver of route #{index} ({path}) failed: {source}")]
    Forward {
        /// Request the failure belongs to.
        request_id: RequestId,
        /// Registration index of the route.
        index: usize,
        /// Path or pattern of the route.
        path: String,
        /// The resolver's error.
        source: HandlerError,
    },

    /// A backward resolver failed.
    #[error("backward resolver of route #{index} ({path}) failed: {source}")]
    Backward {
        /// Request the failure belongs to.
        request_id: RequestId,
        /// Registration index of the route that deferred it.
        index: usize,
        /// Path or pattern of that route.
        path: String,
        /// The resolver's error.
        source: HandlerError,
    },
}

impl DispatchError {
    /// Returns the id of the failed request.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Forward { request_id, .. } | Self::Backward { request_id, .. } => *request_id,
        }
    }

    /// Returns the registration index of the failing route.
    #[must_use]
    pub fn route_index(&self) -> usize {
        match self {
            Self::Forward { index, .. } | Self::Backward { index, .. } => *index,
        }
    }

    /// Returns the path or pattern of the failing route.
    #[must_use]
    pub fn route_path(&self) -> &str {
        match self {
            Self::Forward { path, .. } | Self::Backward { path, .. } => path,
        }
    }

    /// Returns the resolver's error.
    #[must_use]
    pub fn handler_error(&self) -> &HandlerError {
        match self {
            Self::Forward { source, .. } | Self::Backward { source, .. } => source,
        }
    }

    /// Returns the status written for this failure when the response was
    /// still open.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.handler_error().status_code()
    }
}

impl<Req, Res> Router<Req, Res>
where
    Req: RouteRequest + Clone + Send + Sync + 'static,
    Res: RouteResponse + Clone + Send + Sync + 'static,
{
    /// Dispatches one request.
    ///
    /// Every matching route's forward resolver is awaited in registration
    /// order, then the deferred backward resolvers in reverse. The response
    /// always ends up finalized: by a resolver, by the `404` fallback or by
    /// an error status page.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if a forward or backward resolver failed or
    /// panicked. The first failure is reported; later backward failures are
    /// only logged.
    pub async fn dispatch(&self, request: Req, response: Res) -> Result<DispatchReport, DispatchError> {
        let request_id = RequestId::new();
        let target = normalize(request.target());
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request_id,
            method = %request.method(),
            target = %target,
        );

        self.run(request_id, &target, request, response)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request_id: RequestId,
        target: &str,
        request: Req,
        response: Res,
    ) -> Result<DispatchReport, DispatchError> {
        let started = Instant::now();
        let method = request.method().clone();

        let mut pending: Vec<(usize, BackwardResolver<Req, Res>)> = Vec::new();
        let mut matched = 0;
        let mut failure = None;

        for (index, route) in self.routes().iter().enumerate() {
            let Some(params) = route.matcher().matches(&method, target) else {
                continue;
            };
            matched += 1;
            tracing::debug!(index, route = %route.matcher(), "route matched");

            let ctx = MatchContext::new(request_id, index, route.path(), params);
            let forward = route.resolver().invoke(request.clone(), response.clone(), ctx);

            match guarded(forward).await {
                Ok(Outcome::Done) => {}
                Ok(Outcome::Defer(backward)) => pending.push((index, backward)),
                Err(source) => {
                    tracing::error!(
                        index,
                        route = %route.matcher(),
                        error = %source,
                        "forward resolver failed"
                    );
                    failure = Some(DispatchError::Forward {
                        request_id,
                        index,
                        path: route.path().to_string(),
                        source,
                    });
                    break;
                }
            }
        }

        let deferred = pending.len();
        while let Some((index, backward)) = pending.pop() {
            let Err(source) = guarded(backward.invoke(request.clone(), response.clone())).await
            else {
                continue;
            };
            let path = self.routes()[index].path().to_string();
            tracing::error!(index, route = %path, error = %source, "backward resolver failed");
            if failure.is_none() {
                failure = Some(DispatchError::Backward {
                    request_id,
                    index,
                    path,
                    source,
                });
            }
        }

        let mut page_written = false;
        if !response.is_finalized() {
            let status = failure
                .as_ref()
                .map_or(StatusCode::NOT_FOUND, DispatchError::status_code);
            tracing::debug!(status = status.as_u16(), "response not finalized, writing status page");
            page_written = write_status_page(&response, status);
        }

        let outcome = match (&failure, page_written) {
            (Some(_), _) => DispatchOutcome::Failed,
            (None, true) => DispatchOutcome::Fallback,
            (None, false) => DispatchOutcome::Handled,
        };
        record_dispatch(outcome, matched, started.elapsed());
        tracing::debug!(matched, deferred, outcome = %outcome, "dispatch complete");

        match failure {
            Some(err) => Err(err),
            None => Ok(DispatchReport {
                request_id,
                matched,
                deferred,
                fallback: page_written,
            }),
        }
    }
}

/// Awaits a resolver future, turning a panic into [`HandlerError::Panicked`].
async fn guarded<T>(future: BoxFuture<'static, Result<T, HandlerError>>) -> Result<T, HandlerError> {
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload.as_ref())))
}

/// Writes `status` with its canonical reason as a plain-text page and ends
/// the response.
///
/// If a resolver already wrote the head, whatever it wrote is kept and the
/// response is only ended. Returns whether the page itself was written.
fn write_status_page<Res: RouteResponse>(response: &Res, status: StatusCode) -> bool {
    let reason = status.canonical_reason().unwrap_or_default();

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));

    let (written, result) = match response.write_head(status, Some(reason), headers) {
        Ok(()) => (
            true,
            response
                .write(reason.as_bytes())
                .and_then(|()| response.end()),
        ),
        Err(ResponseError::HeadAlreadyWritten) => {
            tracing::warn!(
                status = status.as_u16(),
                "response head already written, ending response as is"
            );
            (false, response.end())
        }
        Err(e) => (false, Err(e)),
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to write status page");
    }
    written
}
