//! Response capability and handle.
//!
//! The dispatcher drives a response through four operations only: write the
//! head, write body chunks, end it, and ask whether it has been ended. The
//! [`Response`] handle implements them over shared state so that every
//! resolver of a request, forward and backward, writes to the same response.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use parking_lot::Mutex;

use crate::error::ResponseError;

/// What the dispatcher needs from a response.
pub trait RouteResponse {
    /// Emits the status line and headers.
    ///
    /// `reason` overrides the canonical reason phrase for `status`. A header
    /// named in `headers` replaces any value set for that name earlier.
    fn write_head(
        &self,
        status: StatusCode,
        reason: Option<&str>,
        headers: HeaderMap,
    ) -> Result<(), ResponseError>;

    /// Appends a body chunk, emitting the head implicitly if needed.
    fn write(&self, chunk: &[u8]) -> Result<(), ResponseError>;

    /// Finalizes the response.
    fn end(&self) -> Result<(), ResponseError>;

    /// Returns true once the response has been ended.
    fn is_finalized(&self) -> bool;
}

#[derive(Debug)]
struct State {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    head_written: bool,
    body: BytesMut,
    finalized: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: HeaderMap::new(),
            head_written: false,
            body: BytesMut::new(),
            finalized: false,
        }
    }
}

impl State {
    fn check_open(&self) -> Result<(), ResponseError> {
        if self.finalized {
            Err(ResponseError::Finalized)
        } else {
            Ok(())
        }
    }

    fn check_head_pending(&self) -> Result<(), ResponseError> {
        self.check_open()?;
        if self.head_written {
            Err(ResponseError::HeadAlreadyWritten)
        } else {
            Ok(())
        }
    }
}

/// A point-in-time copy of a response, used by transports to build the wire
/// response once dispatch is over.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    /// Status code.
    pub status: StatusCode,
    /// Custom reason phrase, if one was written.
    pub reason: Option<String>,
    /// Response headers.
    pub headers: HeaderMap,
    /// Everything written so far.
    pub body: Bytes,
    /// Whether the response was ended.
    pub finalized: bool,
}

/// A cloneable response handle that buffers what resolvers write.
///
/// Status and headers may be adjusted freely until the head is written,
/// either explicitly with [`write_head`](RouteResponse::write_head) or
/// implicitly by the first [`write`](RouteResponse::write). After
/// [`end`](RouteResponse::end) every write is rejected.
///
/// # Example
///
/// ```
/// use ariadne_core::{Response, RouteResponse};
/// use http::StatusCode;
///
/// let res = Response::new();
/// res.send(StatusCode::OK, "text/plain", "Hello, World!").unwrap();
///
/// assert!(res.is_finalized());
/// assert_eq!(res.snapshot().body.as_ref(), b"Hello, World!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Response {
    state: Arc<Mutex<State>>,
}

impl Response {
    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.state.lock().status
    }

    /// Sets the status ahead of the head being written.
    pub fn set_status(&self, status: StatusCode) -> Result<(), ResponseError> {
        let mut state = self.state.lock();
        state.check_head_pending()?;
        state.status = status;
        Ok(())
    }

    /// Sets a header ahead of the head being written, replacing any previous
    /// value.
    pub fn set_header(&self, name: HeaderName, value: HeaderValue) -> Result<(), ResponseError> {
        let mut state = self.state.lock();
        state.check_head_pending()?;
        state.headers.insert(name, value);
        Ok(())
    }

    /// Returns a copy of a header value.
    #[must_use]
    pub fn header(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.state.lock().headers.get(name).cloned()
    }

    /// Returns true once the head has been written.
    #[must_use]
    pub fn is_head_written(&self) -> bool {
        self.state.lock().head_written
    }

    /// Writes a final chunk and ends the response.
    pub fn end_with(&self, chunk: impl AsRef<[u8]>) -> Result<(), ResponseError> {
        self.write(chunk.as_ref())?;
        self.end()
    }

    /// Writes a complete response with a `Content-Type` header.
    ///
    /// An unparsable content type is left out rather than failing the write.
    pub fn send(
        &self,
        status: StatusCode,
        content_type: &str,
        body: impl AsRef<[u8]>,
    ) -> Result<(), ResponseError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        self.write_head(status, None, headers)?;
        self.end_with(body)
    }

    /// Copies the current state.
    #[must_use]
    pub fn snapshot(&self) -> ResponseSnapshot {
        let state = self.state.lock();
        ResponseSnapshot {
            status: state.status,
            reason: state.reason.clone(),
            headers: state.headers.clone(),
            body: Bytes::copy_from_slice(&state.body),
            finalized: state.finalized,
        }
    }
}

impl RouteResponse for Response {
    fn write_head(
        &self,
        status: StatusCode,
        reason: Option<&str>,
        headers: HeaderMap,
    ) -> Result<(), ResponseError> {
        let mut state = self.state.lock();
        state.check_head_pending()?;
        state.status = status;
        state.reason = reason.map(str::to_string);
        for name in headers.keys() {
            state.headers.remove(name);
        }
        for (name, value) in &headers {
            state.headers.append(name, value.clone());
        }
        state.head_written = true;
        Ok(())
    }

    fn write(&self, chunk: &[u8]) -> Result<(), ResponseError> {
        let mut state = self.state.lock();
        state.check_open()?;
        state.head_written = true;
        state.body.extend_from_slice(chunk);
        Ok(())
    }

    fn end(&self) -> Result<(), ResponseError> {
        let mut state = self.state.lock();
        state.check_open()?;
        state.head_written = true;
        state.finalized = true;
        Ok(())
    }

    fn is_finalized(&self) -> bool {
        self.state.lock().finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response_defaults() {
        let res = Response::new();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.is_head_written());
        assert!(!res.is_finalized());
    }

    #[test]
    fn test_send() {
        let res = Response::new();
        res.send(StatusCode::CREATED, "text/plain", "done").unwrap();

        let snap = res.snapshot();
        assert_eq!(snap.status, StatusCode::CREATED);
        assert_eq!(snap.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(snap.body.as_ref(), b"done");
        assert!(snap.finalized);
    }

    #[test]
    fn test_send_replaces_content_type() {
        let res = Response::new();
        res.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .unwrap();
        res.set_header(
            HeaderName::from_static("x-trace"),
            HeaderValue::from_static("abc"),
        )
        .unwrap();
        res.send(StatusCode::OK, "text/plain", "plain").unwrap();

        let snap = res.snapshot();
        let types: Vec<_> = snap.headers.get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(types, vec!["text/plain"]);
        assert_eq!(snap.headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_write_head_keeps_repeated_values() {
        let res = Response::new();
        let mut headers = HeaderMap::new();
        headers.append(http::header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(http::header::SET_COOKIE, HeaderValue::from_static("b=2"));
        res.write_head(StatusCode::OK, None, headers).unwrap();

        assert_eq!(
            res.snapshot()
                .headers
                .get_all(http::header::SET_COOKIE)
                .iter()
                .count(),
            2
        );
    }

    #[test]
    fn test_write_head_with_reason() {
        let res = Response::new();
        res.write_head(StatusCode::NOT_FOUND, Some("Nope"), HeaderMap::new())
            .unwrap();
        assert_eq!(res.snapshot().reason.as_deref(), Some("Nope"));
        assert!(res.is_head_written());
        assert!(!res.is_finalized());
    }

    #[test]
    fn test_write_head_twice_is_rejected() {
        let res = Response::new();
        res.write_head(StatusCode::OK, None, HeaderMap::new()).unwrap();
        assert_eq!(
            res.write_head(StatusCode::OK, None, HeaderMap::new()),
            Err(ResponseError::HeadAlreadyWritten)
        );
    }

    #[test]
    fn test_write_emits_head_implicitly() {
        let res = Response::new();
        res.write(b"chunk").unwrap();
        assert!(res.is_head_written());
        assert_eq!(
            res.set_status(StatusCode::ACCEPTED),
            Err(ResponseError::HeadAlreadyWritten)
        );
    }

    #[test]
    fn test_chunks_accumulate() {
        let res = Response::new();
        res.write(b"Hello, ").unwrap();
        res.write(b"World").unwrap();
        res.end_with("!").unwrap();
        assert_eq!(res.snapshot().body.as_ref(), b"Hello, World!");
    }

    #[test]
    fn test_writes_after_end_are_rejected() {
        let res = Response::new();
        res.end().unwrap();
        assert_eq!(res.write(b"late"), Err(ResponseError::Finalized));
        assert_eq!(res.end(), Err(ResponseError::Finalized));
        assert_eq!(
            res.write_head(StatusCode::OK, None, HeaderMap::new()),
            Err(ResponseError::Finalized)
        );
    }

    #[test]
    fn test_set_header_before_head() {
        let res = Response::new();
        res.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .unwrap();
        res.write_head(StatusCode::OK, None, HeaderMap::new()).unwrap();
        assert_eq!(res.header(&CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_clones_share_state() {
        let res = Response::new();
        let other = res.clone();
        other.send(StatusCode::OK, "text/plain", "shared").unwrap();
        assert!(res.is_finalized());
        assert_eq!(res.snapshot().body.as_ref(), b"shared");
    }

    #[tokio::test]
    async fn test_handle_moves_across_tasks() {
        let res = Response::new();
        let task_res = res.clone();
        tokio::spawn(async move { task_res.end_with("from task") })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(res.snapshot().body.as_ref(), b"from task");
    }
}
