//! Test error types.

use thiserror::Error;

/// Errors that can occur while sending a test request or reading its
/// response.
#[derive(Error, Debug)]
pub enum TestError {
    /// The request could not be built (bad target, header or method).
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// The response body was not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<http::Error> for TestError {
    fn from(e: http::Error) -> Self {
        Self::RequestBuild(e.to_string())
    }
}
