//! Error types for Ariadne.
//!
//! [`ResponseError`] reports misuse of a response handle (writing a head
//! twice, writing after the end). [`HandlerError`] is what resolvers return;
//! any variant stops the forward pass of the request it occurred in.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`HandlerError`].
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Misuse of a response handle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    /// The status line and headers were already emitted.
    #[error("response head already written")]
    HeadAlreadyWritten,

    /// The response was already ended.
    #[error("response already finalized")]
    Finalized,
}

/// Error returned by a forward or backward resolver.
///
/// # Example
///
/// ```
/// use ariadne_core::HandlerError;
/// use http::StatusCode;
///
/// let err = HandlerError::with_status(StatusCode::BAD_REQUEST, "missing name");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = HandlerError::message("database unavailable");
/// assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A write to the response handle was rejected.
    #[error("response error: {0}")]
    Response(#[from] ResponseError),

    /// A resolver reported a failure.
    #[error("{message}")]
    Message {
        /// Human-readable error message.
        message: String,
        /// Status the resolver asked for, if any.
        status: Option<StatusCode>,
    },

    /// Any other error, propagated with `?`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// The resolver panicked.
    #[error("resolver panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Creates an error with a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an error with a message and a status.
    #[must_use]
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Builds the error for a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }

    /// Returns the HTTP status this error maps to.
    ///
    /// Only [`HandlerError::Message`] can carry its own status; everything
    /// else is a server error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Message {
                status: Some(status),
                ..
            } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if the error came from a panic.
    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}
