//! Error taxonomy and HTTP status classification.
//!
//! Every failure surfaced by the SDK is a [`DataCanvasError`]. Callers can
//! handle it broadly (it is one type) or narrowly (match on the variant or on
//! [`DataCanvasError::kind`]).
//!
//! | Status | Variant |
//! |--------|---------|
//! | 401 | `Authentication` |
//! | 403 | `Authorization` |
//! | 400, 422 | `Validation` |
//! | 404 | `NotFound` |
//! | 429 | `RateLimit` |
//! | 500-599 and anything else | `Server` |
//!
//! `Network` is never produced from a status: it covers connection failures,
//! timeouts and undecodable success bodies.

use serde_json::Value;
use std::fmt;

/// Payload shared by every error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// Human-readable description
    pub message: String,
    /// HTTP status of the response, if one was received
    pub http_status: Option<u16>,
    /// Raw response body, if one was received and non-empty
    pub raw_body: Option<String>,
}

impl ErrorDetails {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: None,
            raw_body: None,
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Discriminant of a [`DataCanvasError`], convenient for comparisons and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing credentials
    Authentication,
    /// Credentials lack permission
    Authorization,
    /// Request parameters rejected (locally or by the server)
    Validation,
    /// Resource does not exist
    NotFound,
    /// Too many requests
    RateLimit,
    /// Server-side or unexpected status
    Server,
    /// Connectivity failure or undecodable response
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authentication => "Authentication",
            Self::Authorization => "Authorization",
            Self::Validation => "Validation",
            Self::NotFound => "NotFound",
            Self::RateLimit => "RateLimit",
            Self::Server => "Server",
            Self::Network => "Network",
        };
        f.write_str(name)
    }
}

/// Errors returned by every SDK operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataCanvasError {
    /// HTTP 401
    #[error("authentication failed: {0}")]
    Authentication(ErrorDetails),
    /// HTTP 403
    #[error("authorization failed: {0}")]
    Authorization(ErrorDetails),
    /// HTTP 400/422, or rejected client-side before any request
    #[error("validation failed: {0}")]
    Validation(ErrorDetails),
    /// HTTP 404
    #[error("not found: {0}")]
    NotFound(ErrorDetails),
    /// HTTP 429
    #[error("rate limit exceeded: {0}")]
    RateLimit(ErrorDetails),
    /// HTTP 5xx or any other unexpected status
    #[error("server error: {0}")]
    Server(ErrorDetails),
    /// Connection, timeout, TLS or response decoding failure
    #[error("network error: {0}")]
    Network(ErrorDetails),
}

impl DataCanvasError {
    /// Client-side validation failure; no request was made.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ErrorDetails::new(message))
    }

    /// Transport-level failure with no usable response.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(ErrorDetails::new(message))
    }

    /// A 2xx response whose body could not be decoded.
    #[must_use]
    pub fn undecodable(status: u16, body: &str, reason: impl fmt::Display) -> Self {
        Self::Network(ErrorDetails {
            message: format!("failed to decode response body: {reason}"),
            http_status: Some(status),
            raw_body: non_empty(body),
        })
    }

    fn from_kind(kind: ErrorKind, details: ErrorDetails) -> Self {
        match kind {
            ErrorKind::Authentication => Self::Authentication(details),
            ErrorKind::Authorization => Self::Authorization(details),
            ErrorKind::Validation => Self::Validation(details),
            ErrorKind::NotFound => Self::NotFound(details),
            ErrorKind::RateLimit => Self::RateLimit(details),
            ErrorKind::Server => Self::Server(details),
            ErrorKind::Network => Self::Network(details),
        }
    }

    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::Server(_) => ErrorKind::Server,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// Shared payload.
    #[must_use]
    pub fn details(&self) -> &ErrorDetails {
        match self {
            Self::Authentication(d)
            | Self::Authorization(d)
            | Self::Validation(d)
            | Self::NotFound(d)
            | Self::RateLimit(d)
            | Self::Server(d)
            | Self::Network(d) => d,
        }
    }

    /// Error message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.details().message
    }

    /// HTTP status, if a response was received.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        self.details().http_status
    }

    /// Raw response body, if a non-empty one was received.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        self.details().raw_body.as_deref()
    }

    /// Whether repeating the same call might succeed.
    ///
    /// Advisory only: the SDK itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit | ErrorKind::Server | ErrorKind::Network
        )
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Authorization,
        400 | 422 => ErrorKind::Validation,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        _ => ErrorKind::Server,
    }
}

fn non_empty(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Pull an error message out of a JSON error body.
///
/// Looks at `message`, `error`, `error.message` and `detail`, in that order.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    let text = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    text(obj.get("message"))
        .or_else(|| text(obj.get("error")))
        .or_else(|| text(value.pointer("/error/message")))
        .or_else(|| text(obj.get("detail")))
}

/// Map a non-success HTTP response to an error.
///
/// Pure and total: every status yields an error value. The message comes from
/// the body when it carries a recognizable field, otherwise it is synthesized
/// as `"<Kind>: HTTP <status>"`.
#[must_use]
pub fn classify(status: u16, body: Option<&str>) -> DataCanvasError {
    let kind = kind_for_status(status);
    let body = body.unwrap_or_default();

    let message =
        extract_message(body).unwrap_or_else(|| format!("{kind}: HTTP {status}"));

    DataCanvasError::from_kind(
        kind,
        ErrorDetails {
            message,
            http_status: Some(status),
            raw_body: non_empty(body),
        },
    )
}
