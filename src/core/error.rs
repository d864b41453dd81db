//! Gateway error currency.
//!
//! [`ApiError`] is the only failure type that crosses a layer boundary. Upstream
//! clients create it where a failure is detected, domain services may re-label
//! it, and protocol adapters render it into the `{ data, error }` envelope.
//! Layers above the upstream clients only ever look at [`ApiError::message`]
//! and [`ApiError::status`].
use http::StatusCode;
use thiserror::Error;

/// Status used whenever an error has no meaningful HTTP status of its own.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Classification of a gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Upstream unreachable: connection refused, timeout, DNS failure.
    Transport,
    /// Upstream answered with a body that does not match the expected shape.
    Decode,
    /// Upstream answered with a status >= 300.
    UpstreamRejected,
    /// Upstream answered successfully but the payload was empty or missing.
    NotFound,
    /// Caller input was malformed or incomplete.
    BadRequest,
    /// Missing/invalid API key or a rejected auth token.
    Unauthorized,
    /// Any other upstream failure without a more specific class.
    UpstreamFailure,
}

impl ErrorKind {
    /// Status an error of this kind carries when none is given explicitly.
    pub const fn default_status(self) -> u16 {
        match self {
            Self::Transport | Self::Decode => 500,
            Self::UpstreamRejected | Self::UpstreamFailure => 502,
            Self::NotFound => 404,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
        }
    }
}

/// A message plus an HTTP-style status code. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: u16,
}

impl ApiError {
    /// Build an error, replacing any status outside `100..=599` with
    /// [`DEFAULT_ERROR_STATUS`].
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status: normalize_status(status),
        }
    }

    /// Upstream could not be reached. Never carries a response status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message, ErrorKind::Transport.default_status())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message, ErrorKind::Decode.default_status())
    }

    /// Upstream answered with a non-OK status; the status is kept verbatim.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamRejected, message, status.as_u16())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message, ErrorKind::NotFound.default_status())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message, ErrorKind::BadRequest.default_status())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Unauthorized,
            message,
            ErrorKind::Unauthorized.default_status(),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status as an [`http::StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Same kind and status, new caller-facing message.
    pub fn relabel(&self, message: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            message: message.into(),
            status: self.status,
        }
    }
}

fn normalize_status(status: u16) -> u16 {
    if (100..=599).contains(&status) {
        status
    } else {
        DEFAULT_ERROR_STATUS
    }
}

/// Result alias used by every upstream client and domain service.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_status_defaults_to_500() {
        let err = ApiError::new(ErrorKind::UpstreamFailure, "boom", 0);
        assert_eq!(err.status(), 500);

        let err = ApiError::new(ErrorKind::UpstreamFailure, "boom", 1000);
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_rejected_keeps_upstream_status() {
        let err = ApiError::rejected(StatusCode::CONFLICT, "duplicate");
        assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
        assert_eq!(err.status(), 409);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_relabel_preserves_status_and_kind() {
        let err = ApiError::rejected(StatusCode::NOT_FOUND, "upstream said 404");
        let relabeled = err.relabel("liquor not found");

        assert_eq!(relabeled.message(), "liquor not found");
        assert_eq!(relabeled.status(), 404);
        assert_eq!(relabeled.kind(), ErrorKind::UpstreamRejected);
    }

    #[test]
    fn test_display() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.to_string(), "connection refused (status 500)");
    }
}
