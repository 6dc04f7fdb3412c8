//! Error types for the spy cat API client.
//!
//! # Design
//! Every failed operation resolves to one `ApiError`, whatever went wrong.
//! The four variants form a closed taxonomy so call sites match
//! exhaustively; each carries a user-facing `message` plus optional raw
//! `details` for debugging display.

use thiserror::Error;

/// Errors returned by every `SpyCatClient` operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend could not be reached at all (refused connection).
    #[error("{message}")]
    Network {
        message: String,
        details: Option<String>,
    },

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    HttpStatus {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The request went out but no response came back (timeout, dropped
    /// connection).
    #[error("{message}")]
    Transport { message: String, details: String },

    /// The failure happened before the request was dispatched, or the
    /// response could not be understood.
    #[error("{message}")]
    Unknown { message: String, details: String },
}

/// Discriminant of `ApiError`, handy for assertions and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    HttpStatus,
    Transport,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NetworkError",
            ApiErrorKind::HttpStatus => "HttpStatusError",
            ApiErrorKind::Transport => "TransportError",
            ApiErrorKind::Unknown => "UnknownError",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::HttpStatus { .. } => ApiErrorKind::HttpStatus,
            ApiError::Transport { .. } => ApiErrorKind::Transport,
            ApiError::Unknown { .. } => ApiErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message, .. }
            | ApiError::HttpStatus { message, .. }
            | ApiError::Transport { message, .. }
            | ApiError::Unknown { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Network { details, .. } | ApiError::HttpStatus { details, .. } => {
                details.as_deref()
            }
            ApiError::Transport { details, .. } | ApiError::Unknown { details, .. } => {
                Some(details)
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
