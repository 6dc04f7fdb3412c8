//! Failure classification: every way a call can fail becomes one `ApiError`.
//!
//! Rules are applied in a fixed order: unreachable backend, HTTP status,
//! request sent without response, and finally anything that failed before
//! dispatch.

use std::fmt;

use serde_json::Value;

use crate::error::ApiError;
use crate::transport::TransportError;

pub const INVALID_REQUEST: &str = "Invalid request. Please check your input.";
pub const NOT_FOUND: &str = "Resource not found.";
pub const VALIDATION_FAILED: &str = "Validation error. Please check your input.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const UNEXPECTED: &str = "An unexpected error occurred.";
pub const NO_RESPONSE: &str = "Network error. Please check your connection and try again.";
pub const NO_RESPONSE_DETAILS: &str = "Unable to connect to the server";

/// A failure as observed by the client, before normalization.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// The transport gave up without a response.
    Transport(&'a TransportError),
    /// The backend answered with a non-2xx status.
    Status { status: u16, body: &'a str },
}

/// Message shown when nothing is listening on the backend address.
pub fn backend_down_message(port: Option<u16>) -> String {
    match port {
        Some(port) => format!(
            "Backend server is not running. Please start the backend server on port {port}."
        ),
        None => "Backend server is not running. Please start the backend server.".to_string(),
    }
}

pub fn classify(failure: Failure<'_>, backend_port: Option<u16>) -> ApiError {
    match failure {
        Failure::Transport(TransportError::ConnectionRefused(cause)) => ApiError::Network {
            message: backend_down_message(backend_port),
            details: Some(cause.clone()),
        },
        Failure::Status { status, body } => classify_status(status, body),
        Failure::Transport(TransportError::NoResponse(_)) => ApiError::Transport {
            message: NO_RESPONSE.to_string(),
            details: NO_RESPONSE_DETAILS.to_string(),
        },
        Failure::Transport(err @ TransportError::Dispatch(_)) => local_failure(err),
    }
}

/// Map an HTTP status to the user-facing message, preferring the server's
/// own detail text except for 404.
pub fn classify_status(status: u16, body: &str) -> ApiError {
    let detail = server_detail(body);
    let fallback = match status {
        400 => INVALID_REQUEST,
        404 => NOT_FOUND,
        422 => VALIDATION_FAILED,
        500 => SERVER_ERROR,
        _ => UNEXPECTED,
    };
    let message = match (&detail, status) {
        (_, 404) | (None, _) => fallback.to_string(),
        (Some(detail), _) => detail.clone(),
    };
    ApiError::HttpStatus {
        status,
        message,
        details: detail,
    }
}

/// Rule 4: the failure's own message, or the generic one when it has none.
pub fn local_failure<E: fmt::Display + fmt::Debug>(err: &E) -> ApiError {
    let own = err.to_string();
    let message = if own.trim().is_empty() {
        UNEXPECTED.to_string()
    } else {
        own
    };
    ApiError::Unknown {
        message,
        details: format!("{err:?}"),
    }
}

/// Pull the backend's explanation out of an error body: `detail`, else
/// `message`.
pub fn server_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(render_detail)
}

fn render_detail(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(items) if items.is_empty() => None,
        // FastAPI validation errors: [{"loc": [...], "msg": "...", "type": "..."}]
        Value::Array(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            Some(rendered.join("; "))
        }
        other => Some(other.to_string()),
    }
}
