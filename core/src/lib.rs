//! Async API client core for the spy cat agency backend.
//!
//! # Overview
//! `SpyCatClient` is the single point of contact with the backend: it owns
//! a fixed `ClientConfig` (base URL, timeout) and a `Transport`, logs every
//! request and response through `tracing`, and turns every failure into one
//! `ApiError` shape that views can render without special cases.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   `build_*` methods are pure, so request shapes are testable offline.
//! - `Transport` is the only I/O seam. `ReqwestTransport` is the
//!   production implementation; tests inject scripted fakes.
//! - `ApiError` is a closed four-way taxonomy (network, HTTP status,
//!   transport, unknown) produced by `classify`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod roster;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::SpyCatClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{
    AssignMission, CreateMission, CreateSpyCat, CreateTarget, HealthStatus, Mission, SpyCat,
    Target, UpdateSpyCat, UpdateTarget,
};
pub use validate::ValidationError;
