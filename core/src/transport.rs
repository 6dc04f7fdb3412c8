//! The I/O seam between the client and the network.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and hands back an `HttpResponse`
//! whatever its status; only failures to get a response at all come back as
//! `TransportError`. Tests swap in a scripted transport, production uses
//! `ReqwestTransport`.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};

/// Raw reason a round-trip produced no response. Never leaves the client:
/// `classify` turns it into an `ApiError` first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Nothing was listening, or the host could not be reached.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// The request was sent but the response never (fully) arrived.
    #[error("no response: {0}")]
    NoResponse(String),

    /// The request could not even be built or sent.
    #[error("request not dispatched: {0}")]
    Dispatch(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Dispatch(describe(&e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Timeouts are checked before connect failures: a connect timeout means the
/// request was attempted and nothing answered in time.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    let cause = describe(&err);
    if err.is_timeout() {
        TransportError::NoResponse(cause)
    } else if err.is_connect() {
        TransportError::ConnectionRefused(cause)
    } else if err.is_builder() {
        TransportError::Dispatch(cause)
    } else {
        TransportError::NoResponse(cause)
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
