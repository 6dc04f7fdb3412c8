//! Typed client for the spy cat agency API.
//!
//! # Design
//! `SpyCatClient` carries its `ClientConfig` and a `Transport`, both fixed
//! at construction. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a parse step that consumes the
//! `HttpResponse`, with `send` in between acting as the interceptor: it logs
//! the outgoing request and the incoming response, and classifies every
//! failure into an `ApiError` before it reaches the caller.
//!
//! Nothing is cached, retried or de-duplicated; every call goes to the
//! backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::{classify, local_failure, Failure};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    AssignMission, CreateMission, CreateSpyCat, HealthStatus, Mission, SpyCat, Target,
    UpdateSpyCat, UpdateTarget,
};
use crate::validate::{validate_mission, validate_new_cat, validate_salary};

#[derive(Debug, Error)]
#[error("Could not encode request body: {0}")]
struct EncodeError(serde_json::Error);

#[derive(Debug, Error)]
#[error("Unexpected response from server: {0}")]
struct DecodeError(serde_json::Error);

#[derive(Debug)]
pub struct SpyCatClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl SpyCatClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout())
            .map_err(|e| classify(Failure::Transport(&e), config.backend_port()))?;
        Ok(Self::with_transport(config, transport))
    }

    /// Client for the backend named by `SPY_CAT_API_URL`, or the local
    /// default.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> SpyCatClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: self.config.url_for(&path),
            path,
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| local_failure(&EncodeError(e)))?;
        Ok(self.request(method, path, Some(body)))
    }

    // --- request builders ---

    pub fn build_list_cats(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/cats/".to_string(), None)
    }

    pub fn build_get_cat(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/cats/{id}"), None)
    }

    pub fn build_create_cat(&self, input: &CreateSpyCat) -> Result<HttpRequest, ApiError> {
        validate_new_cat(input).map_err(|e| local_failure(&e))?;
        self.json_request(HttpMethod::Post, "/cats/".to_string(), input)
    }

    pub fn build_update_cat(&self, id: i64, input: &UpdateSpyCat) -> Result<HttpRequest, ApiError> {
        validate_salary(input.salary).map_err(|e| local_failure(&e))?;
        self.json_request(HttpMethod::Put, format!("/cats/{id}"), input)
    }

    pub fn build_delete_cat(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/cats/{id}"), None)
    }

    pub fn build_list_missions(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/missions/".to_string(), None)
    }

    pub fn build_get_mission(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/missions/{id}"), None)
    }

    pub fn build_create_mission(&self, input: &CreateMission) -> Result<HttpRequest, ApiError> {
        validate_mission(input).map_err(|e| local_failure(&e))?;
        self.json_request(HttpMethod::Post, "/missions/".to_string(), input)
    }

    pub fn build_assign_mission(
        &self,
        mission_id: i64,
        input: &AssignMission,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("/missions/{mission_id}/assign"), input)
    }

    pub fn build_delete_mission(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/missions/{id}"), None)
    }

    pub fn build_update_target(&self, id: i64, input: &UpdateTarget) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("/targets/{id}"), input)
    }

    // --- response parsers ---

    /// Decode a successful JSON response. Any 2xx status counts as success.
    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        self.check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| local_failure(&DecodeError(e)))
    }

    /// Accept a successful response whose body is irrelevant (deletes).
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check_status(&response)
    }

    fn check_status(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if response.is_success() {
            return Ok(());
        }
        Err(classify(
            Failure::Status {
                status: response.status,
                body: &response.body,
            },
            self.config.backend_port(),
        ))
    }

    // --- interceptor ---

    /// Execute one request, logging both directions and normalizing every
    /// failure.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        info!(%method, path = %path, "api request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                let api = classify(Failure::Transport(&err), self.config.backend_port());
                warn!(%method, path = %path, kind = api.kind().as_str(), cause = %err, "api request failed");
                return Err(api);
            }
        };

        info!(status = response.status, path = %path, "api response");
        if let Err(api) = self.check_status(&response) {
            warn!(
                status = response.status,
                path = %path,
                error = %api,
                details = api.details().unwrap_or_default(),
                "api response error"
            );
            return Err(api);
        }
        Ok(response)
    }

    /// Requests that never reach `send` still leave a trace.
    fn prepared(
        &self,
        operation: &'static str,
        built: Result<HttpRequest, ApiError>,
    ) -> Result<HttpRequest, ApiError> {
        built.map_err(|api| {
            warn!(
                operation,
                kind = api.kind().as_str(),
                error = %api,
                details = api.details().unwrap_or_default(),
                "api request rejected before dispatch"
            );
            api
        })
    }

    // --- agents ---

    pub async fn list_cats(&self) -> Result<Vec<SpyCat>, ApiError> {
        let response = self.send(self.build_list_cats()).await?;
        self.parse_json(response)
    }

    pub async fn get_cat(&self, id: i64) -> Result<SpyCat, ApiError> {
        let response = self.send(self.build_get_cat(id)).await?;
        self.parse_json(response)
    }

    pub async fn create_cat(&self, input: &CreateSpyCat) -> Result<SpyCat, ApiError> {
        let request = self.prepared("create_cat", self.build_create_cat(input))?;
        let response = self.send(request).await?;
        self.parse_json(response)
    }

    pub async fn update_cat_salary(&self, id: i64, salary: f64) -> Result<SpyCat, ApiError> {
        let request = self.prepared(
            "update_cat_salary",
            self.build_update_cat(id, &UpdateSpyCat { salary }),
        )?;
        let response = self.send(request).await?;
        self.parse_json(response)
    }

    pub async fn delete_cat(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.build_delete_cat(id)).await?;
        self.parse_empty(response)
    }

    // --- missions ---

    pub async fn list_missions(&self) -> Result<Vec<Mission>, ApiError> {
        let response = self.send(self.build_list_missions()).await?;
        self.parse_json(response)
    }

    pub async fn get_mission(&self, id: i64) -> Result<Mission, ApiError> {
        let response = self.send(self.build_get_mission(id)).await?;
        self.parse_json(response)
    }

    pub async fn create_mission(&self, input: &CreateMission) -> Result<Mission, ApiError> {
        let request = self.prepared("create_mission", self.build_create_mission(input))?;
        let response = self.send(request).await?;
        self.parse_json(response)
    }

    pub async fn assign_mission(&self, mission_id: i64, cat_id: i64) -> Result<Mission, ApiError> {
        let request = self.prepared(
            "assign_mission",
            self.build_assign_mission(mission_id, &AssignMission { cat_id }),
        )?;
        let response = self.send(request).await?;
        self.parse_json(response)
    }

    /// Callers should not offer this for assigned missions; the backend
    /// refuses them, this method does not check.
    pub async fn delete_mission(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.build_delete_mission(id)).await?;
        self.parse_empty(response)
    }

    // --- targets ---

    pub async fn update_target(&self, id: i64, input: &UpdateTarget) -> Result<Target, ApiError> {
        let request = self.prepared("update_target", self.build_update_target(id, input))?;
        let response = self.send(request).await?;
        self.parse_json(response)
    }

    // --- health ---

    /// One agent listing; healthy iff it succeeds. No retry, no polling.
    pub async fn check_health(&self) -> HealthStatus {
        debug!(base_url = self.config.base_url(), "checking backend health");
        match self.list_cats().await {
            Ok(_) => HealthStatus::healthy(),
            Err(err) => {
                warn!(kind = err.kind().as_str(), error = %err, "backend health check failed");
                HealthStatus::unhealthy(err.message())
            }
        }
    }
}
