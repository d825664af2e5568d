//! Upstream service clients
//!
//! The gateway never interprets catalog or storage responses; it relays
//! status and JSON body unchanged. Only transport-level failures become
//! gateway errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lyra_common::api::ErrorResponse;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, warn};

/// Per-request timeout against upstreams (uploads excluded)
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Generous timeout for multipart uploads
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport-level failure talking to an upstream, or a path the
/// gateway does not forward
#[derive(Debug)]
pub enum GatewayError {
    Unreachable { upstream: String, message: String },
    BadUpstream { upstream: String, message: String },
    UnknownRoute(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, upstream, message) = match &self {
            GatewayError::Unreachable { upstream, message }
            | GatewayError::BadUpstream { upstream, message } => {
                (StatusCode::BAD_GATEWAY, upstream.as_str(), message.clone())
            }
            GatewayError::UnknownRoute(path) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new(format!("no such route: {path}"))),
                )
                    .into_response();
            }
        };
        error!("Upstream {} failed: {}", upstream, message);

        (
            status,
            Json(ErrorResponse::with_details(
                format!("{upstream} service unavailable"),
                message,
            )),
        )
            .into_response()
    }
}

/// An upstream response ready to relay: original status plus JSON body
/// (empty for 204-style responses)
#[derive(Debug)]
pub struct Relay {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl IntoResponse for Relay {
    fn into_response(self) -> Response {
        match self.body {
            Some(value) => (self.status, Json(value)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// HTTP client bound to one upstream service
#[derive(Clone)]
pub struct Upstream {
    name: &'static str,
    http: reqwest::Client,
    base_url: String,
}

impl Upstream {
    pub fn new(name: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            name,
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    async fn relay(&self, response: reqwest::Response) -> Result<Relay, GatewayError> {
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

        let bytes = response.bytes().await.map_err(|e| GatewayError::BadUpstream {
            upstream: self.name.to_string(),
            message: e.to_string(),
        })?;

        if bytes.is_empty() {
            return Ok(Relay { status, body: None });
        }

        let body = serde_json::from_slice(&bytes).map_err(|e| GatewayError::BadUpstream {
            upstream: self.name.to_string(),
            message: format!("non-JSON upstream body: {e}"),
        })?;

        Ok(Relay {
            status,
            body: Some(body),
        })
    }

    fn unreachable(&self, e: reqwest::Error) -> GatewayError {
        GatewayError::Unreachable {
            upstream: self.name.to_string(),
            message: e.to_string(),
        }
    }

    /// GET with the original query string attached
    pub async fn get(&self, path_and_query: &str) -> Result<Relay, GatewayError> {
        let response = self
            .http
            .get(self.url(path_and_query))
            .timeout(UPSTREAM_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        self.relay(response).await
    }

    /// POST/PUT with a JSON body forwarded verbatim
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<Relay, GatewayError> {
        let response = self
            .http
            .request(method, self.url(path))
            .timeout(UPSTREAM_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        self.relay(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<Relay, GatewayError> {
        let response = self
            .http
            .delete(self.url(path))
            .timeout(UPSTREAM_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        self.relay(response).await
    }

    /// POST a re-assembled multipart form (upload forwarding)
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Relay, GatewayError> {
        let response = self
            .http
            .post(self.url(path))
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        self.relay(response).await
    }

    /// Probe /health; used by the gateway's own health endpoint
    pub async fn probe(&self) -> &'static str {
        let result = self
            .http
            .get(self.url("/health"))
            .timeout(Duration::from_secs(2))
            .send()
            .await;

        match result {
            Ok(r) if r.status().is_success() => "ok",
            Ok(r) => {
                warn!("Upstream {} health returned {}", self.name, r.status());
                "degraded"
            }
            Err(_) => "unreachable",
        }
    }
}
