//! Gatekeeper in front of the persistence service's `POST /create-file`.
//!
//! Requests are validated locally and then forwarded unchanged. The
//! persistence service owns the existence check and the write, including the
//! naming scheme used for `version`. Nothing is locked between a `check` and
//! the follow-up action, so a second writer can slip in between the two calls.

use std::time::Duration;

use actix_web::http::StatusCode;
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::{error, info};

use crate::{
    error::AppError,
    models::creation::{CreationRequest, CreationResult, ValidatedCreation},
};

/// A successful (2xx) answer from the persistence service, kept byte for byte.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

pub struct CreationForwarder {
    http: Client,
    base_url: String,
    endpoint: String,
}

impl CreationForwarder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{base_url}/create-file");

        Ok(Self {
            http,
            base_url,
            endpoint,
        })
    }

    pub async fn create_file(&self, request: CreationRequest) -> Result<Forwarded, AppError> {
        let validated = request.validate()?;
        self.forward(&validated).await
    }

    async fn forward(&self, request: &ValidatedCreation) -> Result<Forwarded, AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            info!(
                status = status.as_u16(),
                action = %request.action,
                path = %request.target_path(),
                "persistence service rejected request"
            );
            return Err(AppError::UpstreamRejected {
                status: status.as_u16(),
                body: bytes.to_vec(),
                content_type,
            });
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|err| {
            AppError::Internal(format!("persistence service returned invalid json: {err}"))
        })?;
        let result = CreationResult::from_body(&body).ok_or_else(|| {
            AppError::Internal(format!("persistence service returned unexpected body: {body}"))
        })?;

        info!(
            outcome = result.label(),
            action = %request.action,
            path = %request.target_path(),
            "forwarded create-file request"
        );

        Ok(Forwarded {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK),
            body: bytes.to_vec(),
            content_type,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            error!(error = %err, url = %self.endpoint, "persistence service unreachable");
            AppError::UpstreamUnavailable(format!(
                "Persistence service not available. Make sure it is running on {}",
                self.base_url
            ))
        } else {
            AppError::Internal(format!("persistence request failed: {err}"))
        }
    }
}
