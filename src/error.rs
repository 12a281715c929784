use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::CONTENT_TYPE};
use thiserror::Error;

const GENERIC_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("upstream rejected the request with status {status}")]
    UpstreamRejected {
        status: u16,
        body: Vec<u8>,
        content_type: Option<String>,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown to the caller. Local failures never leak their detail.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(message) | AppError::UpstreamUnavailable(message) => {
                message.clone()
            }
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Internal(_)
            | AppError::UpstreamRejected { .. } => GENERIC_ERROR.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::UpstreamRejected {
            body, content_type, ..
        } = self
        {
            let mut response = HttpResponse::build(self.status_code());
            if let Some(content_type) = content_type {
                response.insert_header((CONTENT_TYPE, content_type.as_str()));
            }
            return response.body(body.clone());
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message()
        }))
    }
}
