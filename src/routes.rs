use actix_web::{HttpResponse, error::JsonPayloadError, get, http::header::CONTENT_TYPE, post, web};
use tracing::error;

use crate::{
    AppState,
    error::AppError,
    models::{
        creation::CreationRequest,
        health::{CacheStatus, HealthResponse},
    },
};

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health)
        .service(get_folders)
        .service(create_file);
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            let message = match &err {
                JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                    "Request body too large".to_string()
                }
                other => format!("Invalid JSON body: {other}"),
            };
            AppError::Validation(message).into()
        })
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    let cache_status = if state.folders.cache().is_loaded() {
        CacheStatus::Loaded
    } else {
        CacheStatus::Empty
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".into(),
        service: "dsa-gateway".into(),
        cache_status,
    })
}

#[get("/folders")]
async fn get_folders(state: web::Data<AppState>) -> HttpResponse {
    let tree = state.folders.folder_tree().await;
    HttpResponse::Ok().json(&*tree)
}

#[post("/create-file")]
async fn create_file(
    state: web::Data<AppState>,
    payload: web::Json<CreationRequest>,
) -> Result<HttpResponse, AppError> {
    match state.forwarder.create_file(payload.into_inner()).await {
        Ok(forwarded) => {
            let mut response = HttpResponse::build(forwarded.status);
            if let Some(content_type) = forwarded.content_type {
                response.insert_header((CONTENT_TYPE, content_type));
            }
            Ok(response.body(forwarded.body))
        }
        Err(err) => {
            if matches!(err, AppError::Internal(_) | AppError::Io(_) | AppError::Config(_)) {
                error!(error = %err, "create-file failed");
            }
            Err(err)
        }
    }
}
