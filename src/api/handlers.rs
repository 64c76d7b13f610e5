//! API route handlers
//!
//! Thin wrappers over [`FieldService`]: extract, call, wrap in the envelope.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::AppConfig;
use crate::imaging::{ImageError, ImageUpload};
use crate::service::{FieldService, ServiceError};
use crate::types::{NewField, SoilReading};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<FieldService>,
    pub config: Arc<AppConfig>,
}

impl ApiState {
    pub fn new(service: Arc<FieldService>, config: Arc<AppConfig>) -> Self {
        Self { service, config }
    }
}

/// Map service failures onto HTTP status codes.
fn error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::FieldNotFound(_) => ApiErrorResponse::not_found(err.to_string()),
        ServiceError::InvalidField(_) | ServiceError::InvalidReading(_) => {
            ApiErrorResponse::bad_request(err.to_string())
        }
        ServiceError::InvalidImage(ImageError::NotAnImage(_)) => {
            ApiErrorResponse::unsupported_media_type(err.to_string())
        }
        ServiceError::InvalidImage(ImageError::TooLarge { .. }) => {
            ApiErrorResponse::payload_too_large(err.to_string())
        }
        ServiceError::InvalidImage(_) => ApiErrorResponse::bad_request(err.to_string()),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "Field store failure");
            ApiErrorResponse::internal(format!("Storage error: {e}"))
        }
    }
}

fn respond<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Fields
// ============================================================================

pub async fn list_fields(State(state): State<ApiState>) -> Response {
    respond(state.service.list_fields())
}

pub async fn create_field(
    State(state): State<ApiState>,
    payload: Result<Json<NewField>, JsonRejection>,
) -> Response {
    let Json(new_field) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    match state.service.add_field(new_field) {
        Ok(field) => ApiResponse::created(field),
        Err(e) => error_response(e),
    }
}

pub async fn get_field(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    respond(state.service.field(&id))
}

// ============================================================================
// Soil & Image Analyses
// ============================================================================

pub async fn save_soil(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<SoilReading>, JsonRejection>,
) -> Response {
    let Json(reading) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    respond(state.service.save_soil_data(&id, reading))
}

pub async fn classify_soil(
    State(state): State<ApiState>,
    payload: Result<Json<SoilReading>, JsonRejection>,
) -> Response {
    let Json(reading) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    respond(state.service.classify(&reading))
}

/// Raw image body; the content type comes from the `Content-Type` header.
pub async fn upload_image(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let bytes = match body {
        Ok(b) => b,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return ApiErrorResponse::payload_too_large(format!(
                "Image exceeds the {} byte upload limit",
                state.config.imaging.max_upload_bytes
            ));
        }
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let upload = ImageUpload::new(content_type, bytes.to_vec());

    respond(state.service.analyze_image(&id, &upload))
}

// ============================================================================
// Reports & Dashboard
// ============================================================================

pub async fn get_report(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    respond(state.service.report(&id))
}

pub async fn get_stats(State(state): State<ApiState>) -> Response {
    respond(state.service.dashboard_stats())
}

pub async fn get_config(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(state.config.as_ref())
}
