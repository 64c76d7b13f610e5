//! API route definitions
//!
//! - /api/fields - list and create fields
//! - /api/fields/:id - one field record
//! - /api/fields/:id/soil - store a soil reading
//! - /api/fields/:id/image - upload an image for analysis
//! - /api/fields/:id/report - field report
//! - /api/stats - dashboard counts
//! - /api/soil/classify - classify a reading without storing it
//! - /api/config - effective configuration

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{self, ApiState};

/// Create all API routes
pub fn api_routes(state: ApiState) -> Router {
    let upload_limit = state.config.imaging.max_upload_bytes;

    Router::new()
        .route("/fields", get(handlers::list_fields).post(handlers::create_field))
        .route("/fields/:id", get(handlers::get_field))
        .route("/fields/:id/soil", put(handlers::save_soil))
        .route(
            "/fields/:id/image",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/fields/:id/report", get(handlers::get_report))
        .route("/stats", get(handlers::get_stats))
        .route("/soil/classify", post(handlers::classify_soil))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SoilClassifier;
    use crate::config::AppConfig;
    use crate::imaging::StaticImageAnalyzer;
    use crate::service::FieldService;
    use crate::storage::InMemoryFieldStore;
    use crate::types::ImageAnalysis;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> ApiState {
        let config = AppConfig::default();
        let service = FieldService::new(
            Arc::new(InMemoryFieldStore::new()),
            Arc::new(StaticImageAnalyzer::new(ImageAnalysis::clean("Good"))),
            SoilClassifier::new(config.soil),
            config.imaging.max_upload_bytes,
        );
        service.seed_sample_fields().unwrap();
        ApiState::new(Arc::new(service), Arc::new(config))
    }

    #[tokio::test]
    async fn test_fields_route() {
        let app = api_routes(create_test_state());
        let response = app
            .oneshot(Request::builder().uri("/fields").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_route() {
        let app = api_routes(create_test_state());
        let response = app
            .oneshot(Request::builder().uri("/fields/1/report").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_field_route() {
        let app = api_routes(create_test_state());
        let response = app
            .oneshot(Request::builder().uri("/fields/404").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = health_routes()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
