//! API 路由模块。

pub mod accounts;
pub mod admin;
pub mod analytics;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod forms;
pub mod identity;
pub mod state;

pub use error::ApiError;
pub use extract::ResourceId;
pub use identity::{CurrentStudent, STUDENT_HEADER};
pub use state::AppState;

use axum::{Json, Router, routing::get};
use feedback_api_types::HealthCheckResponse;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// 创建包含所有路由的应用。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(catalog::create_catalog_router())
        .merge(accounts::create_accounts_router())
        .merge(admin::create_admin_router())
        .merge(forms::create_forms_router())
        .merge(analytics::create_analytics_router())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
