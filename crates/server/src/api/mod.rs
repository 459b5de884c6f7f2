//! API 路由模块。
//!
//! 为展示层提供目录浏览、会话游标与文件操作 API。

pub mod dto;
pub mod error;
pub mod filesystem;
pub mod sessions;
pub mod state;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use filemgr_api_types::HealthCheckResponse;
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use filesystem::create_filesystem_router;
pub use sessions::create_session_router;
pub use state::AppState;

/// 组装完整的路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(create_filesystem_router())
        .merge(create_session_router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
