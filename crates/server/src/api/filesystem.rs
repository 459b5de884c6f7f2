//! 文件系统 API 路由。
//!
//! 提供不依赖会话的目录列举、文本读取与查看地址解析。

use std::sync::Arc;

use axum::{Json, Router, extract::Query, routing::get};
use filemgr_api_types::{ListingResponse, PathQuery, TextContentResponse, ViewableUriResponse};
use filemgr_capabilities::session::run_blocking;

use super::dto::listing_response;
use super::error::ApiError;
use super::state::AppState;

/// 创建文件系统 API 路由。
pub fn create_filesystem_router() -> Router<Arc<AppState>> {
    Router::new()
        // 列出目录内容
        .route("/api/fs/list", get(list_directory))
        // 读取文本文件
        .route("/api/fs/text", get(read_text))
        // 解析查看地址
        .route("/api/fs/view", get(resolve_view))
}

/// 列出目录内容。
async fn list_directory(
    state: axum::extract::State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ListingResponse>, ApiError> {
    let path = state.confine(&query.path)?;
    let lister = state.lister;
    let listing = run_blocking(move || lister.list(&path)).await?;
    Ok(Json(listing_response(&listing)))
}

/// 读取文本文件内容。
async fn read_text(
    state: axum::extract::State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<TextContentResponse>, ApiError> {
    let path = state.confine(&query.path)?;
    let engine = state.engine.clone();
    let task_path = path.clone();
    let content = run_blocking(move || engine.read_text(&task_path)).await?;
    Ok(Json(TextContentResponse {
        path: path.display().to_string(),
        content,
    }))
}

/// 解析可交给查看器的地址。
async fn resolve_view(
    state: axum::extract::State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ViewableUriResponse>, ApiError> {
    let path = state.confine(&query.path)?;
    let engine = state.engine.clone();
    let view = run_blocking(move || engine.resolve_viewable_uri(&path)).await?;
    Ok(Json(ViewableUriResponse {
        uri: view.uri,
        mime: view.mime,
    }))
}
