//! 浏览会话 API 路由。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use filemgr_api_types::{
    EnterRequest, ListingResponse, OperationRequestDto, OperationResponse, SessionResponse,
    SetDirectoryRequest,
};
use filemgr_capabilities::BrowsingSession;
use filemgr_core::domain::SessionId;

use super::dto::{listing_response, operation_request, operation_response};
use super::error::ApiError;
use super::state::AppState;

/// 创建会话 API 路由。
pub fn create_session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", axum::routing::delete(close_session))
        .route("/api/sessions/{id}/listing", get(refresh))
        .route("/api/sessions/{id}/enter", post(enter))
        .route("/api/sessions/{id}/up", post(up))
        .route("/api/sessions/{id}/root", post(root))
        .route("/api/sessions/{id}/recover", post(recover))
        .route("/api/sessions/{id}/directory", post(set_directory))
        .route("/api/sessions/{id}/operations", post(submit_operation))
}

async fn lookup(state: &AppState, id: &str) -> Result<Arc<BrowsingSession>, ApiError> {
    let session_id: SessionId = id.parse().map_err(|_| ApiError::session_not_found(id))?;
    state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::session_not_found(id))
}

/// 在根目录创建新的浏览会话。
async fn create_session(
    state: axum::extract::State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (session, listing) = state
        .sessions
        .create(state.root.clone(), state.engine.clone())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.id().to_string(),
            root: state.root.display().to_string(),
            listing: listing_response(&listing),
        }),
    ))
}

async fn close_session(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id: SessionId = id.parse().map_err(|_| ApiError::session_not_found(&id))?;
    match state.sessions.close(&session_id).await {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::session_not_found(&id)),
    }
}

/// 刷新当前目录。
async fn refresh(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let listing = session.refresh().await?;
    Ok(Json(listing_response(&listing)))
}

/// 进入子目录。
async fn enter(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<EnterRequest>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let listing = session.enter(&request.name).await?;
    Ok(Json(listing_response(&listing)))
}

async fn up(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let listing = session.up().await?;
    Ok(Json(listing_response(&listing)))
}

async fn root(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let listing = session.root().await?;
    Ok(Json(listing_response(&listing)))
}

/// 当前目录消失后回退到最近的现存祖先目录。
async fn recover(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let listing = session.recover().await?;
    Ok(Json(listing_response(&listing)))
}

async fn set_directory(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SetDirectoryRequest>,
) -> Result<Json<ListingResponse>, ApiError> {
    let session = lookup(&state, &id).await?;
    let path = state.confine(&request.path)?;
    let listing = session.set_directory(&path).await?;
    Ok(Json(listing_response(&listing)))
}

/// 提交文件操作，失败时状态码与失败分类对应。
async fn submit_operation(
    state: axum::extract::State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<OperationRequestDto>,
) -> Result<(StatusCode, Json<OperationResponse>), ApiError> {
    let session = lookup(&state, &id).await?;
    let request = operation_request(&state, request)?;
    let (status, response) = operation_response(session.submit(request).await);
    Ok((status, Json(response)))
}
