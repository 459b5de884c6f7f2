//! API 错误类型。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use filemgr_api_types::ErrorResponse;
use filemgr_capabilities::FsError;
use filemgr_core::domain::FailureKind;

/// 失败分类对应的 HTTP 状态码。
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidName | FailureKind::NotADirectory => StatusCode::BAD_REQUEST,
        FailureKind::PermissionDenied => StatusCode::FORBIDDEN,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::AlreadyExists | FailureKind::Busy => StatusCode::CONFLICT,
        FailureKind::DirectoryVanished => StatusCode::GONE,
        FailureKind::UnsupportedKind | FailureKind::NotSupported | FailureKind::Unreadable => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FailureKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::IoFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: String,
    status: StatusCode,
}

impl ApiError {
    pub fn session_not_found(id: &str) -> Self {
        ApiError {
            message: format!("Session not found: {}", id),
            code: "SESSION_NOT_FOUND".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }
}

impl From<FsError> for ApiError {
    fn from(err: FsError) -> Self {
        let kind = err.kind();
        ApiError {
            message: err.to_string(),
            code: kind.code().to_string(),
            status: status_for(kind),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
