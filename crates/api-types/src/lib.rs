//! Shared request/response types used by API-facing crates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKindDto {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDto {
    pub name: String,
    pub kind: EntryKindDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub path: String,
    pub entries: Vec<EntryDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub root: String,
    pub listing: ListingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDirectoryRequest {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

/// File operation submitted by a client, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationRequestDto {
    CreateFolder { parent: String, name: String },
    CreateFile { parent: String, name: String },
    Rename { path: String, new_name: String },
    Copy { source: String, dest_dir: String },
    Delete { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Refreshed listing of the session's current directory, when it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<ListingResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContentResponse {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewableUriResponse {
    pub uri: String,
    pub mime: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn operation_request_is_tagged_by_op() {
        let raw = r#"{"op":"rename","path":"/data/draft.txt","new_name":"final"}"#;
        let request: OperationRequestDto =
            serde_json::from_str(raw).expect("deserialize operation request");

        assert_eq!(
            request,
            OperationRequestDto::Rename {
                path: "/data/draft.txt".to_string(),
                new_name: "final".to_string(),
            }
        );
    }

    #[test]
    fn failure_response_omits_missing_fields() {
        let response = OperationResponse {
            status: OperationStatus::Failure,
            path: None,
            code: Some("ALREADY_EXISTS".to_string()),
            message: Some("目标已存在: /data/x".to_string()),
            listing: None,
        };

        let json = serde_json::to_value(&response).expect("serialize operation response");
        assert_eq!(json["status"], "failure");
        assert_eq!(json["code"], "ALREADY_EXISTS");
        assert!(json.get("path").is_none());
        assert!(json.get("listing").is_none());
    }
}
