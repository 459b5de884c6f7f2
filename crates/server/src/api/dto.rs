//! 领域类型与 API 类型之间的转换。

use axum::http::StatusCode;
use filemgr_api_types::{
    EntryDto, EntryKindDto, ListingResponse, OperationRequestDto, OperationResponse,
    OperationStatus,
};
use filemgr_capabilities::{FsError, SubmitResult};
use filemgr_core::domain::{DirectoryListing, EntryKind, OperationOutcome, OperationRequest};

use super::error::status_for;
use super::state::AppState;

pub fn listing_response(listing: &DirectoryListing) -> ListingResponse {
    ListingResponse {
        path: listing.path().display().to_string(),
        entries: listing
            .iter()
            .map(|entry| EntryDto {
                name: entry.name().to_string(),
                kind: match entry.kind() {
                    EntryKind::File => EntryKindDto::File,
                    EntryKind::Directory => EntryKindDto::Directory,
                },
            })
            .collect(),
    }
}

/// 将请求中的路径限制在根目录内后转换为领域请求。
pub fn operation_request(
    state: &AppState,
    dto: OperationRequestDto,
) -> Result<OperationRequest, FsError> {
    Ok(match dto {
        OperationRequestDto::CreateFolder { parent, name } => OperationRequest::CreateFolder {
            parent: state.confine(&parent)?,
            name,
        },
        OperationRequestDto::CreateFile { parent, name } => OperationRequest::CreateFile {
            parent: state.confine(&parent)?,
            name,
        },
        OperationRequestDto::Rename { path, new_name } => OperationRequest::Rename {
            path: state.confine_entry(&path)?,
            new_name,
        },
        OperationRequestDto::Copy { source, dest_dir } => OperationRequest::Copy {
            source: state.confine(&source)?,
            dest_dir: state.confine(&dest_dir)?,
        },
        OperationRequestDto::Delete { path } => OperationRequest::Delete {
            path: state.confine_entry(&path)?,
        },
    })
}

pub fn operation_response(result: SubmitResult) -> (StatusCode, OperationResponse) {
    let listing = result.listing.as_ref().map(listing_response);
    match result.outcome {
        OperationOutcome::Success { path } => (
            StatusCode::OK,
            OperationResponse {
                status: OperationStatus::Success,
                path: Some(path.display().to_string()),
                code: None,
                message: None,
                listing,
            },
        ),
        OperationOutcome::Failure { reason, message } => (
            status_for(reason),
            OperationResponse {
                status: OperationStatus::Failure,
                path: None,
                code: Some(reason.code().to_string()),
                message: Some(message),
                listing,
            },
        ),
    }
}
