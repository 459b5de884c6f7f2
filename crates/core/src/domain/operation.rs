use std::path::{Path, PathBuf};

use super::FailureKind;

/// 用户发起的一次文件操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    CreateFolder { parent: PathBuf, name: String },
    CreateFile { parent: PathBuf, name: String },
    Rename { path: PathBuf, new_name: String },
    Copy { source: PathBuf, dest_dir: PathBuf },
    Delete { path: PathBuf },
}

impl OperationRequest {
    pub fn label(&self) -> &'static str {
        match self {
            OperationRequest::CreateFolder { .. } => "create_folder",
            OperationRequest::CreateFile { .. } => "create_file",
            OperationRequest::Rename { .. } => "rename",
            OperationRequest::Copy { .. } => "copy",
            OperationRequest::Delete { .. } => "delete",
        }
    }

    /// 操作直接涉及的路径，用于检测同一路径上的重复提交。
    pub fn target_paths(&self) -> Vec<PathBuf> {
        match self {
            OperationRequest::CreateFolder { parent, name }
            | OperationRequest::CreateFile { parent, name } => vec![parent.join(name)],
            OperationRequest::Rename { path, new_name } => {
                let mut paths = vec![path.clone()];
                if let Some(parent) = path.parent() {
                    paths.push(parent.join(new_name));
                }
                paths
            }
            OperationRequest::Copy { source, dest_dir } => {
                let mut paths = vec![source.clone()];
                if let Some(file_name) = source.file_name() {
                    paths.push(dest_dir.join(file_name));
                }
                paths
            }
            OperationRequest::Delete { path } => vec![path.clone()],
        }
    }

    /// 内容会因该操作而变化的目录。
    pub fn affected_directories(&self) -> Vec<&Path> {
        match self {
            OperationRequest::CreateFolder { parent, .. }
            | OperationRequest::CreateFile { parent, .. } => vec![parent.as_path()],
            OperationRequest::Rename { path, .. } | OperationRequest::Delete { path } => {
                path.parent().into_iter().collect()
            }
            OperationRequest::Copy { dest_dir, .. } => vec![dest_dir.as_path()],
        }
    }

    pub fn affects(&self, directory: &Path) -> bool {
        self.affected_directories()
            .into_iter()
            .any(|dir| dir == directory)
    }
}

/// 一次操作的结果，成功时带有被创建、改名、复制或删除的路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success { path: PathBuf },
    Failure { reason: FailureKind, message: String },
}

impl OperationOutcome {
    pub fn success(path: impl Into<PathBuf>) -> Self {
        Self::Success { path: path.into() }
    }

    pub fn failure(reason: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            reason,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            OperationOutcome::Success { .. } => None,
            OperationOutcome::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.failure_kind().map_or(0, FailureKind::exit_code)
    }
}
