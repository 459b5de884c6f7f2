//! 文件系统能力错误类型。

use std::io;
use std::path::Path;

use filemgr_core::domain::{DomainError, FailureKind, OperationOutcome};
use thiserror::Error;

/// 文件系统能力错误，每个变体对应一种失败分类。
#[derive(Debug, Error)]
pub enum FsError {
    #[error("名称非法: {0}")]
    InvalidName(String),

    #[error("目标已存在: {0}")]
    AlreadyExists(String),

    #[error("路径不存在: {0}")]
    NotFound(String),

    #[error("路径不是目录: {0}")]
    NotADirectory(String),

    #[error("不支持对该类型条目执行此操作: {0}")]
    UnsupportedKind(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("目录无法读取: {0}")]
    Unreadable(String),

    #[error("当前目录已不存在: {0}")]
    DirectoryVanished(String),

    #[error("存储不可用: {0}")]
    Unavailable(String),

    #[error("不支持查看该文件: {0}")]
    NotSupported(String),

    #[error("该路径上已有操作正在进行: {0}")]
    Busy(String),

    #[error("IO 错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;

impl FsError {
    /// 将底层 IO 错误按类别映射到失败分类。
    pub fn io(path: &Path, source: io::Error) -> Self {
        let display = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(display),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(display),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(display),
            _ => FsError::Io {
                path: display,
                source,
            },
        }
    }

    pub fn invalid_name(err: DomainError) -> Self {
        FsError::InvalidName(err.to_string())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FsError::InvalidName(_) => FailureKind::InvalidName,
            FsError::AlreadyExists(_) => FailureKind::AlreadyExists,
            FsError::NotFound(_) => FailureKind::NotFound,
            FsError::NotADirectory(_) => FailureKind::NotADirectory,
            FsError::UnsupportedKind(_) => FailureKind::UnsupportedKind,
            FsError::PermissionDenied(_) => FailureKind::PermissionDenied,
            FsError::Unreadable(_) => FailureKind::Unreadable,
            FsError::DirectoryVanished(_) => FailureKind::DirectoryVanished,
            FsError::Unavailable(_) => FailureKind::Unavailable,
            FsError::NotSupported(_) => FailureKind::NotSupported,
            FsError::Busy(_) => FailureKind::Busy,
            FsError::Io { .. } | FsError::Other(_) => FailureKind::IoFailure,
        }
    }
}

impl From<DomainError> for FsError {
    fn from(err: DomainError) -> Self {
        FsError::invalid_name(err)
    }
}

impl From<FsError> for OperationOutcome {
    fn from(err: FsError) -> Self {
        OperationOutcome::failure(err.kind(), err.to_string())
    }
}
