use std::fmt;

/// 文件操作失败的分类。
///
/// 展示层根据分类决定提示文案以及是否提供重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidName,
    AlreadyExists,
    NotFound,
    NotADirectory,
    UnsupportedKind,
    PermissionDenied,
    Unreadable,
    DirectoryVanished,
    IoFailure,
    /// 存储访问层当前不可用。
    Unavailable,
    /// 存储访问层不支持该类文件。
    NotSupported,
    /// 同一路径上已有未完成的操作。
    Busy,
}

impl FailureKind {
    pub const ALL: [FailureKind; 12] = [
        FailureKind::InvalidName,
        FailureKind::AlreadyExists,
        FailureKind::NotFound,
        FailureKind::NotADirectory,
        FailureKind::UnsupportedKind,
        FailureKind::PermissionDenied,
        FailureKind::Unreadable,
        FailureKind::DirectoryVanished,
        FailureKind::IoFailure,
        FailureKind::Unavailable,
        FailureKind::NotSupported,
        FailureKind::Busy,
    ];

    /// 稳定的机器可读编码，用于 API 响应。
    pub fn code(self) -> &'static str {
        match self {
            FailureKind::InvalidName => "INVALID_NAME",
            FailureKind::AlreadyExists => "ALREADY_EXISTS",
            FailureKind::NotFound => "NOT_FOUND",
            FailureKind::NotADirectory => "NOT_A_DIRECTORY",
            FailureKind::UnsupportedKind => "UNSUPPORTED_KIND",
            FailureKind::PermissionDenied => "PERMISSION_DENIED",
            FailureKind::Unreadable => "UNREADABLE",
            FailureKind::DirectoryVanished => "DIRECTORY_VANISHED",
            FailureKind::IoFailure => "IO_FAILURE",
            FailureKind::Unavailable => "UNAVAILABLE",
            FailureKind::NotSupported => "NOT_SUPPORTED",
            FailureKind::Busy => "BUSY",
        }
    }

    /// 命令行进程退出码，每个分类各不相同且不与 0/1/2 冲突。
    pub fn exit_code(self) -> i32 {
        match self {
            FailureKind::InvalidName => 10,
            FailureKind::AlreadyExists => 11,
            FailureKind::NotFound => 12,
            FailureKind::NotADirectory => 13,
            FailureKind::UnsupportedKind => 14,
            FailureKind::PermissionDenied => 15,
            FailureKind::Unreadable => 16,
            FailureKind::DirectoryVanished => 17,
            FailureKind::IoFailure => 18,
            FailureKind::Unavailable => 19,
            FailureKind::NotSupported => 20,
            FailureKind::Busy => 21,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
