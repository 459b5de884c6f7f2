//! filemgr 命令行展示层。

pub mod commands;
pub mod handlers;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 用户拒绝确认时的退出码。
pub const EXIT_ABORTED: i32 = 1;
