//! filemgr 文件系统能力。
//!
//! 提供目录快照、当前目录游标、文件操作引擎以及存储访问抽象，
//! 供 HTTP 服务与命令行工具作为展示层调用。

pub mod cursor;
pub mod engine;
pub mod error;
pub mod lister;
pub mod session;
pub mod storage;

pub use cursor::{CursorState, NavigationCursor};
pub use engine::{EngineOptions, FileOperationEngine};
pub use error::{FsError, Result};
pub use lister::DirectoryLister;
pub use session::{BrowsingSession, SubmitResult};
pub use storage::{
    DirectStorage, MediatedStorage, StorageAccess, ViewableUri, WritableHandle, WriteTarget,
};
