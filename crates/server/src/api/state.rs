//! 统一的应用状态。

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use filemgr_capabilities::{DirectoryLister, FileOperationEngine, FsError};

use crate::config::ServerConfig;
use crate::registry::SessionRegistry;

/// 统一的应用状态，包含所有服务共享的数据。
pub struct AppState {
    /// 浏览根目录，所有请求路径都必须位于其中。
    pub root: PathBuf,
    /// 文件操作引擎。
    pub engine: Arc<FileOperationEngine>,
    /// 目录列举器。
    pub lister: DirectoryLister,
    /// 浏览会话。
    pub sessions: SessionRegistry,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(root: PathBuf, engine: FileOperationEngine) -> Self {
        Self {
            root,
            engine: Arc::new(engine),
            lister: DirectoryLister::new(),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.root()?, config.build_engine()?))
    }

    /// 将客户端传入的路径解析到根目录之内；相对路径按根目录解析。
    pub fn confine(&self, raw: &str) -> Result<PathBuf, FsError> {
        let path = Path::new(raw);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let escapes = resolved
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        if escapes || !resolved.starts_with(&self.root) {
            return Err(FsError::PermissionDenied(raw.to_string()));
        }

        Ok(resolved)
    }

    /// 解析将被改名或删除的条目路径；根目录本身不能作为操作对象。
    pub fn confine_entry(&self, raw: &str) -> Result<PathBuf, FsError> {
        let resolved = self.confine(raw)?;
        if resolved == self.root {
            return Err(FsError::PermissionDenied(raw.to_string()));
        }
        Ok(resolved)
    }
}
