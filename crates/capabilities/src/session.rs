//! 浏览会话。
//!
//! 会话持有一个游标并共享文件操作引擎。所有阻塞的文件系统调用都放到
//! tokio 的阻塞线程池中执行，结果以 future 的形式返回，避免阻塞交互线程。

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use filemgr_core::domain::{DirectoryListing, OperationOutcome, OperationRequest, SessionId};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::cursor::{CursorState, NavigationCursor};
use crate::engine::FileOperationEngine;
use crate::error::{FsError, Result};

/// 在阻塞线程池中执行文件系统调用。
pub async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .context("blocking filesystem task did not complete")?
}

/// 一次提交的结果；操作修改了当前目录时附带刷新后的快照。
#[derive(Debug, Clone)]
pub struct SubmitResult {
    pub outcome: OperationOutcome,
    pub listing: Option<DirectoryListing>,
}

pub struct BrowsingSession {
    id: SessionId,
    cursor: Arc<AsyncMutex<NavigationCursor>>,
    engine: Arc<FileOperationEngine>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl BrowsingSession {
    pub fn new(cursor: NavigationCursor, engine: Arc<FileOperationEngine>) -> Self {
        let id = SessionId::new();
        info!(session_id = %id, root = %cursor.root_path().display(), "browsing session created");
        Self {
            id,
            cursor: Arc::new(AsyncMutex::new(cursor)),
            engine,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn engine(&self) -> &Arc<FileOperationEngine> {
        &self.engine
    }

    pub async fn current_path(&self) -> PathBuf {
        self.cursor.lock().await.current().to_path_buf()
    }

    pub async fn root_path(&self) -> PathBuf {
        self.cursor.lock().await.root_path().to_path_buf()
    }

    pub async fn state(&self) -> CursorState {
        self.cursor.lock().await.state()
    }

    /// 刷新并返回当前目录快照。
    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn refresh(&self) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        run_blocking(move || cursor.refresh()).await
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn enter(&self, name: &str) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        let name = name.to_string();
        run_blocking(move || cursor.enter(&name)).await
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn up(&self) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        run_blocking(move || cursor.up()).await
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn root(&self) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        run_blocking(move || cursor.root()).await
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn recover(&self) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        run_blocking(move || cursor.recover()).await
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub async fn set_directory(&self, path: &Path) -> Result<DirectoryListing> {
        let mut cursor = self.cursor.clone().lock_owned().await;
        let path = path.to_path_buf();
        run_blocking(move || cursor.set_directory(&path)).await
    }

    /// 提交一次文件操作。
    ///
    /// 涉及的路径上已有未完成的操作时立即返回 `Busy`。操作成功且修改了当前目录时
    /// 会自动刷新游标。
    #[tracing::instrument(skip(self, request), fields(session_id = %self.id, operation = request.label()))]
    pub async fn submit(&self, request: OperationRequest) -> SubmitResult {
        let claim_paths = self.engine.claim_paths(&request);
        let _claim = match InFlightClaim::acquire(&self.in_flight, claim_paths) {
            Ok(claim) => claim,
            Err(err) => {
                warn!(error = %err, "rejected duplicate submission");
                return SubmitResult {
                    outcome: err.into(),
                    listing: None,
                };
            }
        };

        let engine = self.engine.clone();
        let task_request = request.clone();
        let outcome = match run_blocking(move || engine.run(&task_request)).await {
            Ok(path) => OperationOutcome::success(path),
            Err(err) => {
                warn!(error = %err, "file operation failed");
                return SubmitResult {
                    outcome: err.into(),
                    listing: None,
                };
            }
        };

        let current = self.current_path().await;
        let listing = if request.affects(&current) {
            match self.refresh().await {
                Ok(listing) => Some(listing),
                Err(err) => {
                    warn!(error = %err, "refresh after operation failed");
                    None
                }
            }
        } else {
            None
        };

        SubmitResult { outcome, listing }
    }
}

/// 标记一组路径正在被操作，释放时自动移除。
struct InFlightClaim {
    registry: Arc<Mutex<HashSet<PathBuf>>>,
    paths: Vec<PathBuf>,
}

impl InFlightClaim {
    fn acquire(registry: &Arc<Mutex<HashSet<PathBuf>>>, paths: Vec<PathBuf>) -> Result<Self> {
        let mut active = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(busy) = paths.iter().find(|path| active.contains(*path)) {
            return Err(FsError::Busy(busy.display().to_string()));
        }

        active.extend(paths.iter().cloned());
        Ok(Self {
            registry: registry.clone(),
            paths,
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        let mut active = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for path in &self.paths {
            active.remove(path);
        }
    }
}
