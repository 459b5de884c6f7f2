use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use filemgr_capabilities::session::run_blocking;
use filemgr_capabilities::{BrowsingSession, FileOperationEngine, NavigationCursor, Result};
use filemgr_core::domain::{DirectoryListing, SessionId};
use tokio::sync::RwLock;
use tracing::info;

/// 浏览会话登记表，允许多个相互独立的会话同时存在。
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<BrowsingSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在根目录创建会话并返回根目录快照。
    #[tracing::instrument(skip(self, engine))]
    pub async fn create(
        &self,
        root: PathBuf,
        engine: Arc<FileOperationEngine>,
    ) -> Result<(Arc<BrowsingSession>, DirectoryListing)> {
        let cursor = run_blocking(move || NavigationCursor::new(root)).await?;
        let session = Arc::new(BrowsingSession::new(cursor, engine));
        let listing = session.refresh().await?;

        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        info!(session_id = %session.id(), "session registered");

        Ok((session, listing))
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<BrowsingSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn close(&self, id: &SessionId) -> Option<Arc<BrowsingSession>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            info!(session_id = %id, "session closed");
        }
        removed
    }
}
