//! 当前目录游标。
//!
//! 每个浏览会话持有一个游标。游标只在显式的进入、返回上级、回到根目录、
//! 设置目录或恢复操作中改变，并且总是先拿到新目录的快照再提交路径，
//! 不会出现半更新状态。

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filemgr_core::domain::{DirectoryListing, EntryName};
use tracing::{debug, info, warn};

use crate::error::{FsError, Result};
use crate::lister::DirectoryLister;

/// 游标状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// 指向一个有效目录。
    AtDirectory,
    /// 刷新时发现当前目录已不存在，需要调用方选择回退策略。
    Vanished,
}

#[derive(Debug, Clone)]
pub struct NavigationCursor {
    root: PathBuf,
    current: PathBuf,
    state: CursorState,
    lister: DirectoryLister,
}

impl NavigationCursor {
    /// 以给定根目录创建游标，根目录必须是可读目录。
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let lister = DirectoryLister::new();
        lister.list(&root)?;

        info!(root = %root.display(), "navigation cursor created");
        Ok(Self {
            current: root.clone(),
            root,
            state: CursorState::AtDirectory,
            lister,
        })
    }

    /// 以用户主目录为根目录创建游标。
    pub fn at_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| FsError::Unavailable("home directory".to_string()))?;
        Self::new(home)
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// 进入当前目录下名为 `name` 的子目录。
    pub fn enter(&mut self, name: &str) -> Result<DirectoryListing> {
        if self.state == CursorState::Vanished {
            return Err(FsError::DirectoryVanished(self.current.display().to_string()));
        }

        let name = EntryName::new(name)?;
        let target = self.current.join(name.as_str());
        ensure_directory(&target)?;

        let listing = self.lister.list(&target)?;
        debug!(from = %self.current.display(), to = %target.display(), "entered directory");
        self.commit(target);
        Ok(listing)
    }

    /// 返回上级目录；已在根目录时停留在根目录。
    pub fn up(&mut self) -> Result<DirectoryListing> {
        if self.current == self.root {
            debug!(root = %self.root.display(), "already at root");
            return self.root();
        }

        let parent = match self.current.parent() {
            Some(parent) if parent.starts_with(&self.root) => parent.to_path_buf(),
            _ => self.root.clone(),
        };

        let listing = self.lister.list(&parent)?;
        self.commit(parent);
        Ok(listing)
    }

    /// 跳转到根目录内的任意目录；相对路径按根目录解析。
    pub fn set_directory(&mut self, path: impl AsRef<Path>) -> Result<DirectoryListing> {
        let path = path.as_ref();
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let escapes = target
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        if escapes || !target.starts_with(&self.root) {
            return Err(FsError::PermissionDenied(target.display().to_string()));
        }

        ensure_directory(&target)?;
        let listing = self.lister.list(&target)?;
        self.commit(target);
        Ok(listing)
    }

    /// 重新读取当前目录。
    ///
    /// 当前目录已被删除或被替换为非目录时进入 `Vanished` 状态并返回
    /// `DirectoryVanished`，游标路径保持不变。
    pub fn refresh(&mut self) -> Result<DirectoryListing> {
        match fs::metadata(&self.current) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(self.mark_vanished()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(self.mark_vanished()),
            Err(err) => return Err(FsError::io(&self.current, err)),
        }

        let listing = self.lister.list(&self.current)?;
        self.state = CursorState::AtDirectory;
        Ok(listing)
    }

    /// 回到根目录。
    pub fn root(&mut self) -> Result<DirectoryListing> {
        let listing = self.lister.list(&self.root)?;
        self.commit(self.root.clone());
        Ok(listing)
    }

    /// 从当前路径向根目录回溯，移动到最近的仍然存在的目录。
    pub fn recover(&mut self) -> Result<DirectoryListing> {
        let mut candidate = self.current.clone();
        loop {
            if candidate.is_dir() {
                if let Ok(listing) = self.lister.list(&candidate) {
                    info!(
                        from = %self.current.display(),
                        to = %candidate.display(),
                        "cursor recovered to existing ancestor"
                    );
                    self.commit(candidate);
                    return Ok(listing);
                }
            }

            if candidate == self.root {
                break;
            }

            candidate = match candidate.parent() {
                Some(parent) if parent.starts_with(&self.root) => parent.to_path_buf(),
                _ => self.root.clone(),
            };
        }

        warn!(root = %self.root.display(), "root directory is no longer readable");
        Err(FsError::Unreadable(self.root.display().to_string()))
    }

    fn commit(&mut self, path: PathBuf) {
        self.current = path;
        self.state = CursorState::AtDirectory;
    }

    fn mark_vanished(&mut self) -> FsError {
        warn!(path = %self.current.display(), "current directory vanished");
        self.state = CursorState::Vanished;
        FsError::DirectoryVanished(self.current.display().to_string())
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|err| FsError::io(path, err))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(FsError::NotADirectory(path.display().to_string()))
    }
}
