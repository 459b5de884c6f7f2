//! 目录快照。
//!
//! 只列出直接子项，不递归。

use std::fs;
use std::path::Path;

use filemgr_core::domain::{DirectoryListing, Entry, EntryKind};
use tracing::{debug, warn};

use crate::error::{FsError, Result};

/// 目录列举器，无状态、无副作用。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLister;

impl DirectoryLister {
    pub fn new() -> Self {
        Self
    }

    /// 列出目录的直接子项。
    ///
    /// 路径不是目录时返回 `NotADirectory`；路径不存在或无法打开时返回 `Unreadable`。
    /// 逐项读取时出现的错误只记录日志并跳过，不会让整次列举失败。
    pub fn list(&self, path: &Path) -> Result<DirectoryListing> {
        match fs::metadata(path) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(FsError::NotADirectory(path.display().to_string()));
            }
            Ok(_) => {}
            Err(err) => {
                debug!(path = %path.display(), error = %err, "directory metadata unavailable");
                return Err(FsError::Unreadable(path.display().to_string()));
            }
        }

        let read_dir = fs::read_dir(path).map_err(|err| {
            warn!(path = %path.display(), error = %err, "failed to open directory");
            FsError::Unreadable(path.display().to_string())
        })?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            let name = item.file_name().to_string_lossy().into_owned();
            let child = item.path();
            // 跟随链接判断类型；悬空链接视为文件。
            let kind = match fs::metadata(&child) {
                Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
                Ok(_) => EntryKind::File,
                Err(err) if fs::symlink_metadata(&child).is_ok() => {
                    debug!(path = %child.display(), error = %err, "treating unresolved link as file");
                    EntryKind::File
                }
                Err(err) => {
                    debug!(path = %child.display(), error = %err, "entry vanished during listing");
                    continue;
                }
            };

            entries.push(Entry::new(name, kind));
        }

        debug!(path = %path.display(), count = entries.len(), "listed directory");
        Ok(DirectoryListing::new(path, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_immediate_children_only() {
        let temp = TempDir::new().expect("temp dir should be created");
        fs::create_dir(temp.path().join("docs")).expect("create docs");
        fs::create_dir(temp.path().join("docs").join("nested")).expect("create nested");
        fs::write(temp.path().join("hello.txt"), "hello").expect("write file");
        fs::write(temp.path().join("docs").join("inner.txt"), "x").expect("write inner");

        let listing = DirectoryLister::new()
            .list(temp.path())
            .expect("listing should succeed");

        assert_eq!(listing.len(), 2);
        assert!(listing.contains("docs", EntryKind::Directory));
        assert!(listing.contains("hello.txt", EntryKind::File));
        assert!(listing.find("nested").is_none());
        assert!(listing.find("inner.txt").is_none());
    }

    #[test]
    fn empty_directory_yields_empty_listing() {
        let temp = TempDir::new().expect("temp dir should be created");
        let listing = DirectoryLister::new()
            .list(temp.path())
            .expect("listing should succeed");

        assert!(listing.is_empty());
        assert_eq!(listing.path(), temp.path());
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let temp = TempDir::new().expect("temp dir should be created");
        let file = temp.path().join("plain.txt");
        fs::write(&file, "x").expect("write file");

        let err = DirectoryLister::new()
            .list(&file)
            .expect_err("listing a file should fail");
        assert!(matches!(err, FsError::NotADirectory(_)));
    }

    #[test]
    fn missing_path_is_unreadable() {
        let temp = TempDir::new().expect("temp dir should be created");
        let err = DirectoryLister::new()
            .list(&temp.path().join("missing"))
            .expect_err("listing a missing path should fail");
        assert!(matches!(err, FsError::Unreadable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_listed_as_file() {
        let temp = TempDir::new().expect("temp dir should be created");
        std::os::unix::fs::symlink(temp.path().join("nowhere"), temp.path().join("dangling"))
            .expect("create symlink");

        let listing = DirectoryLister::new()
            .list(temp.path())
            .expect("listing should succeed");
        assert!(listing.contains("dangling", EntryKind::File));
    }

    #[test]
    fn repeated_reads_keep_order() {
        let temp = TempDir::new().expect("temp dir should be created");
        for name in ["b", "A", "c", "D"] {
            fs::write(temp.path().join(name), "").expect("write file");
        }

        let lister = DirectoryLister::new();
        let first = lister.list(temp.path()).expect("first listing");
        let second = lister.list(temp.path()).expect("second listing");
        assert_eq!(first.names(), second.names());
    }
}
