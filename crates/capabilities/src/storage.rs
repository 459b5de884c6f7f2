//! 存储访问抽象。
//!
//! 文件操作引擎只依赖 [`StorageAccess`]：创建文件时先拿到可写句柄，写完后提交。
//! [`DirectStorage`] 直接按路径创建文件；[`MediatedStorage`] 模拟由平台代理的
//! 存储访问，只允许写入已授权的目录，并且在提交前不会让文件可见。

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{FsError, Result};

/// 待创建文件的描述。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub parent: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl WriteTarget {
    pub fn new(parent: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            parent: parent.into(),
            file_name,
            mime,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.file_name)
    }
}

/// 可交给外部查看器打开的地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewableUri {
    pub uri: String,
    pub mime: String,
}

/// 可写句柄；只有调用 `commit` 后写入的内容才算创建成功。
///
/// 未提交就被丢弃的句柄必须撤销自己留下的文件。
pub trait WritableHandle: Write + Send {
    fn commit(self: Box<Self>) -> Result<PathBuf>;
}

/// 存储访问能力接口。
pub trait StorageAccess: Send + Sync {
    /// 后端名称，用于日志。
    fn name(&self) -> &str;

    /// 为目标文件打开可写句柄。
    ///
    /// 失败分类：`PermissionDenied`、`Unavailable`、`AlreadyExists`、`NotFound`。
    fn open_writable(&self, target: &WriteTarget) -> Result<Box<dyn WritableHandle>>;

    /// 解析可供查看器打开的地址；不支持的文件类型返回 `NotSupported`。
    fn resolve_viewable_uri(&self, path: &Path) -> Result<ViewableUri>;
}

/// 直接访问本地文件系统。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectStorage;

impl DirectStorage {
    pub fn new() -> Self {
        Self
    }
}

struct DirectHandle {
    file: Option<File>,
    path: PathBuf,
}

impl Write for DirectHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("handle already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl WritableHandle for DirectHandle {
    fn commit(mut self: Box<Self>) -> Result<PathBuf> {
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|err| FsError::io(&self.path, err))?;
        }
        Ok(self.path.clone())
    }
}

impl Drop for DirectHandle {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "discarding uncommitted file");
            let _ = fs::remove_file(&self.path);
        }
    }
}

impl StorageAccess for DirectStorage {
    fn name(&self) -> &str {
        "direct"
    }

    fn open_writable(&self, target: &WriteTarget) -> Result<Box<dyn WritableHandle>> {
        let path = target.path();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| FsError::io(&path, err))?;

        Ok(Box::new(DirectHandle {
            file: Some(file),
            path,
        }))
    }

    fn resolve_viewable_uri(&self, path: &Path) -> Result<ViewableUri> {
        let mime = viewable_mime(path)?;
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|err| FsError::io(path, err))?
                .join(path)
        };

        Ok(ViewableUri {
            uri: format!("file://{}", encode_path(&absolute)),
            mime,
        })
    }
}

/// 由平台代理的存储访问。
///
/// 仅允许访问授权目录之内的路径；授权目录不存在时整个后端视为不可用。
/// 写入先落在目标目录中的临时文件里，提交时以不覆盖的方式发布。
#[derive(Debug, Clone)]
pub struct MediatedStorage {
    authority: String,
    grants: Vec<PathBuf>,
}

impl MediatedStorage {
    pub fn new(authority: impl Into<String>, grants: Vec<PathBuf>) -> Self {
        Self {
            authority: authority.into(),
            grants,
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn grants(&self) -> &[PathBuf] {
        &self.grants
    }

    fn grant_for(&self, path: &Path) -> Result<&Path> {
        let escapes = path
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        let grant = self
            .grants
            .iter()
            .find(|grant| !escapes && path.starts_with(grant))
            .ok_or_else(|| FsError::PermissionDenied(path.display().to_string()))?;

        if !grant.is_dir() {
            return Err(FsError::Unavailable(grant.display().to_string()));
        }

        Ok(grant)
    }
}

struct MediatedHandle {
    pending: NamedTempFile,
    dest: PathBuf,
}

impl Write for MediatedHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.pending.flush()
    }
}

impl WritableHandle for MediatedHandle {
    fn commit(self: Box<Self>) -> Result<PathBuf> {
        let MediatedHandle { pending, dest } = *self;
        pending
            .as_file()
            .sync_all()
            .map_err(|err| FsError::io(&dest, err))?;
        pending
            .persist_noclobber(&dest)
            .map_err(|err| FsError::io(&dest, err.error))?;

        info!(path = %dest.display(), "published pending file");
        Ok(dest)
    }
}

impl StorageAccess for MediatedStorage {
    fn name(&self) -> &str {
        "mediated"
    }

    fn open_writable(&self, target: &WriteTarget) -> Result<Box<dyn WritableHandle>> {
        self.grant_for(&target.parent)?;

        let metadata = fs::metadata(&target.parent).map_err(|err| FsError::io(&target.parent, err))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(target.parent.display().to_string()));
        }

        let dest = target.path();
        if fs::symlink_metadata(&dest).is_ok() {
            return Err(FsError::AlreadyExists(dest.display().to_string()));
        }

        let pending = tempfile::Builder::new()
            .prefix(".pending-")
            .suffix(".part")
            .tempfile_in(&target.parent)
            .map_err(|err| FsError::io(&target.parent, err))?;

        debug!(dest = %dest.display(), mime = %target.mime, "opened pending file");
        Ok(Box::new(MediatedHandle { pending, dest }))
    }

    fn resolve_viewable_uri(&self, path: &Path) -> Result<ViewableUri> {
        let grant = self.grant_for(path)?;
        let mime = viewable_mime(path)?;
        let relative = path.strip_prefix(grant).unwrap_or(path);

        Ok(ViewableUri {
            uri: format!("content://{}/{}", self.authority, encode_path(relative)),
            mime,
        })
    }
}

/// 只有文本与图片可以交给查看器打开。
fn viewable_mime(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|err| FsError::io(path, err))?;
    if metadata.is_dir() {
        return Err(FsError::NotSupported(path.display().to_string()));
    }

    let mime = mime_guess::from_path(path)
        .first()
        .filter(|mime| matches!(mime.type_().as_str(), "text" | "image"))
        .ok_or_else(|| FsError::NotSupported(path.display().to_string()))?;

    Ok(mime.essence_str().to_string())
}

fn encode_path(path: &Path) -> String {
    let encoded: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(urlencoding::encode(&part.to_string_lossy()).into_owned()),
            _ => None,
        })
        .collect();
    let joined = encoded.join("/");

    if path.has_root() {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filemgr_core::domain::FailureKind;
    use tempfile::TempDir;

    #[test]
    fn direct_handle_creates_file_on_commit() {
        let temp = TempDir::new().expect("temp dir should be created");
        let target = WriteTarget::new(temp.path(), "note.txt");
        assert_eq!(target.mime, "text/plain");

        let mut handle = DirectStorage::new()
            .open_writable(&target)
            .expect("handle should open");
        handle.write_all(b"hi").expect("write should succeed");
        let path = handle.commit().expect("commit should succeed");

        assert_eq!(fs::read_to_string(path).expect("read back"), "hi");
    }

    #[test]
    fn direct_handle_dropped_without_commit_leaves_nothing() {
        let temp = TempDir::new().expect("temp dir should be created");
        let target = WriteTarget::new(temp.path(), "note.txt");

        let handle = DirectStorage::new()
            .open_writable(&target)
            .expect("handle should open");
        drop(handle);

        assert!(!target.path().exists());
    }

    #[test]
    fn direct_open_refuses_existing_file() {
        let temp = TempDir::new().expect("temp dir should be created");
        fs::write(temp.path().join("note.txt"), "old").expect("write file");

        let err = DirectStorage::new()
            .open_writable(&WriteTarget::new(temp.path(), "note.txt"))
            .err()
            .expect("existing file should be refused");
        assert_eq!(err.kind(), FailureKind::AlreadyExists);
        assert_eq!(
            fs::read_to_string(temp.path().join("note.txt")).expect("read back"),
            "old"
        );
    }

    #[test]
    fn direct_uri_only_for_text_and_images() {
        let temp = TempDir::new().expect("temp dir should be created");
        let text = temp.path().join("my notes.txt");
        let image = temp.path().join("photo.png");
        let binary = temp.path().join("blob.bin");
        for path in [&text, &image, &binary] {
            fs::write(path, "x").expect("write file");
        }

        let storage = DirectStorage::new();
        let uri = storage.resolve_viewable_uri(&text).expect("text is viewable");
        assert!(uri.uri.starts_with("file:///"));
        assert!(uri.uri.ends_with("my%20notes.txt"));
        assert_eq!(uri.mime, "text/plain");

        let uri = storage.resolve_viewable_uri(&image).expect("image is viewable");
        assert_eq!(uri.mime, "image/png");

        let err = storage
            .resolve_viewable_uri(&binary)
            .expect_err("binary is not viewable");
        assert_eq!(err.kind(), FailureKind::NotSupported);

        let err = storage
            .resolve_viewable_uri(temp.path())
            .expect_err("directory is not viewable");
        assert_eq!(err.kind(), FailureKind::NotSupported);
    }

    #[test]
    fn mediated_rejects_paths_outside_grants() {
        let granted = TempDir::new().expect("granted dir");
        let other = TempDir::new().expect("other dir");
        let storage = MediatedStorage::new("filemgr.provider", vec![granted.path().to_path_buf()]);

        let err = storage
            .open_writable(&WriteTarget::new(other.path(), "x.txt"))
            .err()
            .expect("outside grant should be denied");
        assert_eq!(err.kind(), FailureKind::PermissionDenied);

        let sneaky = granted.path().join("..").join("x");
        let err = storage
            .open_writable(&WriteTarget::new(sneaky, "x.txt"))
            .err()
            .expect("parent traversal should be denied");
        assert_eq!(err.kind(), FailureKind::PermissionDenied);
    }

    #[test]
    fn mediated_handle_is_invisible_until_commit() {
        let granted = TempDir::new().expect("granted dir");
        let storage = MediatedStorage::new("filemgr.provider", vec![granted.path().to_path_buf()]);
        let target = WriteTarget::new(granted.path(), "draft.txt");

        let mut handle = storage.open_writable(&target).expect("handle should open");
        handle.write_all(b"pending").expect("write should succeed");
        assert!(!target.path().exists());

        let path = handle.commit().expect("commit should succeed");
        assert_eq!(fs::read_to_string(path).expect("read back"), "pending");

        let leftovers: Vec<_> = fs::read_dir(granted.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn mediated_backend_unavailable_when_grant_removed() {
        let granted = TempDir::new().expect("granted dir");
        let grant = granted.path().join("Documents");
        let storage = MediatedStorage::new("filemgr.provider", vec![grant.clone()]);

        let err = storage
            .open_writable(&WriteTarget::new(&grant, "x.txt"))
            .err()
            .expect("missing grant should be unavailable");
        assert_eq!(err.kind(), FailureKind::Unavailable);
    }

    #[test]
    fn mediated_uri_is_relative_to_grant() {
        let granted = TempDir::new().expect("granted dir");
        fs::create_dir(granted.path().join("pics")).expect("create dir");
        let image = granted.path().join("pics").join("cat.jpg");
        fs::write(&image, "x").expect("write file");

        let storage = MediatedStorage::new("filemgr.provider", vec![granted.path().to_path_buf()]);
        let uri = storage.resolve_viewable_uri(&image).expect("image is viewable");

        assert_eq!(uri.uri, "content://filemgr.provider/pics/cat.jpg");
        assert_eq!(uri.mime, "image/jpeg");
    }
}
