//! 文件操作引擎。
//!
//! 每种操作执行一次并返回类型化的结果，不做自动重试。成功修改当前目录后，
//! 由调用方负责刷新游标。

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filemgr_core::domain::{EntryName, OperationOutcome, OperationRequest};
use tracing::{debug, info, warn};

use crate::error::{FsError, Result};
use crate::storage::{DirectStorage, StorageAccess, ViewableUri, WriteTarget};

/// 引擎可配置项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// 新建文件时追加的扩展名。
    pub file_extension: String,
    /// 新建文件的初始内容，`None` 表示空文件。
    pub file_template: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            file_extension: "txt".to_string(),
            file_template: None,
        }
    }
}

#[derive(Clone)]
pub struct FileOperationEngine {
    storage: Arc<dyn StorageAccess>,
    options: EngineOptions,
}

impl FileOperationEngine {
    pub fn new(storage: Arc<dyn StorageAccess>, options: EngineOptions) -> Self {
        info!(
            storage = storage.name(),
            file_extension = %options.file_extension,
            "initializing file operation engine"
        );
        Self { storage, options }
    }

    /// 使用直接文件系统后端和默认选项。
    pub fn direct() -> Self {
        Self::new(Arc::new(DirectStorage::new()), EngineOptions::default())
    }

    pub fn storage(&self) -> &dyn StorageAccess {
        self.storage.as_ref()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// 执行请求并把结果折叠为 [`OperationOutcome`]。
    pub fn execute(&self, request: &OperationRequest) -> OperationOutcome {
        match self.run(request) {
            Ok(path) => OperationOutcome::success(path),
            Err(err) => {
                warn!(operation = request.label(), error = %err, "file operation failed");
                err.into()
            }
        }
    }

    /// 执行请求，成功时返回受影响的路径。
    pub fn run(&self, request: &OperationRequest) -> Result<PathBuf> {
        match request {
            OperationRequest::CreateFolder { parent, name } => self.create_folder(parent, name),
            OperationRequest::CreateFile { parent, name } => self.create_file(parent, name),
            OperationRequest::Rename { path, new_name } => self.rename(path, new_name),
            OperationRequest::Copy { source, dest_dir } => self.copy(source, dest_dir),
            OperationRequest::Delete { path } => self.delete(path),
        }
    }

    /// 请求执行期间占用的路径；新建文件按扩展名规则计算最终名称。
    pub fn claim_paths(&self, request: &OperationRequest) -> Vec<PathBuf> {
        match request {
            OperationRequest::CreateFile { parent, name } => match EntryName::new(name) {
                Ok(name) => {
                    let name = name.with_extension(&self.options.file_extension);
                    vec![parent.join(name.as_str())]
                }
                Err(_) => request.target_paths(),
            },
            _ => request.target_paths(),
        }
    }

    pub fn create_folder(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        let name = EntryName::new(name)?;
        ensure_directory(parent)?;

        let target = parent.join(name.as_str());
        ensure_vacant(&target)?;

        fs::create_dir(&target).map_err(|err| FsError::io(&target, err))?;
        info!(path = %target.display(), "created folder");
        Ok(target)
    }

    /// 创建文件，名称会追加配置的扩展名。
    ///
    /// 文件通过存储访问层的可写句柄创建；写入模板失败时句柄被丢弃，不留下文件。
    pub fn create_file(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        let name = EntryName::new(name)?.with_extension(&self.options.file_extension);
        ensure_directory(parent)?;

        let target = WriteTarget::new(parent, name.into_inner());
        ensure_vacant(&target.path())?;

        let mut handle = self.storage.open_writable(&target)?;
        if let Some(template) = &self.options.file_template {
            handle
                .write_all(template.as_bytes())
                .and_then(|()| handle.flush())
                .map_err(|err| FsError::io(&target.path(), err))?;
        }
        let path = handle.commit()?;

        info!(path = %path.display(), storage = self.storage.name(), "created file");
        Ok(path)
    }

    /// 在同一父目录内修改条目名称。
    pub fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let new_name = EntryName::new(new_name)?;
        fs::symlink_metadata(path).map_err(|err| FsError::io(path, err))?;

        let parent = path
            .parent()
            .ok_or_else(|| FsError::UnsupportedKind(path.display().to_string()))?;
        let target = parent.join(new_name.as_str());

        if target == path {
            debug!(path = %path.display(), "rename to the same name is a no-op");
            return Ok(target);
        }
        ensure_vacant(&target)?;

        fs::rename(path, &target).map_err(|err| FsError::io(path, err))?;
        info!(from = %path.display(), to = %target.display(), "renamed entry");
        Ok(target)
    }

    /// 将文件复制到目标目录，目录不支持复制。
    ///
    /// 内容先写入目标目录中的临时文件并落盘，再以不覆盖的方式发布为最终名称；
    /// 任何一步失败都会删除临时文件。
    pub fn copy(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let source_meta = fs::metadata(source).map_err(|err| FsError::io(source, err))?;
        let dest_meta = fs::metadata(dest_dir).map_err(|err| FsError::io(dest_dir, err))?;
        if !dest_meta.is_dir() {
            return Err(FsError::NotADirectory(dest_dir.display().to_string()));
        }
        if source_meta.is_dir() {
            return Err(FsError::UnsupportedKind(source.display().to_string()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| FsError::InvalidName(source.display().to_string()))?;
        ensure_vacant(&dest_dir.join(file_name))?;

        let mut reader = File::open(source).map_err(|err| FsError::io(source, err))?;
        let target = publish_copy(&mut reader, dest_dir, file_name)?;

        info!(
            source = %source.display(),
            dest = %target.display(),
            bytes = source_meta.len(),
            "copied file"
        );
        Ok(target)
    }

    /// 删除文件或空目录，非空目录返回 `UnsupportedKind`。
    pub fn delete(&self, path: &Path) -> Result<PathBuf> {
        let metadata = fs::symlink_metadata(path).map_err(|err| FsError::io(path, err))?;

        if metadata.is_dir() {
            let mut children = fs::read_dir(path).map_err(|err| FsError::io(path, err))?;
            if children.next().is_some() {
                return Err(FsError::UnsupportedKind(path.display().to_string()));
            }
            fs::remove_dir(path).map_err(|err| FsError::io(path, err))?;
        } else {
            fs::remove_file(path).map_err(|err| FsError::io(path, err))?;
        }

        info!(path = %path.display(), "deleted entry");
        Ok(path.to_path_buf())
    }

    /// 以文本方式读取文件内容，非法 UTF-8 序列会被替换。
    pub fn read_text(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|err| FsError::io(path, err))?;
        if metadata.is_dir() {
            return Err(FsError::UnsupportedKind(path.display().to_string()));
        }

        let bytes = fs::read(path).map_err(|err| FsError::io(path, err))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn resolve_viewable_uri(&self, path: &Path) -> Result<ViewableUri> {
        self.storage.resolve_viewable_uri(path)
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

fn ensure_vacant(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(FsError::AlreadyExists(path.display().to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(FsError::io(path, err)),
    }
}

fn publish_copy(reader: &mut impl Read, dest_dir: &Path, file_name: &OsStr) -> Result<PathBuf> {
    let target = dest_dir.join(file_name);
    let mut staging = tempfile::Builder::new()
        .prefix(".filemgr-copy-")
        .suffix(".part")
        .tempfile_in(dest_dir)
        .map_err(|err| FsError::io(dest_dir, err))?;

    io::copy(reader, &mut staging).map_err(|err| FsError::Io {
        path: target.display().to_string(),
        source: err,
    })?;
    staging
        .as_file()
        .sync_all()
        .map_err(|err| FsError::io(&target, err))?;
    staging
        .persist_noclobber(&target)
        .map_err(|err| FsError::io(&target, err.error))?;

    Ok(target)
}
