use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use filemgr_capabilities::{
    DirectStorage, DirectoryLister, EngineOptions, FileOperationEngine, FsError,
};
use filemgr_core::domain::{EntryKind, OperationOutcome, OperationRequest};
use tracing::debug;

use crate::EXIT_ABORTED;
use crate::commands::{CliArgs, Commands};

/// 命令执行所需的根目录与引擎。
pub struct Workspace {
    root: PathBuf,
    engine: FileOperationEngine,
    lister: DirectoryLister,
}

impl Workspace {
    pub fn new(root: PathBuf, options: EngineOptions) -> Self {
        Self {
            root,
            engine: FileOperationEngine::new(Arc::new(DirectStorage::new()), options),
            lister: DirectoryLister::new(),
        }
    }

    /// 根据命令行参数构建；未指定根目录时使用当前目录。
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let root = match &args.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("failed to determine current directory")?,
        };
        let options = EngineOptions {
            file_extension: args.extension.clone(),
            file_template: args.template.clone(),
        };
        Ok(Self::new(root, options))
    }

    /// 相对路径按根目录解析。
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// 执行一条命令，返回进程退出码。
pub fn run<W: Write, R: BufRead>(
    workspace: &Workspace,
    command: &Commands,
    out: &mut W,
    input: &mut R,
) -> Result<i32> {
    debug!(?command, root = %workspace.root.display(), "running command");

    match command {
        Commands::Ls { path } => {
            let path = workspace.resolve(path);
            match workspace.lister.list(&path) {
                Ok(listing) => {
                    for entry in &listing {
                        match entry.kind() {
                            EntryKind::Directory => writeln!(out, "{}/", entry.name())?,
                            EntryKind::File => writeln!(out, "{}", entry.name())?,
                        }
                    }
                    Ok(0)
                }
                Err(err) => Ok(report(&err)),
            }
        }
        Commands::Mkdir { name, parent } => {
            let request = OperationRequest::CreateFolder {
                parent: workspace.resolve(parent),
                name: name.clone(),
            };
            submit(workspace, &request, out)
        }
        Commands::Touch { name, parent } => {
            let request = OperationRequest::CreateFile {
                parent: workspace.resolve(parent),
                name: name.clone(),
            };
            submit(workspace, &request, out)
        }
        Commands::Rename { path, new_name } => {
            let request = OperationRequest::Rename {
                path: workspace.resolve(path),
                new_name: new_name.clone(),
            };
            submit(workspace, &request, out)
        }
        Commands::Copy { source, dest_dir } => {
            let request = OperationRequest::Copy {
                source: workspace.resolve(source),
                dest_dir: workspace.resolve(dest_dir),
            };
            submit(workspace, &request, out)
        }
        Commands::Delete { path, yes } => {
            let path = workspace.resolve(path);
            if !*yes && !confirm(&path, out, input)? {
                writeln!(out, "aborted")?;
                return Ok(EXIT_ABORTED);
            }
            submit(workspace, &OperationRequest::Delete { path }, out)
        }
        Commands::Cat { path } => match workspace.engine.read_text(&workspace.resolve(path)) {
            Ok(content) => {
                write!(out, "{content}")?;
                Ok(0)
            }
            Err(err) => Ok(report(&err)),
        },
        Commands::View { path } => {
            match workspace.engine.resolve_viewable_uri(&workspace.resolve(path)) {
                Ok(view) => {
                    writeln!(out, "{}\t{}", view.uri, view.mime)?;
                    Ok(0)
                }
                Err(err) => Ok(report(&err)),
            }
        }
    }
}

fn submit<W: Write>(workspace: &Workspace, request: &OperationRequest, out: &mut W) -> Result<i32> {
    let outcome = workspace.engine.execute(request);
    match &outcome {
        OperationOutcome::Success { path } => writeln!(out, "{}", path.display())?,
        OperationOutcome::Failure { reason, message } => {
            eprintln!("error [{}]: {message}", reason.code());
        }
    }
    Ok(outcome.exit_code())
}

fn report(err: &FsError) -> i32 {
    let kind = err.kind();
    eprintln!("error [{}]: {err}", kind.code());
    kind.exit_code()
}

fn confirm<W: Write, R: BufRead>(path: &Path, out: &mut W, input: &mut R) -> Result<bool> {
    write!(out, "Delete {}? [y/N] ", path.display())?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
