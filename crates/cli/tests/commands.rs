use std::fs;
use std::io::Cursor;
use std::path::Path;

use filemgr_capabilities::EngineOptions;
use filemgr_cli::EXIT_ABORTED;
use filemgr_cli::commands::Commands;
use filemgr_cli::handlers::{Workspace, run};
use filemgr_core::domain::FailureKind;
use tempfile::TempDir;

fn workspace(root: &Path) -> Workspace {
    Workspace::new(root.to_path_buf(), EngineOptions::default())
}

fn exec(workspace: &Workspace, command: Commands, answer: &str) -> (i32, String) {
    let mut out = Vec::new();
    let mut input = Cursor::new(answer.as_bytes().to_vec());
    let code = run(workspace, &command, &mut out, &mut input).expect("command should run");
    (code, String::from_utf8(out).expect("output should be utf-8"))
}

#[test]
fn ls_lists_directories_first() {
    let temp = TempDir::new().expect("temp dir should be created");
    fs::write(temp.path().join("a.txt"), "a").expect("write file");
    fs::create_dir(temp.path().join("zeta")).expect("create dir");
    let ws = workspace(temp.path());

    let (code, out) = exec(&ws, Commands::Ls { path: ".".into() }, "");

    assert_eq!(code, 0);
    assert_eq!(out, "zeta/\na.txt\n");
}

#[test]
fn notes_workflow() {
    let temp = TempDir::new().expect("temp dir should be created");
    let ws = workspace(temp.path());

    let (code, _) = exec(
        &ws,
        Commands::Mkdir {
            name: "notes".to_string(),
            parent: ".".into(),
        },
        "",
    );
    assert_eq!(code, 0);

    let (code, out) = exec(
        &ws,
        Commands::Touch {
            name: "draft".to_string(),
            parent: "notes".into(),
        },
        "",
    );
    assert_eq!(code, 0);
    assert!(out.trim_end().ends_with("draft.txt"));

    let (code, _) = exec(
        &ws,
        Commands::Rename {
            path: "notes/draft.txt".into(),
            new_name: "final".to_string(),
        },
        "",
    );
    assert_eq!(code, 0);

    let (_, out) = exec(&ws, Commands::Ls { path: "notes".into() }, "");
    assert_eq!(out, "final\n");

    let (code, _) = exec(
        &ws,
        Commands::Delete {
            path: "notes/final".into(),
            yes: true,
        },
        "",
    );
    assert_eq!(code, 0);
    assert!(!temp.path().join("notes/final").exists());
}

#[test]
fn failures_map_to_exit_codes() {
    let temp = TempDir::new().expect("temp dir should be created");
    fs::create_dir(temp.path().join("docs")).expect("create dir");
    let ws = workspace(temp.path());

    let (code, _) = exec(
        &ws,
        Commands::Mkdir {
            name: "docs".to_string(),
            parent: ".".into(),
        },
        "",
    );
    assert_eq!(code, FailureKind::AlreadyExists.exit_code());

    let (code, _) = exec(
        &ws,
        Commands::Rename {
            path: "missing".into(),
            new_name: "x".to_string(),
        },
        "",
    );
    assert_eq!(code, FailureKind::NotFound.exit_code());

    let (code, _) = exec(&ws, Commands::Cat { path: "missing.txt".into() }, "");
    assert_ne!(code, 0);
}

#[test]
fn delete_requires_confirmation() {
    let temp = TempDir::new().expect("temp dir should be created");
    fs::write(temp.path().join("keep.txt"), "data").expect("write file");
    let ws = workspace(temp.path());

    let command = Commands::Delete {
        path: "keep.txt".into(),
        yes: false,
    };
    let (code, out) = exec(&ws, command.clone(), "n\n");
    assert_eq!(code, EXIT_ABORTED);
    assert!(out.contains("aborted"));
    assert!(temp.path().join("keep.txt").exists());

    let (code, _) = exec(&ws, command, "y\n");
    assert_eq!(code, 0);
    assert!(!temp.path().join("keep.txt").exists());
}

#[test]
fn copy_cat_and_view() {
    let temp = TempDir::new().expect("temp dir should be created");
    fs::write(temp.path().join("hello.txt"), "hello").expect("write file");
    fs::create_dir(temp.path().join("backup")).expect("create dir");
    let ws = workspace(temp.path());

    let (code, _) = exec(
        &ws,
        Commands::Copy {
            source: "hello.txt".into(),
            dest_dir: "backup".into(),
        },
        "",
    );
    assert_eq!(code, 0);

    let (code, out) = exec(&ws, Commands::Cat { path: "backup/hello.txt".into() }, "");
    assert_eq!(code, 0);
    assert_eq!(out, "hello");

    let (code, out) = exec(&ws, Commands::View { path: "hello.txt".into() }, "");
    assert_eq!(code, 0);
    assert!(out.starts_with("file://"));
    assert!(out.trim_end().ends_with("text/plain"));
}
