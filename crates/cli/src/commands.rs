use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse and manage files under a root directory
#[derive(Parser, Debug)]
#[command(
    name = "filemgr",
    about = "Browse and manage files under a root directory",
    version,
    long_about = "filemgr lists directories and creates, renames, copies and deletes \
                  entries. Relative paths are resolved against the root directory."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "FILEMGR_ROOT",
        value_name = "DIR",
        help = "Root directory for relative paths (defaults to the current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "EXT",
        default_value = "txt",
        help = "Extension appended to new files"
    )]
    pub extension: String,

    #[arg(
        long,
        global = true,
        value_name = "TEXT",
        help = "Initial content written into new files"
    )]
    pub template: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "List the entries of a directory")]
    Ls {
        #[arg(value_name = "DIR", default_value = ".")]
        path: PathBuf,
    },

    #[command(about = "Create a folder")]
    Mkdir {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(short = 'C', long = "in", value_name = "DIR", default_value = ".")]
        parent: PathBuf,
    },

    #[command(
        about = "Create an empty text file",
        long_about = "Creates a new file; the configured extension is appended unless the \
                      name already ends with it.\n\n\
                      Examples:\n  \
                      filemgr touch draft\n  \
                      filemgr touch notes.md --extension md --in docs"
    )]
    Touch {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(short = 'C', long = "in", value_name = "DIR", default_value = ".")]
        parent: PathBuf,
    },

    #[command(about = "Rename an entry within its directory")]
    Rename {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(value_name = "NEW_NAME")]
        new_name: String,
    },

    #[command(about = "Copy a file into a directory")]
    Copy {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        #[arg(value_name = "DEST_DIR")]
        dest_dir: PathBuf,
    },

    #[command(about = "Delete a file or an empty folder")]
    Delete {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Print the content of a text file")]
    Cat {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    #[command(about = "Resolve a URI a viewer can open")]
    View {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_touch_with_parent() {
        let args = CliArgs::try_parse_from(["filemgr", "touch", "draft", "--in", "notes"])
            .expect("touch should parse");

        assert_eq!(
            args.command,
            Commands::Touch {
                name: "draft".to_string(),
                parent: PathBuf::from("notes"),
            }
        );
        assert_eq!(args.extension, "txt");
    }

    #[test]
    fn test_parse_delete_flags() {
        let args = CliArgs::try_parse_from(["filemgr", "--root", "/srv", "delete", "old", "-y"])
            .expect("delete should parse");

        assert_eq!(args.root, Some(PathBuf::from("/srv")));
        assert_eq!(
            args.command,
            Commands::Delete {
                path: PathBuf::from("old"),
                yes: true,
            }
        );
    }

    #[test]
    fn test_ls_defaults_to_root() {
        let args = CliArgs::try_parse_from(["filemgr", "ls"]).expect("ls should parse");
        assert_eq!(
            args.command,
            Commands::Ls {
                path: PathBuf::from(".")
            }
        );
    }

    #[test]
    fn test_rename_requires_new_name() {
        assert!(CliArgs::try_parse_from(["filemgr", "rename", "a"]).is_err());
    }
}
