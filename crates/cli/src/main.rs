use std::io;

use clap::Parser;
use filemgr_cli::commands::CliArgs;
use filemgr_cli::handlers::{Workspace, run};
use filemgr_cli::{EXIT_ABORTED, VERSION};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    debug!("filemgr v{} starting", VERSION);

    let exit_code = match execute(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_ABORTED
        }
    };

    std::process::exit(exit_code);
}

fn execute(args: &CliArgs) -> anyhow::Result<i32> {
    let workspace = Workspace::from_args(args)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(&workspace, &args.command, &mut out, &mut input)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
