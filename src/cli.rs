use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use crate::runner::DEFAULT_TIMEOUT;

mod run_impl;

/// Exit status for a missing or malformed command line.
pub const USAGE_EXIT: i32 = 1;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gitloc",
    version,
    about = "Per-contributor line statistics across every git repository under a folder",
    long_about = None
)]
pub struct Args {
    /// Folder to scan for git repositories
    #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// Write the JSON result to this file instead of stdout
    #[arg(value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Only walk this revision instead of all refs
    #[arg(long = "rev", value_name = "REV")]
    pub rev: Option<String>,

    /// Upper time bound for each git invocation, in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Follow symlinks while searching for repositories
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    pub follow_symlinks: bool,

    /// Verbose logging (-v info, -vv debug)
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Don't print progress lines
    #[arg(long = "quiet", short = 'q', action = ArgAction::SetTrue)]
    pub quiet: bool,
}

/// Runs the CLI application.
///
/// A missing ROOT prints usage to stderr and exits with [`USAGE_EXIT`].
///
/// # Errors
/// Returns an error if the result cannot be serialized or written.
pub fn run() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(USAGE_EXIT);
        }
        Err(e) => e.exit(),
    };
    init_logging(args.verbose);
    run_impl::run_with_args(&args)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
