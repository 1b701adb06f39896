//! nbfix - strip execution fields from markdown cells
//!
//! Some editors save markdown cells with `outputs` and `execution_count`,
//! which makes the notebook fail schema validation ("Failed validating
//! 'additionalProperties' in markdown_cell"). nbfix removes them in place.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use nbkit_cli::{exit_with_usage, expand_patterns, init_logging, Config, Verbosity};
use nbkit_notebook::{fix_notebook_file, BackupMode};

#[derive(Parser, Debug)]
#[command(name = "nbfix", version)]
#[command(about = "Remove outputs and execution_count from markdown cells of notebooks")]
#[command(after_help = "Examples:\n  \
    nbfix index.ipynb\n  \
    nbfix \"chapter*.ipynb\"\n  \
    nbfix \"intro*.ipynb\" \"chapter*.ipynb\" \"appendix*.ipynb\"")]
struct Args {
    /// Notebook file names or glob patterns
    patterns: Vec<String>,

    /// Do not write a backup file
    #[arg(long)]
    no_backup: bool,

    /// Copy the original file as backup instead of re-serializing it
    #[arg(long, conflicts_with = "no_backup")]
    raw_backup: bool,

    /// Suffix appended to the notebook path for the backup
    #[arg(long, value_name = "SUFFIX")]
    backup_suffix: Option<String>,

    /// Show per-file details
    #[arg(short, long)]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    if args.patterns.is_empty() {
        exit_with_usage(Args::command());
    }

    init_logging(Verbosity::from_flags(args.quiet, args.verbose));

    if let Err(e) = run(args) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::discover();

    let mut options = config.fix_options();
    if args.no_backup {
        options.backup = false;
    }
    if args.raw_backup {
        options.backup_mode = BackupMode::Raw;
    }
    if let Some(suffix) = args.backup_suffix {
        options.backup_suffix = suffix;
    }

    let notebooks = expand_patterns(&args.patterns, false)?;
    log::debug!("fixing {} notebook(s)", notebooks.len());

    for path in &notebooks {
        let report = fix_notebook_file(path, &options)?;
        if let Some(backup) = &report.backup {
            log::debug!("{} backed up to {}", path.display(), backup.display());
        }
    }

    Ok(())
}
