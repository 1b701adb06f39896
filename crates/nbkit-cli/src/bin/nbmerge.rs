//! nbmerge - concatenate notebooks with page breaks
//!
//! Each pattern's matches are sorted, groups are kept in argument order, and
//! every notebook is followed by a hidden page-break cell. The result is
//! written to stdout unless `--output` is given.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use nbkit_cli::{exit_with_usage, expand_patterns, init_logging, Config, Verbosity};
use nbkit_notebook::{merge_files, notebook_to_string, write_notebook};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nbmerge", version)]
#[command(about = "Merge notebooks into one, with a page break after each")]
#[command(after_help = "Examples:\n  \
    nbmerge \"chapter*.ipynb\" > merged.ipynb\n  \
    nbmerge \"intro*.ipynb\" \"chapter*.ipynb\" \"appendix*.ipynb\" > merged.ipynb")]
struct Args {
    /// Notebook file names or glob patterns
    patterns: Vec<String>,

    /// Write the merged notebook to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suffix appended to the merged notebook's name
    #[arg(long, value_name = "SUFFIX")]
    suffix: Option<String>,

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

    let mut options = config.merge_options();
    if let Some(suffix) = args.suffix {
        options.name_suffix = suffix;
    }

    let notebooks = expand_patterns(&args.patterns, true)?;
    log::debug!("merging {} notebook(s)", notebooks.len());

    let Some(merged) = merge_files(&notebooks, &options)? else {
        log::info!("no notebooks to merge");
        return Ok(());
    };

    match args.output {
        Some(path) => write_notebook(&path, &merged)?,
        None => {
            let text = notebook_to_string(&merged)?;
            io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("Failed to write merged notebook to stdout")?;
        }
    }

    Ok(())
}
