//! Command-line interface for nbkit notebook tools
//!
//! This crate provides two binaries:
//!
//! - `nbfix` removes `outputs` and `execution_count` from markdown cells,
//!   rewriting each notebook in place after saving a `.bak` copy
//! - `nbmerge` concatenates notebooks, with a page break after each one,
//!   and prints the merged notebook
//!
//! # Quick Start
//!
//! ```bash
//! # Fix one notebook
//! nbfix index.ipynb
//!
//! # Fix several groups of notebooks (quote the patterns)
//! nbfix "intro*.ipynb" "chapter*.ipynb" "appendix*.ipynb"
//!
//! # Merge chapters into one notebook
//! nbmerge "chapter*.ipynb" > merged.ipynb
//! ```
//!
//! # Configuration
//!
//! Defaults can be set in `.nbkit.toml`, in the home directory or in the
//! working directory (the latter wins). Command-line flags override both.
//!
//! ```toml
//! [fix]
//! backup = true
//! backup_suffix = ".bak"
//! raw_backup = false
//!
//! [merge]
//! name_suffix = "_merged"
//! ```

pub mod config;
pub mod patterns;

pub use config::Config;
pub use patterns::expand_patterns;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verbosity {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    Normal,
    /// Everything down to per-file debug records
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Default `env_logger` filter for this level
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Initialize logging to stderr
///
/// stdout is reserved for notebook output. `RUST_LOG` takes precedence over
/// the verbosity flags.
pub fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(verbosity.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Print the full help to stderr and exit with status 1
///
/// Used when a tool is run without any notebook pattern.
pub fn exit_with_usage(mut command: clap::Command) -> ! {
    eprintln!("{}", command.render_long_help());
    std::process::exit(1);
}
