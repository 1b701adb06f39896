//! Removal of stray execution fields from markdown cells
//!
//! Some editors save markdown cells with `outputs` and `execution_count`,
//! which the nbformat schema rejects (`additionalProperties` in
//! `markdown_cell`). Fixing a notebook drops those two keys from every
//! markdown cell and leaves every other cell untouched.

use crate::error::{NotebookError, Result};
use crate::io::{parse_notebook_at, write_notebook};
use crate::model::{Cell, MarkdownCell, Notebook};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to a notebook path to form its backup path
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// What gets written to the backup file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackupMode {
    /// The parsed notebook, serialized again before it is fixed
    #[default]
    Reserialized,
    /// A byte-for-byte copy of the original file
    Raw,
}

/// Options for [`fix_notebook_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOptions {
    /// Write a backup before overwriting the notebook
    pub backup: bool,
    /// Appended to the notebook path to name the backup
    pub backup_suffix: String,
    /// Backup content
    pub backup_mode: BackupMode,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            backup: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            backup_mode: BackupMode::default(),
        }
    }
}

/// Outcome of fixing one notebook file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixReport {
    /// The notebook that was rewritten
    pub path: PathBuf,
    /// Backup location, if one was written
    pub backup: Option<PathBuf>,
    /// Markdown cells that had execution fields removed
    pub cells_fixed: usize,
}

/// Drop `outputs` and `execution_count` from a markdown cell
///
/// Any other cell is returned unchanged, and a markdown cell without those
/// fields comes back as it went in.
#[must_use]
pub fn strip_markdown_artifacts(cell: Cell) -> Cell {
    match cell {
        Cell::Markdown(markdown) => Cell::Markdown(MarkdownCell {
            outputs: None,
            execution_count: None,
            ..markdown
        }),
        other => other,
    }
}

/// Strip execution fields from every markdown cell of a notebook
#[must_use]
pub fn normalize_notebook(mut notebook: Notebook) -> Notebook {
    notebook.cells = notebook
        .cells
        .into_iter()
        .map(strip_markdown_artifacts)
        .collect();
    notebook
}

/// Number of markdown cells that [`normalize_notebook`] would change
#[must_use]
pub fn count_markdown_artifacts(notebook: &Notebook) -> usize {
    notebook
        .cells
        .iter()
        .filter(|cell| cell.has_execution_artifacts())
        .count()
}

/// Path of the backup written for `path`
#[must_use]
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Fix one notebook file in place
///
/// The backup, when enabled, is written before the original is touched.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid notebook, or
/// if writing the backup or the fixed notebook fails.
pub fn fix_notebook_file<P: AsRef<Path>>(path: P, options: &FixOptions) -> Result<FixReport> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| NotebookError::io(path, e))?;
    let notebook = parse_notebook_at(&content, path)?;

    let backup = if options.backup {
        let target = backup_path(path, &options.backup_suffix);
        match options.backup_mode {
            BackupMode::Reserialized => write_notebook(&target, &notebook)?,
            BackupMode::Raw => {
                fs::write(&target, &content).map_err(|e| NotebookError::io(&target, e))?;
            }
        }
        log::debug!("backup of {} written to {}", path.display(), target.display());
        Some(target)
    } else {
        None
    };

    let cells_fixed = count_markdown_artifacts(&notebook);
    let fixed = normalize_notebook(notebook);
    write_notebook(path, &fixed)?;

    if cells_fixed > 0 {
        log::info!("{}: fixed {cells_fixed} markdown cell(s)", path.display());
    } else {
        log::debug!("{}: nothing to fix", path.display());
    }

    Ok(FixReport {
        path: path.to_path_buf(),
        backup,
        cells_fixed,
    })
}

/// Fix notebook files in order, stopping at the first failure
///
/// # Errors
///
/// Returns the first error encountered; files after it are not processed.
pub fn fix_notebooks<P: AsRef<Path>>(paths: &[P], options: &FixOptions) -> Result<Vec<FixReport>> {
    paths
        .iter()
        .map(|path| fix_notebook_file(path, options))
        .collect()
}
