//! # nbkit-notebook
//!
//! Jupyter Notebook (.ipynb, nbformat 4) editing library for nbkit.
//!
//! This crate provides the two notebook transformations behind the `nbfix`
//! and `nbmerge` tools:
//! - Normalization: removing `outputs` and `execution_count` from markdown
//!   cells, which some editors write although the schema forbids them
//! - Merging: concatenating notebooks with a page break after each one
//!
//! Notebooks are read into a typed model that keeps every field it does not
//! interpret, and written back in the layout Jupyter itself uses.
//!
//! ## Example
//!
//! ```no_run
//! use nbkit_notebook::{fix_notebook_file, merge_files, notebook_to_string, FixOptions, MergeOptions};
//!
//! let report = fix_notebook_file("chapter1.ipynb", &FixOptions::default())?;
//! println!("fixed {} cells", report.cells_fixed);
//!
//! if let Some(book) = merge_files(&["chapter1.ipynb", "chapter2.ipynb"], &MergeOptions::default())? {
//!     print!("{}", notebook_to_string(&book)?);
//! }
//! # Ok::<(), nbkit_notebook::NotebookError>(())
//! ```

/// Error types for notebook operations
pub mod error;
/// Notebook parsing and serialization
pub mod io;
/// Notebook concatenation
pub mod merge;
/// Notebook document model
pub mod model;
/// Markdown cell normalization
pub mod normalize;

pub use error::{NotebookError, Result};
pub use io::{notebook_to_string, parse_notebook_from_str, read_notebook, write_notebook};
pub use merge::{
    ensure_name, is_page_break, merge_files, merge_notebooks, page_break_cell, MergeOptions,
    NotebookMerger, DEFAULT_NAME_SUFFIX, PAGE_BREAK_SOURCE,
};
pub use model::{
    Cell, CellType, CodeCell, MarkdownCell, Notebook, NotebookMetadata, RawCell, Source,
};
pub use normalize::{
    backup_path, count_markdown_artifacts, fix_notebook_file, fix_notebooks, normalize_notebook,
    strip_markdown_artifacts, BackupMode, FixOptions, FixReport, DEFAULT_BACKUP_SUFFIX,
};
