//! Reading and writing notebook text
//!
//! Output follows the layout of the reference Python serializer: keys sorted,
//! one-space indentation, non-ASCII characters written as-is and a single
//! trailing newline. For notebooks written by Jupyter this keeps the diff of
//! a fixed notebook down to the lines that were changed. Floats are the
//! exception: they use Rust's shortest form, so `1e-05` is written back as
//! `0.00001`.

use crate::error::{NotebookError, Result};
use crate::model::{Notebook, NBFORMAT_MAJOR};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

/// Parse a notebook from a file path
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The notebook JSON is malformed or not nbformat 4
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn read_notebook<P: AsRef<Path>>(path: P) -> Result<Notebook> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| NotebookError::io(path, e))?;
    parse_notebook_at(&content, path)
}

/// Parse a notebook from a string
///
/// # Errors
///
/// Returns an error if the notebook JSON is malformed or not nbformat 4.
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook_from_str(content: &str) -> Result<Notebook> {
    parse_notebook_at(content, Path::new(""))
}

pub(crate) fn parse_notebook_at(content: &str, path: &Path) -> Result<Notebook> {
    let notebook: Notebook =
        serde_json::from_str(content).map_err(|source| NotebookError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if notebook.nbformat != NBFORMAT_MAJOR {
        return Err(NotebookError::UnsupportedVersion {
            major: notebook.nbformat,
            minor: notebook.nbformat_minor,
        });
    }

    log::debug!(
        "parsed {} (nbformat {}.{}, {} cells)",
        path.display(),
        notebook.nbformat,
        notebook.nbformat_minor,
        notebook.cells.len()
    );
    Ok(notebook)
}

/// Serialize a notebook to text, including the trailing newline
///
/// # Errors
///
/// Returns an error if the notebook cannot be represented as JSON.
pub fn notebook_to_string(notebook: &Notebook) -> Result<String> {
    // Going through `Value` sorts every object's keys.
    let value = serde_json::to_value(notebook).map_err(NotebookError::Serialize)?;

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value
        .serialize(&mut serializer)
        .map_err(NotebookError::Serialize)?;
    buf.push(b'\n');

    String::from_utf8(buf)
        .map_err(|e| NotebookError::Serialize(serde::ser::Error::custom(e)))
}

/// Serialize a notebook and write it to `path`, replacing any existing file
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_notebook<P: AsRef<Path>>(path: P, notebook: &Notebook) -> Result<()> {
    let path = path.as_ref();
    let text = notebook_to_string(notebook)?;
    fs::write(path, text).map_err(|e| NotebookError::io(path, e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
