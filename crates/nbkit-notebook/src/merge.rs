//! Concatenation of several notebooks into one
//!
//! Every input is normalized, then followed by a hidden page-break cell so
//! that each source notebook starts on a new page when the merged document
//! is rendered. The merged notebook keeps the first input's version and
//! metadata, with `_merged` appended to its name.

use crate::error::Result;
use crate::io::read_notebook;
use crate::model::{Cell, MarkdownCell, Notebook, NotebookMetadata, Source};
use crate::normalize::normalize_notebook;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Source of the page-break marker cell
pub const PAGE_BREAK_SOURCE: &str =
    r#"<div style="page-break-after: always; visibility: hidden">\pagebreak</div>"#;

/// Suffix appended to the merged notebook's name
pub const DEFAULT_NAME_SUFFIX: &str = "_merged";

/// Options for [`merge_notebooks`] and [`merge_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Appended to the merged notebook's `metadata.name`
    pub name_suffix: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
        }
    }
}

/// Build the page-break marker cell
///
/// Cell ids are mandatory from nbformat 4.5 on, so `with_id` should follow
/// [`Notebook::requires_cell_ids`] of the notebook receiving the marker.
#[must_use]
pub fn page_break_cell(with_id: bool) -> Cell {
    Cell::Markdown(MarkdownCell {
        id: with_id.then(new_cell_id),
        source: Source::new(PAGE_BREAK_SOURCE),
        ..MarkdownCell::default()
    })
}

/// True if `cell` is a page-break marker
#[must_use]
pub fn is_page_break(cell: &Cell) -> bool {
    matches!(cell, Cell::Markdown(markdown) if markdown.source.as_str() == PAGE_BREAK_SOURCE)
}

/// Return `metadata` with a string `name`
///
/// A missing or `null` name becomes the empty string; any other non-string
/// name is replaced by its JSON text.
#[must_use]
pub fn ensure_name(metadata: NotebookMetadata) -> NotebookMetadata {
    let name = match metadata.name {
        Some(Value::String(name)) => name,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    };
    NotebookMetadata {
        name: Some(Value::String(name)),
        ..metadata
    }
}

/// Random 8 hex digit id, the form Jupyter itself generates
fn new_cell_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

fn unused_cell_id(taken: &HashSet<String>) -> String {
    loop {
        let id = new_cell_id();
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Accumulates notebooks into a merged document
#[derive(Debug, Default)]
pub struct NotebookMerger {
    merged: Option<Notebook>,
    ids: HashSet<String>,
}

impl NotebookMerger {
    /// Start with nothing merged
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first notebook is pushed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_none()
    }

    /// Normalize `notebook`, append a page break and add its cells
    ///
    /// The first notebook pushed becomes the base document. Cells of later
    /// notebooks whose id is already used get a fresh one, as do cells
    /// without an id when the base document requires ids.
    pub fn push(&mut self, notebook: Notebook) {
        let mut notebook = normalize_notebook(notebook);

        match self.merged.as_mut() {
            None => {
                let with_id = notebook.requires_cell_ids();
                notebook.cells.push(page_break_cell(with_id));
                log::debug!("merge base has {} cells", notebook.cells.len());
                self.ids = notebook.cell_ids();
                self.merged = Some(notebook);
            }
            Some(merged) => {
                let with_id = merged.requires_cell_ids();
                notebook.cells.push(page_break_cell(with_id));
                log::debug!("appending {} cells", notebook.cells.len());

                for mut cell in notebook.cells {
                    let needs_id = match cell.id() {
                        Some(old) if self.ids.contains(old) => {
                            log::debug!("cell id {old} already used, renaming");
                            true
                        }
                        Some(_) => false,
                        None => with_id,
                    };
                    if needs_id {
                        cell.set_id(unused_cell_id(&self.ids));
                    }
                    if let Some(id) = cell.id() {
                        self.ids.insert(id.to_string());
                    }
                    merged.cells.push(cell);
                }
            }
        }
    }

    /// Finish the merge, naming the result
    ///
    /// Returns `None` if nothing was pushed.
    #[must_use]
    pub fn finish(self, options: &MergeOptions) -> Option<Notebook> {
        let mut merged = self.merged?;
        let mut metadata = ensure_name(merged.metadata);
        if let Some(Value::String(name)) = metadata.name.as_mut() {
            name.push_str(&options.name_suffix);
        }
        merged.metadata = metadata;
        Some(merged)
    }
}

/// Merge notebooks in iteration order
///
/// Returns `None` for an empty input.
#[must_use]
pub fn merge_notebooks<I>(notebooks: I, options: &MergeOptions) -> Option<Notebook>
where
    I: IntoIterator<Item = Notebook>,
{
    let mut merger = NotebookMerger::new();
    for notebook in notebooks {
        merger.push(notebook);
    }
    merger.finish(options)
}

/// Read and merge notebook files in the given order
///
/// Returns `Ok(None)` for an empty path list.
///
/// # Errors
///
/// Returns the first read or parse error; nothing is merged in that case.
pub fn merge_files<P: AsRef<Path>>(paths: &[P], options: &MergeOptions) -> Result<Option<Notebook>> {
    let mut merger = NotebookMerger::new();
    for path in paths {
        merger.push(read_notebook(path)?);
    }
    Ok(merger.finish(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeCell, RawCell};
    use serde_json::json;

    fn notebook(minor: u32, cells: Vec<Cell>) -> Notebook {
        Notebook {
            nbformat_minor: minor,
            cells,
            ..Notebook::new()
        }
    }

    fn markdown(id: Option<&str>, text: &str) -> Cell {
        Cell::Markdown(MarkdownCell {
            id: id.map(String::from),
            source: Source::new(text),
            ..MarkdownCell::default()
        })
    }

    #[test]
    fn test_page_break_cell() {
        let cell = page_break_cell(false);
        assert!(is_page_break(&cell));
        assert_eq!(cell.id(), None);

        let with_id = page_break_cell(true);
        let id = with_id.id().unwrap();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ensure_name_defaults_to_empty() {
        let metadata = ensure_name(NotebookMetadata::default());
        assert_eq!(metadata.name_str(), Some(""));

        let null = ensure_name(NotebookMetadata {
            name: Some(Value::Null),
            ..NotebookMetadata::default()
        });
        assert_eq!(null.name_str(), Some(""));

        let number = ensure_name(NotebookMetadata {
            name: Some(json!(5)),
            ..NotebookMetadata::default()
        });
        assert_eq!(number.name_str(), Some("5"));

        let named = ensure_name(NotebookMetadata {
            name: Some("intro".into()),
            ..NotebookMetadata::default()
        });
        assert_eq!(named.name_str(), Some("intro"));
    }

    #[test]
    fn test_merge_empty_is_none() {
        assert!(merge_notebooks(Vec::<Notebook>::new(), &MergeOptions::default()).is_none());
        let no_paths: [&str; 0] = [];
        assert!(merge_files(&no_paths, &MergeOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_merge_single_without_name() {
        let merged = merge_notebooks(
            [notebook(4, vec![markdown(None, "a")])],
            &MergeOptions::default(),
        )
        .unwrap();

        assert_eq!(merged.cells.len(), 2);
        assert!(is_page_break(&merged.cells[1]));
        assert_eq!(merged.metadata.name_str(), Some("_merged"));
    }

    #[test]
    fn test_merge_two_layout() {
        let a = notebook(
            4,
            vec![markdown(None, "a1"), Cell::Code(CodeCell::default())],
        );
        let b = notebook(
            4,
            vec![
                markdown(None, "b1"),
                Cell::Raw(RawCell::default()),
                markdown(None, "b3"),
            ],
        );
        let mut a_named = a;
        a_named.metadata.name = Some("book".into());

        let merged = merge_notebooks([a_named, b], &MergeOptions::default()).unwrap();
        let sources: Vec<&str> = merged.cells.iter().map(Cell::source).collect();
        assert_eq!(
            sources,
            vec!["a1", "", PAGE_BREAK_SOURCE, "b1", "", "b3", PAGE_BREAK_SOURCE]
        );
        assert_eq!(merged.metadata.name_str(), Some("book_merged"));
    }

    #[test]
    fn test_merge_strips_markdown_artifacts() {
        let dirty = Cell::Markdown(MarkdownCell {
            source: Source::new("x"),
            outputs: Some(json!([])),
            ..MarkdownCell::default()
        });
        let merged =
            merge_notebooks([notebook(4, vec![dirty])], &MergeOptions::default()).unwrap();
        assert!(merged.cells.iter().all(|c| !c.has_execution_artifacts()));
    }

    #[test]
    fn test_merge_renames_duplicate_ids() {
        let a = notebook(5, vec![markdown(Some("intro"), "a")]);
        let b = notebook(5, vec![markdown(Some("intro"), "b")]);

        let merged = merge_notebooks([a, b], &MergeOptions::default()).unwrap();
        let ids: Vec<&str> = merged.cells.iter().filter_map(Cell::id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(ids[0], "intro");
        assert_ne!(ids[2], "intro");
    }

    #[test]
    fn test_merge_assigns_ids_when_base_requires_them() {
        let base = notebook(5, vec![markdown(Some("x1"), "a")]);
        let older = notebook(4, vec![markdown(None, "b"), Cell::Code(CodeCell::default())]);

        let merged = merge_notebooks([base, older], &MergeOptions::default()).unwrap();
        assert_eq!(merged.nbformat_minor, 5);
        assert_eq!(merged.cells.len(), 5);
        assert!(merged.cells.iter().all(|c| c.id().is_some()));
        assert_eq!(merged.cell_ids().len(), 5);
        assert_eq!(merged.cells[0].id(), Some("x1"));
    }

    #[test]
    fn test_merge_keeps_missing_ids_for_older_base() {
        let base = notebook(4, vec![markdown(None, "a")]);
        let other = notebook(4, vec![markdown(None, "b")]);

        let merged = merge_notebooks([base, other], &MergeOptions::default()).unwrap();
        assert!(merged.cells.iter().all(|c| c.id().is_none()));
    }

    #[test]
    fn test_merge_custom_suffix() {
        let options = MergeOptions {
            name_suffix: "-book".into(),
        };
        let merged = merge_notebooks([notebook(4, Vec::new())], &options).unwrap();
        assert_eq!(merged.metadata.name_str(), Some("-book"));
    }
}
