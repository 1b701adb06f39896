//! In-memory notebook document model (nbformat 4)
//!
//! Only the fields this crate edits are typed. Everything else a notebook
//! carries (kernel metadata, output payloads, unknown keys written by other
//! tools) is kept as opaque JSON so that a parse/serialize cycle loses nothing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// The only nbformat major version this crate reads and writes
pub const NBFORMAT_MAJOR: u32 = 4;

/// First nbformat 4 minor version in which cell ids are mandatory
pub const CELL_ID_MIN_MINOR: u32 = 5;

/// A Jupyter notebook document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Major format version
    pub nbformat: u32,
    /// Minor format version
    pub nbformat_minor: u32,
    /// Document-level metadata
    #[serde(default)]
    pub metadata: NotebookMetadata,
    /// Ordered cells
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Top-level keys this model does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Create an empty nbformat 4.5 notebook
    #[must_use]
    pub fn new() -> Self {
        Self {
            nbformat: NBFORMAT_MAJOR,
            nbformat_minor: CELL_ID_MIN_MINOR,
            metadata: NotebookMetadata::default(),
            cells: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Whether cells of this notebook must carry an `id`
    #[inline]
    #[must_use]
    pub const fn requires_cell_ids(&self) -> bool {
        self.nbformat_minor >= CELL_ID_MIN_MINOR
    }

    /// Ids of all cells that have one
    #[must_use]
    pub fn cell_ids(&self) -> HashSet<String> {
        self.cells
            .iter()
            .filter_map(|cell| cell.id().map(String::from))
            .collect()
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

/// Notebook-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Document name, used as the title of merged notebooks
    ///
    /// The schema does not constrain its type, so it is kept as written;
    /// a `null` name reads as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    /// `kernelspec`, `language_info` and everything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotebookMetadata {
    /// The name, if it is a string
    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

/// Type of notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Executable code cell
    Code,
    /// Markdown documentation cell
    Markdown,
    /// Raw text cell (no formatting)
    Raw,
}

impl std::fmt::Display for CellType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        };
        write!(f, "{s}")
    }
}

/// A notebook cell, discriminated by its `cell_type` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Markdown documentation cell
    Markdown(MarkdownCell),
    /// Executable code cell
    Code(CodeCell),
    /// Raw text cell
    Raw(RawCell),
}

impl Cell {
    /// Discriminator of this cell
    #[inline]
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        match self {
            Self::Markdown(_) => CellType::Markdown,
            Self::Code(_) => CellType::Code,
            Self::Raw(_) => CellType::Raw,
        }
    }

    /// Cell id, if the cell has one
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Markdown(cell) => cell.id.as_deref(),
            Self::Code(cell) => cell.id.as_deref(),
            Self::Raw(cell) => cell.id.as_deref(),
        }
    }

    /// Replace the cell id
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = Some(id.into());
        match self {
            Self::Markdown(cell) => cell.id = id,
            Self::Code(cell) => cell.id = id,
            Self::Raw(cell) => cell.id = id,
        }
    }

    /// Cell source text
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Markdown(cell) => cell.source.as_str(),
            Self::Code(cell) => cell.source.as_str(),
            Self::Raw(cell) => cell.source.as_str(),
        }
    }

    /// True for a markdown cell carrying `outputs` or `execution_count`
    #[must_use]
    pub const fn has_execution_artifacts(&self) -> bool {
        match self {
            Self::Markdown(cell) => cell.outputs.is_some() || cell.execution_count.is_some(),
            Self::Code(_) | Self::Raw(_) => false,
        }
    }
}

/// Markdown cell
///
/// `outputs` and `execution_count` are not part of the markdown cell schema.
/// Some editors write them anyway, so presence is tracked exactly: a key
/// present with a `null` value reads as `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownCell {
    /// Cell id (nbformat >= 4.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cell metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Markdown source
    #[serde(default)]
    pub source: Source,
    /// Inline attachments referenced from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
    /// Stray execution outputs
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub outputs: Option<Value>,
    /// Stray execution counter
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_count: Option<Value>,
    /// Keys this model does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Code cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
    /// Cell id (nbformat >= 4.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cell metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Code source
    #[serde(default)]
    pub source: Source,
    /// Execution counter, `null` when never run
    #[serde(default)]
    pub execution_count: Option<i64>,
    /// Execution results, kept opaque
    #[serde(default)]
    pub outputs: Vec<Value>,
    /// Keys this model does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    /// Cell id (nbformat >= 4.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cell metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Raw source
    #[serde(default)]
    pub source: Source,
    /// Inline attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
    /// Keys this model does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a field that is present in the input, even as `null`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Multi-line cell source
///
/// Notebooks store source either as one string or as a list of lines. Both
/// read into the joined text; writing always produces the list form, one
/// entry per line with its newline kept. Lines end at `\n` only, so a lone
/// `\r` or a Unicode line separator stays inside its entry, unlike Jupyter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Source(String);

impl Source {
    /// Wrap source text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Joined source text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Source split into lines, newlines kept
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.0.split_inclusive('\n').collect()
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.lines())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Lines(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Self(text),
            Repr::Lines(lines) => Self(lines.concat()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_accepts_string_and_lines() {
        let from_text: Source = serde_json::from_value(json!("a\nb")).unwrap();
        let from_lines: Source = serde_json::from_value(json!(["a\n", "b"])).unwrap();
        assert_eq!(from_text, from_lines);
        assert_eq!(from_text.as_str(), "a\nb");
    }

    #[test]
    fn test_source_serializes_as_lines() {
        let source = Source::new("# Title\n\nBody");
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!(["# Title\n", "\n", "Body"])
        );
        assert_eq!(serde_json::to_value(Source::default()).unwrap(), json!([]));
    }

    #[test]
    fn test_source_splits_on_newline_only() {
        let source = Source::new("a\rb\u{2028}c\r\nd");
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!(["a\rb\u{2028}c\r\n", "d"])
        );
    }

    #[test]
    fn test_markdown_null_execution_count_is_present() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "markdown",
            "metadata": {},
            "source": "text",
            "execution_count": null
        }))
        .unwrap();

        assert!(cell.has_execution_artifacts());
        match cell {
            Cell::Markdown(md) => {
                assert_eq!(md.execution_count, Some(Value::Null));
                assert_eq!(md.outputs, None);
            }
            other => panic!("expected markdown cell, got {:?}", other.cell_type()),
        }
    }

    #[test]
    fn test_code_cell_keeps_null_execution_count() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "code",
            "metadata": {},
            "source": [],
            "execution_count": null,
            "outputs": []
        }))
        .unwrap();

        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(value["execution_count"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("execution_count"));
        assert_eq!(value["cell_type"], "code");
    }

    #[test]
    fn test_unknown_keys_survive() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "raw",
            "metadata": {"format": "text/latex"},
            "source": "\\LaTeX",
            "x-editor": {"collapsed": true}
        }))
        .unwrap();

        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(value["x-editor"], json!({"collapsed": true}));
        assert_eq!(value["metadata"]["format"], "text/latex");
    }

    #[test]
    fn test_unknown_cell_type_is_rejected() {
        let result: std::result::Result<Cell, _> = serde_json::from_value(json!({
            "cell_type": "heading",
            "metadata": {},
            "source": ""
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_name_kept_as_written() {
        for name in [json!(5), Value::Null, json!({"en": "Intro"})] {
            let metadata: NotebookMetadata =
                serde_json::from_value(json!({ "name": name.clone() })).unwrap();
            assert_eq!(metadata.name, Some(name.clone()));
            assert_eq!(metadata.name_str(), None);
            assert_eq!(serde_json::to_value(&metadata).unwrap(), json!({ "name": name }));
        }

        let absent: NotebookMetadata = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.name, None);
        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({}));
    }

    #[test]
    fn test_cell_type_display() {
        assert_eq!(CellType::Code.to_string(), "code");
        assert_eq!(CellType::Markdown.to_string(), "markdown");
        assert_eq!(CellType::Raw.to_string(), "raw");
    }
}
