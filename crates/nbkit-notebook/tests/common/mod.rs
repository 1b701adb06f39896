//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Notebook as saved by an editor that leaves execution fields on markdown cells
pub const VSCODE_NOTEBOOK: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "execution_count": null,
   "metadata": {},
   "outputs": [],
   "source": [
    "# Chapter 1\n",
    "Introduction"
   ]
  },
  {
   "cell_type": "code",
   "execution_count": 2,
   "metadata": {},
   "outputs": [
    {
     "name": "stdout",
     "output_type": "stream",
     "text": [
      "4\n"
     ]
    }
   ],
   "source": [
    "print(2 + 2)"
   ]
  }
 ],
 "metadata": {
  "kernelspec": {
   "display_name": "Python 3",
   "language": "python",
   "name": "python3"
  }
 },
 "nbformat": 4,
 "nbformat_minor": 4
}
"##;

/// Build a notebook with `cells` markdown cells, optionally named
pub fn markdown_notebook(prefix: &str, cells: usize, name: Option<&str>) -> String {
    let cells: Vec<serde_json::Value> = (0..cells)
        .map(|i| {
            serde_json::json!({
                "cell_type": "markdown",
                "metadata": {},
                "source": format!("{prefix} {i}"),
            })
        })
        .collect();
    let mut metadata = serde_json::Map::new();
    if let Some(name) = name {
        metadata.insert("name".into(), name.into());
    }
    serde_json::json!({
        "nbformat": 4,
        "nbformat_minor": 4,
        "metadata": metadata,
        "cells": cells,
    })
    .to_string()
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
