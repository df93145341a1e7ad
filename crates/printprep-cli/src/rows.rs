// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row loading: JSON row files plus positional command-line values.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use printprep_core::types::ImageFileInput;
use serde::de::DeserializeOwned;

/// Rows from a JSON array file, or none when no file was given.
pub fn load<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading rows from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing rows in {}", path.display()))
}

/// `fileName` rows from an optional row file followed by positional names.
pub fn file_rows(path: Option<&Path>, files: &[String]) -> Result<Vec<ImageFileInput>> {
    let mut rows: Vec<ImageFileInput> = load(path)?;
    rows.extend(files.iter().map(ImageFileInput::new));
    ensure_not_empty(&rows)?;
    Ok(rows)
}

pub fn ensure_not_empty<T>(rows: &[T]) -> Result<()> {
    ensure!(
        !rows.is_empty(),
        "no rows to process: pass --rows FILE or positional values"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use printprep_core::types::UrlInput;

    #[test]
    fn file_rows_come_before_positional_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"fileName": "a.png"}, {"fileName": "b.png"}]"#).unwrap();

        let rows = file_rows(Some(&path), &["c.png".to_string()]).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn no_file_means_no_rows() {
        let rows: Vec<UrlInput> = load(None).unwrap();
        assert!(rows.is_empty());
        assert!(file_rows(None, &[]).is_err());
    }

    #[test]
    fn malformed_row_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"link": "https://example.com"}]"#).unwrap();

        let err = load::<UrlInput>(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
