// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row types consumed and produced by the batch processors.
//
// Input rows keep the column names of the row files callers already produce
// (`url`, `fileName`, `contrast`, `saturation`), so a JSON array of records
// deserializes straight into a `Vec` of the matching row type.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PrintprepError, Result};

/// A URL to encode as a QR symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInput {
    pub url: String,
}

impl UrlInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// An image to enhance with contrast and saturation multipliers
/// (1.0 leaves the image unchanged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEnhancementInput {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub contrast: f32,
    pub saturation: f32,
}

impl ImageEnhancementInput {
    pub fn new(file_name: impl Into<String>, contrast: f32, saturation: f32) -> Self {
        Self {
            file_name: file_name.into(),
            contrast,
            saturation,
        }
    }

    /// Both multipliers must be finite numbers.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("contrast", self.contrast), ("saturation", self.saturation)] {
            if !value.is_finite() {
                return Err(PrintprepError::InvalidInput(format!(
                    "{name} multiplier for {} must be finite, got {value}",
                    self.file_name
                )));
            }
        }
        Ok(())
    }
}

/// A single source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFileInput {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

impl ImageFileInput {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Name of the single column in a processor's output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    QrCode,
    EnhancedImage,
    CmykImage,
    UnderbaseImage,
}

impl OutputColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QrCode => "qr_code",
            Self::EnhancedImage => "enhanced_image",
            Self::CmykImage => "cmyk_image",
            Self::UnderbaseImage => "underbase_image",
        }
    }
}

impl std::fmt::Display for OutputColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered result of a batch: one generated file name per input row.
///
/// Serializes as an array of single-key records, e.g.
/// `[{"cmyk_image": "logo_CMYK.tiff"}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub column: OutputColumn,
    pub files: Vec<String>,
}

impl OutputTable {
    pub fn new(column: OutputColumn) -> Self {
        Self {
            column,
            files: Vec::new(),
        }
    }

    pub fn with_capacity(column: OutputColumn, capacity: usize) -> Self {
        Self {
            column,
            files: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, file: String) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }
}

impl Serialize for OutputTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.files.len()))?;
        for file in &self.files {
            seq.serialize_element(&Record {
                column: self.column.as_str(),
                value: file,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    column: &'static str,
    value: &'a str,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.column, self.value)?;
        map.end()
    }
}
