// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for printprep.

use thiserror::Error;

/// Top-level error type for all printprep operations.
#[derive(Debug, Error)]
pub enum PrintprepError {
    // -- Imaging errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("QR encoding failed: {0}")]
    Encoding(String),

    #[error("failed to write image: {0}")]
    ImageWrite(String),

    // -- Input / configuration --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A batch aborted at the given (zero-based) row.
    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<PrintprepError>,
    },

    // -- Host collaboration --
    #[error("asset host error: {0}")]
    Host(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrintprepError {
    /// Attach the index of the row being processed when this error occurred.
    pub fn at_row(self, index: usize) -> Self {
        Self::Row {
            index,
            source: Box::new(self),
        }
    }

    /// Strip any row wrapper and return the underlying error.
    pub fn root(&self) -> &PrintprepError {
        match self {
            Self::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintprepError>;
