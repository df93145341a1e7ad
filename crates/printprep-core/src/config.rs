// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{PrintprepError, Result};

/// Settings shared by every batch processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory every generated file is written to.
    pub output_dir: PathBuf,
    /// Base directory for relative `fileName` values. When unset, relative
    /// names resolve against the working directory.
    pub input_dir: Option<PathBuf>,
    /// QR symbol rendering parameters.
    pub qr: QrSettings,
    /// White underbase extraction parameters.
    pub underbase: UnderbaseSettings,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            input_dir: None,
            qr: QrSettings::default(),
            underbase: UnderbaseSettings::default(),
        }
    }
}

impl ProcessingConfig {
    /// Default settings writing into `output_dir`.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            PrintprepError::Config(format!("{}: {}", path.as_ref().display(), err))
        })?;
        config.validate()?;
        debug!(output_dir = %config.output_dir.display(), "configuration loaded");
        Ok(config)
    }

    /// Reject settings no processor can work with.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(PrintprepError::Config("output_dir must not be empty".into()));
        }
        if self.qr.module_size == 0 {
            return Err(PrintprepError::Config("qr.module_size must be at least 1".into()));
        }
        if self.qr.module_size > QrSettings::MAX_MODULE_SIZE {
            return Err(PrintprepError::Config(format!(
                "qr.module_size {} exceeds the maximum of {} px",
                self.qr.module_size,
                QrSettings::MAX_MODULE_SIZE
            )));
        }
        if self.qr.border > QrSettings::MAX_BORDER {
            return Err(PrintprepError::Config(format!(
                "qr.border {} exceeds the maximum of {} modules",
                self.qr.border,
                QrSettings::MAX_BORDER
            )));
        }
        Ok(())
    }

    /// Resolve a row's `fileName` to the path it should be read from.
    pub fn resolve_input(&self, file_name: &str) -> PathBuf {
        let path = Path::new(file_name);
        match &self.input_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Full path of a generated file inside the output directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrErrorCorrection {
    /// Recovers ~7% of the symbol.
    #[default]
    Low,
    /// ~15%.
    Medium,
    /// ~25%.
    Quartile,
    /// ~30%.
    High,
}

impl FromStr for QrErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            other => Err(format!(
                "unknown error-correction level '{other}' (expected low, medium, quartile or high)"
            )),
        }
    }
}

/// How QR symbols are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub error_correction: QrErrorCorrection,
    /// Pixels per module, in both directions.
    pub module_size: u32,
    /// White quiet zone around the symbol, in modules.
    pub border: u32,
}

impl QrSettings {
    /// Largest accepted module size. A version 40 symbol with the widest
    /// border is then about 10 850 px square.
    pub const MAX_MODULE_SIZE: u32 = 50;
    /// Largest accepted quiet zone, in modules.
    pub const MAX_BORDER: u32 = 20;
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            error_correction: QrErrorCorrection::Low,
            module_size: 10,
            border: 4,
        }
    }
}

/// White underbase extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderbaseSettings {
    /// Pixels whose luma is strictly below this value receive white ink.
    pub threshold: u8,
}

impl Default for UnderbaseSettings {
    fn default() -> Self {
        Self { threshold: 200 }
    }
}
