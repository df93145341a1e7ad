// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output file naming.
//
// Every generated name is a bare file name (no directory components) so that
// results always land inside the configured output directory.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::warn;

use crate::error::{PrintprepError, Result};

pub const ENHANCED_SUFFIX: &str = "_enhanced.tiff";
pub const CMYK_SUFFIX: &str = "_CMYK.tiff";
pub const UNDERBASE_SUFFIX: &str = "_underbase.tiff";

pub const QR_PREFIX: &str = "qrcode";

/// Name of the file generated from the row whose source is `file_name`.
///
/// The final path component is kept whole, extension included, and `suffix`
/// appended: `photos/logo.png` + `_CMYK.tiff` gives `logo.png_CMYK.tiff`.
pub fn derived_output_name(file_name: &str, suffix: &str) -> Result<String> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            PrintprepError::InvalidInput(format!(
                "cannot derive an output name from '{file_name}'"
            ))
        })?;
    Ok(format!("{base}{suffix}"))
}

/// `<prefix>_<YYYYMMDD_HHMMSS_micros>.<extension>`
pub fn timestamped_name(prefix: &str, extension: &str, instant: &DateTime<Local>) -> String {
    format!(
        "{prefix}_{}.{extension}",
        instant.format("%Y%m%d_%H%M%S_%6f")
    )
}

/// Return `name` unchanged unless a file of that name already exists in
/// `dir`, in which case `_1`, `_2`, ... is inserted before the extension
/// until a free name is found.
pub fn unique_name(dir: &Path, name: &str) -> String {
    next_free(name, |candidate| dir.join(candidate).exists())
}

/// Output names already handed out within one batch.
///
/// Two rows whose sources share a file name (`a/logo.png`, `b/logo.png`)
/// would otherwise write the same output and the later row would replace the
/// earlier row's result.
#[derive(Debug, Default)]
pub struct NameClaims {
    taken: HashSet<String>,
}

impl NameClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or the first free `_n` variant if this batch already
    /// used it.
    pub fn claim(&mut self, name: &str) -> String {
        let name = next_free(name, |candidate| self.taken.contains(candidate));
        self.taken.insert(name.clone());
        name
    }
}

fn next_free(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (name, None),
    };

    let mut counter = 1u32;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        if !taken(&candidate) {
            warn!(original = name, renamed = %candidate, "output name already taken");
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derived_names_keep_the_full_file_name() {
        assert_eq!(
            derived_output_name("logo.png", ENHANCED_SUFFIX).unwrap(),
            "logo.png_enhanced.tiff"
        );
        assert_eq!(
            derived_output_name("photos/art.final.png", CMYK_SUFFIX).unwrap(),
            "art.final.png_CMYK.tiff"
        );
        assert_eq!(
            derived_output_name("/abs/path/shirt", UNDERBASE_SUFFIX).unwrap(),
            "shirt_underbase.tiff"
        );
    }

    #[test]
    fn names_without_a_file_name_are_rejected() {
        assert!(derived_output_name("", CMYK_SUFFIX).is_err());
        assert!(derived_output_name("..", CMYK_SUFFIX).is_err());
    }

    #[test]
    fn sources_differing_only_in_extension_get_distinct_names() {
        assert_ne!(
            derived_output_name("logo.png", CMYK_SUFFIX).unwrap(),
            derived_output_name("logo.jpg", CMYK_SUFFIX).unwrap()
        );
    }

    #[test]
    fn claims_rename_repeats_within_a_batch() {
        let mut claims = NameClaims::new();
        assert_eq!(claims.claim("logo.png_CMYK.tiff"), "logo.png_CMYK.tiff");
        assert_eq!(claims.claim("logo.png_CMYK.tiff"), "logo.png_CMYK_1.tiff");
        assert_eq!(claims.claim("logo.png_CMYK.tiff"), "logo.png_CMYK_2.tiff");
        assert_eq!(claims.claim("other.png_CMYK.tiff"), "other.png_CMYK.tiff");
    }

    #[test]
    fn timestamp_format_has_microseconds() {
        let instant = Local
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 2)
            .unwrap()
            + chrono::Duration::microseconds(42);
        assert_eq!(
            timestamped_name(QR_PREFIX, "png", &instant),
            "qrcode_20240309_070502_000042.png"
        );
    }

    #[test]
    fn unique_name_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_name(dir.path(), "qr.png"), "qr.png");

        std::fs::write(dir.path().join("qr.png"), b"x").unwrap();
        assert_eq!(unique_name(dir.path(), "qr.png"), "qr_1.png");

        std::fs::write(dir.path().join("qr_1.png"), b"x").unwrap();
        assert_eq!(unique_name(dir.path(), "qr.png"), "qr_2.png");
    }
}
