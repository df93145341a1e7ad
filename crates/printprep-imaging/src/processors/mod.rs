// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch processors: one image operation per input row.
//
// Every processor follows the same convention: rows are handled in order;
// each row's result is written into the configured output directory, shared
// with the host and synchronized before the next row starts. The first failing
// row aborts the batch. Files already written for earlier rows are left in
// place; writes are not transactional.

pub mod cmyk;
pub mod enhance;
pub mod qr;
pub mod underbase;

pub use cmyk::convert_to_cmyk;
pub use enhance::enhance_images;
pub use qr::generate_qr_codes;
pub use underbase::extract_white_underbases;

use printprep_core::config::ProcessingConfig;
use printprep_core::error::Result;
use printprep_core::naming::NameClaims;
use printprep_core::types::{OutputColumn, OutputTable};
use printprep_host::AssetHost;
use tracing::{debug, info};

/// Drive `process` over `rows`, publishing each generated file name.
///
/// `process` claims its output name from the batch's [`NameClaims`] before
/// writing, writes the row's file and returns that bare name.
fn run_batch<T>(
    rows: &[T],
    column: OutputColumn,
    config: &ProcessingConfig,
    host: &dyn AssetHost,
    mut process: impl FnMut(&T, &mut NameClaims) -> Result<String>,
) -> Result<OutputTable> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let mut claims = NameClaims::new();
    let mut table = OutputTable::with_capacity(column, rows.len());
    for (index, row) in rows.iter().enumerate() {
        let name = process(row, &mut claims)
            .and_then(|name| publish(name, host))
            .map_err(|err| err.at_row(index))?;
        debug!(index, name = %name, "row complete");
        table.push(name);
    }

    info!(
        column = %column,
        rows = table.len(),
        host = host.host_name(),
        "batch complete"
    );
    Ok(table)
}

fn publish(name: String, host: &dyn AssetHost) -> Result<String> {
    host.share(&name)?;
    host.synchronize(std::slice::from_ref(&name))?;
    Ok(name)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use image::{DynamicImage, Rgba, RgbaImage};
    use printprep_core::config::ProcessingConfig;

    /// Input and output directories under one scratch root.
    pub struct Workspace {
        _root: tempfile::TempDir,
        pub config: ProcessingConfig,
    }

    impl Workspace {
        pub fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let input = root.path().join("in");
            std::fs::create_dir_all(&input).unwrap();
            let mut config = ProcessingConfig::with_output_dir(root.path().join("out"));
            config.input_dir = Some(input);
            Self { _root: root, config }
        }

        pub fn input_dir(&self) -> &Path {
            self.config.input_dir.as_deref().unwrap()
        }

        pub fn output(&self, name: &str) -> std::path::PathBuf {
            self.config.output_path(name)
        }

        /// Save `image` as PNG in the input directory.
        pub fn add_input(&self, name: &str, image: DynamicImage) {
            image.save(self.input_dir().join(name)).unwrap();
        }
    }

    /// RGBA artwork: dark band on top, light band below, with a transparent
    /// margin column on the left.
    pub fn artwork() -> RgbaImage {
        RgbaImage::from_fn(12, 8, |x, y| {
            let alpha = if x == 0 { 0 } else { 40 + (x * 18) as u8 };
            if y < 4 {
                Rgba([30, 20 + (x * 3) as u8, 60, alpha])
            } else {
                Rgba([235, 230, 210 + x as u8, alpha])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printprep_core::error::PrintprepError;
    use printprep_host::{HostEvent, RecordingHost};

    use super::test_support::Workspace;

    #[test]
    fn publishes_share_then_synchronize_per_row() {
        let ws = Workspace::new();
        let host = RecordingHost::new();
        let rows = ["a", "b"];

        let table = run_batch(&rows, OutputColumn::QrCode, &ws.config, &host, |row, claims| {
            Ok(claims.claim(&format!("{row}.bin")))
        })
        .unwrap();

        assert_eq!(table.files, vec!["a.bin", "b.bin"]);
        assert_eq!(
            host.events(),
            vec![
                HostEvent::Shared("a.bin".into()),
                HostEvent::Synchronized(vec!["a.bin".into()]),
                HostEvent::Shared("b.bin".into()),
                HostEvent::Synchronized(vec!["b.bin".into()]),
            ]
        );
        assert!(ws.config.output_dir.is_dir());
    }

    #[test]
    fn repeated_names_within_a_batch_are_kept_apart() {
        let ws = Workspace::new();
        let host = RecordingHost::new();
        let rows = ["same", "same", "other"];

        let table = run_batch(&rows, OutputColumn::CmykImage, &ws.config, &host, |row, claims| {
            Ok(claims.claim(&format!("{row}.tiff")))
        })
        .unwrap();

        assert_eq!(table.files, vec!["same.tiff", "same_1.tiff", "other.tiff"]);
    }

    #[test]
    fn first_failure_aborts_with_row_index() {
        let ws = Workspace::new();
        let host = RecordingHost::new();
        let rows = [1, 2, 3];

        let err = run_batch(&rows, OutputColumn::CmykImage, &ws.config, &host, |row, _| {
            if *row == 2 {
                Err(PrintprepError::Decode("broken".into()))
            } else {
                Ok(format!("{row}.tiff"))
            }
        })
        .unwrap_err();

        assert!(matches!(err, PrintprepError::Row { index: 1, .. }));
        assert_eq!(host.shared(), vec!["1.tiff"]);
    }

    #[test]
    fn empty_batch_yields_empty_table() {
        let ws = Workspace::new();
        let host = RecordingHost::new();
        let rows: [u8; 0] = [];
        let table = run_batch(&rows, OutputColumn::EnhancedImage, &ws.config, &host, |_, _| {
            unreachable!()
        })
        .unwrap();
        assert!(table.is_empty());
        assert!(host.events().is_empty());
    }
}
