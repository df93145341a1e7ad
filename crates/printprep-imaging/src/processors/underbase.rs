// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// White underbase extraction → RGBA TIFF.

use image::DynamicImage;
use printprep_core::config::ProcessingConfig;
use printprep_core::error::Result;
use printprep_core::naming::{UNDERBASE_SUFFIX, derived_output_name};
use printprep_core::types::{ImageFileInput, OutputColumn, OutputTable};
use printprep_host::AssetHost;
use tracing::{info, instrument};

use crate::image::ImageProcessor;
use crate::underbase::{extract_underbase, ink_coverage};

/// Build the white underbase layer for each row and write
/// `<file name>_underbase.tiff`, using `config.underbase.threshold`.
#[instrument(skip_all, fields(rows = rows.len(), threshold = config.underbase.threshold))]
pub fn extract_white_underbases(
    rows: &[ImageFileInput],
    config: &ProcessingConfig,
    host: &dyn AssetHost,
) -> Result<OutputTable> {
    let threshold = config.underbase.threshold;

    super::run_batch(rows, OutputColumn::UnderbaseImage, config, host, |row, claims| {
        let name = claims.claim(&derived_output_name(&row.file_name, UNDERBASE_SUFFIX)?);
        let source = ImageProcessor::open(config.resolve_input(&row.file_name))?;

        let mask = extract_underbase(source.as_dynamic(), threshold);
        let coverage = ink_coverage(&mask);
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(mask))
            .save_tiff(config.output_path(&name))?;

        info!(source = %row.file_name, file = %name, coverage, "underbase written");
        Ok(name)
    })
}
