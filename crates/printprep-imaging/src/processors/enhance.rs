// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast + saturation enhancement → RGBA TIFF.

use printprep_core::config::ProcessingConfig;
use printprep_core::error::Result;
use printprep_core::naming::{ENHANCED_SUFFIX, derived_output_name};
use printprep_core::types::{ImageEnhancementInput, OutputColumn, OutputTable};
use printprep_host::AssetHost;
use tracing::{info, instrument};

use crate::image::ImageProcessor;

/// Enhance each row's image and write `<file name>_enhanced.tiff`.
///
/// Layered documents are flattened first; every image is normalised to RGBA
/// so transparency is preserved. Contrast is applied before saturation.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn enhance_images(
    rows: &[ImageEnhancementInput],
    config: &ProcessingConfig,
    host: &dyn AssetHost,
) -> Result<OutputTable> {
    super::run_batch(rows, OutputColumn::EnhancedImage, config, host, |row, claims| {
        row.validate()?;
        let name = claims.claim(&derived_output_name(&row.file_name, ENHANCED_SUFFIX)?);

        ImageProcessor::open(config.resolve_input(&row.file_name))?
            .normalize_rgba()
            .enhance_contrast(row.contrast)
            .enhance_saturation(row.saturation)
            .save_tiff(config.output_path(&name))?;

        info!(
            source = %row.file_name,
            file = %name,
            contrast = row.contrast,
            saturation = row.saturation,
            "enhanced image written"
        );
        Ok(name)
    })
}
