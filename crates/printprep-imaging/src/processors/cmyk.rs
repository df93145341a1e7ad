// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RGB(A) → CMYK(A) TIFF.

use printprep_core::config::ProcessingConfig;
use printprep_core::error::Result;
use printprep_core::naming::{CMYK_SUFFIX, derived_output_name};
use printprep_core::types::{ImageFileInput, OutputColumn, OutputTable};
use printprep_host::AssetHost;
use tracing::{info, instrument};

use crate::color::CmykImage;
use crate::image::ImageProcessor;

/// Separate each row's image into CMYK and write `<file name>_CMYK.tiff`.
///
/// Sources with transparency keep it as a fifth, unassociated alpha sample.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn convert_to_cmyk(
    rows: &[ImageFileInput],
    config: &ProcessingConfig,
    host: &dyn AssetHost,
) -> Result<OutputTable> {
    super::run_batch(rows, OutputColumn::CmykImage, config, host, |row, claims| {
        let name = claims.claim(&derived_output_name(&row.file_name, CMYK_SUFFIX)?);
        let source = ImageProcessor::open(config.resolve_input(&row.file_name))?;

        let cmyk = CmykImage::from_dynamic(source.as_dynamic());
        cmyk.write_tiff(config.output_path(&name))?;

        info!(
            source = %row.file_name,
            file = %name,
            alpha = cmyk.has_alpha(),
            "CMYK image written"
        );
        Ok(name)
    })
}
