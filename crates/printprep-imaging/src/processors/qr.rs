// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// URL → QR code PNG.

use chrono::Local;
use image::DynamicImage;
use printprep_core::config::ProcessingConfig;
use printprep_core::error::Result;
use printprep_core::naming::{QR_PREFIX, timestamped_name, unique_name};
use printprep_core::types::{OutputColumn, OutputTable, UrlInput};
use printprep_host::AssetHost;
use tracing::{info, instrument};

use crate::image::ImageProcessor;
use crate::qr::QrGenerator;

/// Render one QR code PNG per URL.
///
/// Files are named `qrcode_<YYYYMMDD_HHMMSS_micros>.png` from the time each
/// row is written; the table column is `qr_code`.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn generate_qr_codes(
    rows: &[UrlInput],
    config: &ProcessingConfig,
    host: &dyn AssetHost,
) -> Result<OutputTable> {
    let generator = QrGenerator::new(config.qr);

    super::run_batch(rows, OutputColumn::QrCode, config, host, |row, claims| {
        let symbol = generator.render(&row.url)?;

        let name = claims.claim(&unique_name(
            &config.output_dir,
            &timestamped_name(QR_PREFIX, "png", &Local::now()),
        ));
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(symbol))
            .save_png(config.output_path(&name))?;

        info!(url = %row.url, file = %name, "QR code written");
        Ok(name)
    })
}
