// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR symbol rendering: black modules on white with a configurable quiet zone.

use image::{GrayImage, Luma, imageops};
use printprep_core::config::{QrErrorCorrection, QrSettings};
use printprep_core::error::PrintprepError;
use qrcode::{EcLevel, QrCode};
use tracing::{debug, instrument};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Renders text payloads as QR symbols.
///
/// The symbol version grows automatically to the smallest one that holds the
/// payload at the configured error-correction level.
#[derive(Debug, Clone, Copy)]
pub struct QrGenerator {
    settings: QrSettings,
}

impl QrGenerator {
    pub fn new(settings: QrSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &QrSettings {
        &self.settings
    }

    /// Encode `data` and rasterise it.
    ///
    /// The result is `(modules + 2 * border) * module_size` pixels square.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn render(&self, data: &str) -> Result<GrayImage, PrintprepError> {
        if data.is_empty() {
            return Err(PrintprepError::InvalidInput(
                "cannot encode an empty QR payload".into(),
            ));
        }

        let level = ec_level(self.settings.error_correction);
        let code = QrCode::with_error_correction_level(data.as_bytes(), level).map_err(|err| {
            PrintprepError::Encoding(format!(
                "{} bytes at error-correction level {:?}: {}",
                data.len(),
                self.settings.error_correction,
                err
            ))
        })?;
        debug!(version = ?code.version(), modules = code.width(), "QR payload encoded");

        let module = self.settings.module_size;
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(module, module)
            .dark_color(DARK)
            .light_color(LIGHT)
            .build();

        let pad = self.settings.border.saturating_mul(module);
        let mut canvas = GrayImage::from_pixel(
            symbol.width().saturating_add(pad.saturating_mul(2)),
            symbol.height().saturating_add(pad.saturating_mul(2)),
            LIGHT,
        );
        imageops::replace(&mut canvas, &symbol, i64::from(pad), i64::from(pad));
        Ok(canvas)
    }
}

fn ec_level(level: QrErrorCorrection) -> EcLevel {
    match level {
        QrErrorCorrection::Low => EcLevel::L,
        QrErrorCorrection::Medium => EcLevel::M,
        QrErrorCorrection::Quartile => EcLevel::Q,
        QrErrorCorrection::High => EcLevel::H,
    }
}
