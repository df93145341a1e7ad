// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// White underbase extraction for printing on dark garments.
//
// Regions darker than the threshold receive white backing ink; the source
// alpha is copied through so transparent areas never get ink.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, instrument};

use crate::color::luma;

const INK: u8 = 255;
const NO_INK: u8 = 0;

/// Build the underbase layer for `image`.
///
/// Each output pixel is `(m, m, m, a)` where `m` is 255 when the source
/// pixel's luma is strictly below `threshold` (0 otherwise) and `a` is the
/// source pixel's alpha.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn extract_underbase(image: &DynamicImage, threshold: u8) -> RgbaImage {
    let rgba = image.to_rgba8();
    let mut mask = RgbaImage::new(rgba.width(), rgba.height());

    for (src, dst) in rgba.pixels().zip(mask.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let m = if luma(r, g, b) < threshold { INK } else { NO_INK };
        *dst = Rgba([m, m, m, a]);
    }

    debug!(coverage = ink_coverage(&mask), "Underbase mask built");
    mask
}

/// Fraction of visible (non-transparent) pixels that receive ink.
pub fn ink_coverage(mask: &RgbaImage) -> f32 {
    let (mut visible, mut inked) = (0u64, 0u64);
    for pixel in mask.pixels() {
        if pixel.0[3] > 0 {
            visible += 1;
            if pixel.0[0] == INK {
                inked += 1;
            }
        }
    }
    if visible == 0 {
        0.0
    } else {
        inked as f32 / visible as f32
    }
}
