// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printprep-imaging: Image operations for pre-press work.
//
// Provides image loading (flat rasters and layered documents), contrast and
// saturation enhancement, CMYK separation with alpha carried through, white
// underbase extraction, QR symbol rendering, and the batch processors that
// run each operation over a collection of rows.

pub mod color;
pub mod image;
pub mod processors;
pub mod qr;
pub mod underbase;

// Re-export the primary items so callers can use `printprep_imaging::QrGenerator` etc.
pub use color::CmykImage;
pub use crate::image::processor::ImageProcessor;
pub use processors::{
    convert_to_cmyk, enhance_images, extract_white_underbases, generate_qr_codes,
};
pub use qr::QrGenerator;
pub use underbase::extract_underbase;
