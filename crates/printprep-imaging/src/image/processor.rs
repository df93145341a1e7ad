// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: loading (including flattened layered documents), RGBA
// normalisation, contrast and saturation enhancement, and file output.
// Operates on in-memory images using the `image` crate; layered `.psd`
// documents are composited with the `psd` crate.

use std::panic;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use printprep_core::error::PrintprepError;
use psd::Psd;
use tracing::{debug, info, instrument, warn};

use crate::color::luma;

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// ImageProcessor::open("logo.png")?
///     .normalize_rgba()
///     .enhance_contrast(1.5)
///     .enhance_saturation(1.2)
///     .save_tiff("out/logo_enhanced.tiff")?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    ///
    /// Layered `.psd` documents are flattened to their RGBA composite; every
    /// other format is decoded as-is.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrintprepError> {
        let path = path.as_ref();
        let img = if is_layered_document(path) {
            open_layered(path)?
        } else {
            image::open(path).map_err(|err| {
                PrintprepError::Decode(format!("failed to open {}: {}", path.display(), err))
            })?
        };
        info!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (PNG, TIFF, JPEG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PrintprepError> {
        let img = image::load_from_memory(data).map_err(|err| {
            PrintprepError::Decode(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert to 8-bit RGBA so transparency survives every later step.
    pub fn normalize_rgba(self) -> Self {
        match self.image {
            DynamicImage::ImageRgba8(_) => self,
            other => Self {
                image: DynamicImage::ImageRgba8(other.to_rgba8()),
            },
        }
    }

    /// Scale contrast by `factor` around the image's mean luma.
    ///
    /// 1.0 leaves the image unchanged, values above 1.0 push channels away
    /// from the mean and values below pull them towards it (0.0 gives a flat
    /// gray). Alpha is untouched.
    #[instrument(skip(self), fields(factor))]
    pub fn enhance_contrast(self, factor: f32) -> Self {
        let mut rgba = self.image.to_rgba8();
        let mean = mean_luma(&rgba) as f32;
        info!(factor, mean, "Adjusting contrast");

        for pixel in rgba.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                *channel = blend(mean, *channel, factor);
            }
        }

        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    /// Scale colour saturation by `factor`, blending each pixel with its own
    /// luma. 0.0 yields grayscale, 1.0 is a no-op. Alpha is untouched.
    #[instrument(skip(self), fields(factor))]
    pub fn enhance_saturation(self, factor: f32) -> Self {
        info!(factor, "Adjusting saturation");

        let mut rgba = self.image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let gray = luma(r, g, b) as f32;
            for channel in &mut pixel.0[..3] {
                *channel = blend(gray, *channel, factor);
            }
        }

        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image as TIFF, keeping its channel layout (alpha included).
    pub fn save_tiff(&self, path: impl AsRef<Path>) -> Result<(), PrintprepError> {
        self.save_as(path.as_ref(), ImageFormat::Tiff)
    }

    /// Write the image as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), PrintprepError> {
        self.save_as(path.as_ref(), ImageFormat::Png)
    }

    fn save_as(&self, path: &Path, format: ImageFormat) -> Result<(), PrintprepError> {
        self.image.save_with_format(path, format).map_err(|err| {
            PrintprepError::ImageWrite(format!(
                "failed to save image to {}: {}",
                path.display(),
                err
            ))
        })?;
        info!(path = %path.display(), ?format, "Image written");
        Ok(())
    }
}

/// Whether `path` names a layered document that must be flattened first.
fn is_layered_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("psd"))
}

/// Composite every visible layer of a `.psd` document into one RGBA image.
///
/// The `psd` parser trusts section lengths read from the file and panics on
/// truncated input; such a panic is reported as `Decode`.
fn open_layered(path: &Path) -> Result<DynamicImage, PrintprepError> {
    let bytes = std::fs::read(path).map_err(|err| {
        PrintprepError::Decode(format!("failed to read {}: {}", path.display(), err))
    })?;

    let parsed = panic::catch_unwind(|| {
        Psd::from_bytes(&bytes)
            .map(|psd| (psd.width(), psd.height(), psd.layers().len(), psd.rgba()))
    });
    let (width, height, layers, pixels) = match parsed {
        Ok(Ok(flattened)) => flattened,
        Ok(Err(err)) => {
            return Err(PrintprepError::Decode(format!(
                "failed to parse layered document {}: {}",
                path.display(),
                err
            )));
        }
        Err(_) => {
            warn!(path = %path.display(), "layered document parser panicked");
            return Err(PrintprepError::Decode(format!(
                "layered document {} is truncated or corrupt",
                path.display()
            )));
        }
    };
    debug!(width, height, layers, "Flattening layered document");

    let composite = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        PrintprepError::Decode(format!(
            "composite of {} does not match its {}x{} canvas",
            path.display(),
            width,
            height
        ))
    })?;
    Ok(DynamicImage::ImageRgba8(composite))
}

/// Rounded mean BT.601 luma over every pixel (transparent ones included).
fn mean_luma(rgba: &RgbaImage) -> u8 {
    let count = u64::from(rgba.width()) * u64::from(rgba.height());
    if count == 0 {
        return 0;
    }
    let sum: u64 = rgba
        .pixels()
        .map(|p| u64::from(luma(p.0[0], p.0[1], p.0[2])))
        .sum();
    ((sum + count / 2) / count) as u8
}

/// Linear interpolation from `base` towards (and past) `value`.
///
/// The result is truncated, not rounded, then clamped to 0..=255, which is
/// how PIL's `Image.blend` (and so `ImageEnhance`) quantises.
fn blend(base: f32, value: u8, factor: f32) -> u8 {
    let out = base + factor * (value as f32 - base);
    out.trunc().clamp(0.0, 255.0) as u8
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    fn two_tone() -> DynamicImage {
        // Left half dark red, right half light blue, varying alpha.
        let img = RgbaImage::from_fn(8, 4, |x, y| {
            let alpha = (y * 60) as u8 + 15;
            if x < 4 {
                Rgba([120, 40, 30, alpha])
            } else {
                Rgba([90, 160, 220, alpha])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn unit_factors_are_identity() {
        let src = two_tone();
        let out = ImageProcessor::from_dynamic(src.clone())
            .enhance_contrast(1.0)
            .enhance_saturation(1.0)
            .into_dynamic();
        assert_eq!(out.to_rgba8(), src.to_rgba8());
    }

    #[test]
    fn contrast_spreads_channels_from_the_mean() {
        let src = two_tone().to_rgba8();
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(src.clone()))
            .enhance_contrast(1.5)
            .into_dynamic()
            .to_rgba8();

        let mean = mean_luma(&src) as i32;
        for (before, after) in src.pixels().zip(out.pixels()) {
            for c in 0..3 {
                let d_before = (before.0[c] as i32 - mean).abs();
                let d_after = (after.0[c] as i32 - mean).abs();
                assert!(d_after >= d_before);
            }
            assert_eq!(before.0[3], after.0[3], "alpha must not change");
        }
    }

    #[test]
    fn zero_contrast_flattens_to_mean() {
        let src = two_tone().to_rgba8();
        let mean = mean_luma(&src);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(src))
            .enhance_contrast(0.0)
            .into_dynamic()
            .to_rgba8();
        assert!(out.pixels().all(|p| p.0[..3] == [mean, mean, mean]));
    }

    #[test]
    fn zero_saturation_is_grayscale() {
        let out = ImageProcessor::from_dynamic(two_tone())
            .enhance_saturation(0.0)
            .into_dynamic()
            .to_rgba8();
        for p in out.pixels() {
            assert_eq!(p.0[0], p.0[1]);
            assert_eq!(p.0[1], p.0[2]);
        }
    }

    #[test]
    fn saturation_leaves_gray_pixels_alone() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([77u8])));
        let out = ImageProcessor::from_dynamic(gray)
            .normalize_rgba()
            .enhance_saturation(2.5)
            .into_dynamic()
            .to_rgba8();
        assert!(out.pixels().all(|p| p.0 == [77, 77, 77, 255]));
    }

    #[test]
    fn normalize_converts_to_rgba8() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let out = ImageProcessor::from_dynamic(gray).normalize_rgba();
        assert!(matches!(out.as_dynamic(), DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn tiff_output_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tiff");
        let src = two_tone();
        ImageProcessor::from_dynamic(src.clone())
            .save_tiff(&path)
            .unwrap();

        let reloaded = ImageProcessor::open(&path).unwrap().into_dynamic();
        assert!(reloaded.color().has_alpha());
        assert_eq!(reloaded.to_rgba8(), src.to_rgba8());
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageProcessor::open(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, PrintprepError::Decode(_)));
    }

    #[test]
    fn garbage_layered_document_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.PSD");
        std::fs::write(&path, b"definitely not a photoshop file").unwrap();

        assert!(is_layered_document(&path));
        let err = ImageProcessor::open(&path).unwrap_err();
        assert!(matches!(err, PrintprepError::Decode(_)));
    }

    /// `8BPS` header for a 4x4 RGB document, 8 bits per channel.
    fn layered_header() -> Vec<u8> {
        let mut bytes = b"8BPS".to_vec();
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(&8u16.to_be_bytes());
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes
    }

    #[test]
    fn truncated_layered_document_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.psd");
        let mut bytes = layered_header();
        bytes.extend_from_slice(&[0xFF; 8]);
        std::fs::write(&path, bytes).unwrap();

        let err = ImageProcessor::open(&path).unwrap_err();
        assert!(matches!(err, PrintprepError::Decode(_)));
    }

    #[test]
    fn header_only_layered_document_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.psd");
        std::fs::write(&path, layered_header()).unwrap();

        let err = ImageProcessor::open(&path).unwrap_err();
        assert!(matches!(err, PrintprepError::Decode(_)));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(matches!(
            ImageProcessor::from_bytes(b"\x00\x01\x02"),
            Err(PrintprepError::Decode(_))
        ));
    }

    #[test]
    fn blend_clamps() {
        assert_eq!(blend(128.0, 250, 3.0), 255);
        assert_eq!(blend(128.0, 5, 3.0), 0);
        assert_eq!(blend(100.0, 100, 7.0), 100);
    }

    #[test]
    fn blend_truncates_fractions() {
        assert_eq!(blend(0.0, 3, 0.5), 1);
        assert_eq!(blend(10.0, 11, 0.99), 10);
        assert_eq!(blend(0.0, 1, -0.5), 0);
    }
}
