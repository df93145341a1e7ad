// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RGB → CMYK separation with alpha carried alongside.
//
// The separation itself has no notion of transparency, so the alpha plane is
// lifted off the source before conversion and re-attached afterwards. Output
// is an 8-bit Separated TIFF: C,M,Y,K (+A as an unassociated extra sample)
// interleaved in a single strip.

use std::fs::File;
use std::path::Path;

use image::DynamicImage;
use printprep_core::error::PrintprepError;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tracing::{debug, info, instrument};

/// TIFF PhotometricInterpretation "Separated" (usually CMYK).
const PHOTOMETRIC_SEPARATED: u16 = 5;
/// TIFF ExtraSamples value for unassociated (straight) alpha.
const EXTRA_SAMPLE_UNASSOCIATED_ALPHA: u16 = 2;
const COMPRESSION_NONE: u16 = 1;
const PLANAR_CHUNKY: u16 = 1;
const SAMPLE_FORMAT_UINT: u16 = 1;

/// An 8-bit CMYK raster with an optional alpha plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmykImage {
    width: u32,
    height: u32,
    /// C, M, Y, K interleaved, row-major.
    data: Vec<u8>,
    /// One byte per pixel, present when the source carried transparency.
    alpha: Option<Vec<u8>>,
}

impl CmykImage {
    /// Separate `image` into CMYK.
    ///
    /// Gray and palette sources go through RGB first. The separation is the
    /// device-naive one (`C = 255 - R`, `M = 255 - G`, `Y = 255 - B`,
    /// `K = 0`); no ICC profile is involved.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let has_alpha = image.color().has_alpha();
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect::<Vec<u8>>());

        let mut data = Vec::with_capacity(rgba.as_raw().len());
        for pixel in rgba.pixels() {
            let [r, g, b, _] = pixel.0;
            data.extend_from_slice(&[255 - r, 255 - g, 255 - b, 0]);
        }

        debug!(has_alpha, "CMYK separation complete");
        Self {
            width,
            height,
            data,
            alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// The re-attached alpha plane, if the source had one.
    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// CMYK samples without alpha, four bytes per pixel.
    pub fn cmyk_data(&self) -> &[u8] {
        &self.data
    }

    /// 4 for plain CMYK, 5 when alpha is carried.
    pub fn samples_per_pixel(&self) -> u16 {
        if self.has_alpha() { 5 } else { 4 }
    }

    /// Pixel samples as written to disk: CMYK or CMYKA interleaved.
    pub fn interleaved(&self) -> Vec<u8> {
        match &self.alpha {
            None => self.data.clone(),
            Some(alpha) => {
                let mut out = Vec::with_capacity(self.data.len() + alpha.len());
                for (cmyk, a) in self.data.chunks_exact(4).zip(alpha) {
                    out.extend_from_slice(cmyk);
                    out.push(*a);
                }
                out
            }
        }
    }

    /// Write an uncompressed 8-bit Separated TIFF.
    ///
    /// Output is deterministic: the same image always produces the same bytes.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn write_tiff(&self, path: impl AsRef<Path>) -> Result<(), PrintprepError> {
        let path = path.as_ref();
        let write_err = |err: tiff::TiffError| {
            PrintprepError::ImageWrite(format!(
                "failed to write CMYK TIFF {}: {}",
                path.display(),
                err
            ))
        };

        let file = File::create(path).map_err(|err| {
            PrintprepError::ImageWrite(format!("failed to create {}: {}", path.display(), err))
        })?;
        let mut encoder = TiffEncoder::new(file).map_err(write_err)?;

        let samples = self.samples_per_pixel();
        let pixels = self.interleaved();
        let too_large = || {
            PrintprepError::ImageWrite(format!(
                "{}x{} CMYK image does not fit a classic TIFF",
                self.width, self.height
            ))
        };
        let byte_count = u32::try_from(pixels.len()).map_err(|_| too_large())?;
        let bits = vec![8u16; samples as usize];
        let formats = vec![SAMPLE_FORMAT_UINT; samples as usize];

        let mut dir = encoder.image_directory().map_err(write_err)?;
        let offset = dir.write_data(&pixels[..]).map_err(write_err)?;
        let offset = u32::try_from(offset).map_err(|_| too_large())?;

        dir.write_tag(Tag::ImageWidth, self.width).map_err(write_err)?;
        dir.write_tag(Tag::ImageLength, self.height).map_err(write_err)?;
        dir.write_tag(Tag::BitsPerSample, &bits[..]).map_err(write_err)?;
        dir.write_tag(Tag::Compression, COMPRESSION_NONE).map_err(write_err)?;
        dir.write_tag(Tag::PhotometricInterpretation, PHOTOMETRIC_SEPARATED)
            .map_err(write_err)?;
        dir.write_tag(Tag::StripOffsets, offset).map_err(write_err)?;
        dir.write_tag(Tag::SamplesPerPixel, samples).map_err(write_err)?;
        dir.write_tag(Tag::RowsPerStrip, self.height).map_err(write_err)?;
        dir.write_tag(Tag::StripByteCounts, byte_count).map_err(write_err)?;
        dir.write_tag(Tag::PlanarConfiguration, PLANAR_CHUNKY).map_err(write_err)?;
        dir.write_tag(Tag::SampleFormat, &formats[..]).map_err(write_err)?;
        if self.has_alpha() {
            dir.write_tag(Tag::ExtraSamples, &[EXTRA_SAMPLE_UNASSOCIATED_ALPHA][..])
                .map_err(write_err)?;
        }
        dir.finish().map_err(write_err)?;

        info!(samples, bytes = byte_count, "CMYK TIFF written");
        Ok(())
    }
}
