// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour helpers shared by the enhancement and underbase passes, plus the
// print (CMYK) separation.

pub mod cmyk;

pub use cmyk::CmykImage;

/// ITU-R BT.601 luma in fixed point: `0.299 R + 0.587 G + 0.114 B`, rounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 0x8000) >> 16) as u8
}
