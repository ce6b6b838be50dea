//! RGBA to 8-bit intensity conversion.
//!
//! The default mode reads channel 0 (red) of every pixel as its intensity.
//! Input is expected to already be grayscale rendered into RGBA, so this is
//! not a colour-accurate conversion: a saturated blue pixel maps to 0.
//! [`GrayscaleMode::Luma`] opts into BT.601 weighting for colour sources.

use crate::buffer::{validate_rgba, IntensityBuffer, PixelBuffer, RGBA_CHANNELS};
use crate::errors::Result;
use crate::PARALLEL_THRESHOLD;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GrayscaleMode {
    /// Intensity is the red channel as-is.
    #[default]
    RedChannel,
    /// ITU-R BT.601 luma, rounded half up.
    Luma,
}

impl GrayscaleMode {
    pub fn name(&self) -> &'static str {
        match self {
            GrayscaleMode::RedChannel => "Red channel",
            GrayscaleMode::Luma => "Luma (BT.601)",
        }
    }

    pub fn all() -> &'static [GrayscaleMode] {
        &[GrayscaleMode::RedChannel, GrayscaleMode::Luma]
    }

    #[inline]
    fn intensity(self, px: &[u8]) -> u8 {
        match self {
            GrayscaleMode::RedChannel => px[0],
            GrayscaleMode::Luma => {
                // Coefficients scaled by 1000, +500 rounds half up
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
            }
        }
    }
}

/// Converts with the default [`GrayscaleMode::RedChannel`].
pub fn convert(pixels: &PixelBuffer) -> IntensityBuffer {
    convert_with(pixels, GrayscaleMode::RedChannel)
}

pub fn convert_with(pixels: &PixelBuffer, mode: GrayscaleMode) -> IntensityBuffer {
    let parallel = pixels.pixel_count() >= PARALLEL_THRESHOLD;
    let values = convert_bytes(pixels.as_bytes(), mode, parallel);
    IntensityBuffer::from_parts(pixels.width(), pixels.height(), values)
}

/// Converts a flat RGBA slice that has not been wrapped in a [`PixelBuffer`].
pub fn convert_raw(
    data: &[u8],
    width: u32,
    height: u32,
    mode: GrayscaleMode,
) -> Result<IntensityBuffer> {
    validate_rgba(data, width, height)?;
    let parallel = data.len() / RGBA_CHANNELS >= PARALLEL_THRESHOLD;
    Ok(IntensityBuffer::from_parts(
        width,
        height,
        convert_bytes(data, mode, parallel),
    ))
}

fn convert_bytes(data: &[u8], mode: GrayscaleMode, parallel: bool) -> Vec<u8> {
    if parallel {
        data.par_chunks_exact(RGBA_CHANNELS)
            .map(|px| mode.intensity(px))
            .collect()
    } else {
        data.chunks_exact(RGBA_CHANNELS)
            .map(|px| mode.intensity(px))
            .collect()
    }
}
