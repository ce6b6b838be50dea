//! Bar-chart rendering of a [`Histogram`] into an RGBA bitmap.
//!
//! Bars grow upward from the bottom edge (y = 0 is the top row). Each bin is
//! `horizontal_scale` pixels wide, so the output is `256 * scale` wide and as
//! tall as the source image.

use crate::buffer::RGBA_CHANNELS;
use crate::errors::{HistogramError, Result};
use crate::histogram::{Histogram, BIN_COUNT};
use image::RgbaImage;
use rayon::prelude::*;
use std::path::Path;

/// Default bar colour, opaque red.
pub const DEFAULT_FILL: [u8; 4] = [255, 0, 0, 255];
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSpec {
    horizontal_scale: u32,
    fill_color: [u8; 4],
    background_color: [u8; 4],
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            horizontal_scale: 1,
            fill_color: DEFAULT_FILL,
            background_color: TRANSPARENT,
        }
    }
}

impl RenderSpec {
    pub fn new(horizontal_scale: u32, fill_color: [u8; 4]) -> Result<Self> {
        if horizontal_scale == 0 {
            return Err(HistogramError::InvalidRenderSpec {
                message: "horizontal scale must be at least 1".to_string(),
            });
        }
        if horizontal_scale.checked_mul(BIN_COUNT as u32).is_none() {
            return Err(HistogramError::InvalidRenderSpec {
                message: format!("horizontal scale {} is too large", horizontal_scale),
            });
        }
        Ok(Self {
            horizontal_scale,
            fill_color,
            background_color: TRANSPARENT,
        })
    }

    #[must_use]
    pub fn with_background(mut self, background_color: [u8; 4]) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn horizontal_scale(&self) -> u32 {
        self.horizontal_scale
    }

    pub fn fill_color(&self) -> [u8; 4] {
        self.fill_color
    }

    pub fn background_color(&self) -> [u8; 4] {
        self.background_color
    }

    pub fn output_width(&self) -> u32 {
        self.horizontal_scale * BIN_COUNT as u32
    }
}

/// Rendered histogram, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl OutputBitmap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        RGBA_CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        let px = &self.data[idx..idx + RGBA_CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            HistogramError::invalid_format(format!(
                "bitmap data does not fit {}x{}",
                self.width, self.height
            ))
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let image = self.to_rgba_image()?;
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| HistogramError::ExportError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::info!(path = %path.display(), "histogram exported");
        Ok(())
    }
}

/// Bar height in pixels for every bin, scaled so the fullest bin spans
/// `source_height`. All zeros when the histogram is degenerate.
pub fn bar_heights(hist: &Histogram, source_height: u32) -> [u32; BIN_COUNT] {
    let mut heights = [0u32; BIN_COUNT];
    let max = hist.max_count();
    if max == 0 {
        return heights;
    }

    let height = u128::from(source_height);
    let max = u128::from(max);
    for (bar, &count) in heights.iter_mut().zip(hist.bins().iter()) {
        // round(count * height / max), halves rounded up; count <= max keeps it <= height
        *bar = ((2 * u128::from(count) * height + max) / (2 * max)) as u32;
    }
    heights
}

pub fn render(hist: &Histogram, source_height: u32, spec: &RenderSpec) -> OutputBitmap {
    let width = spec.output_width();
    let row_len = width as usize * RGBA_CHANNELS;
    let mut data = vec![0u8; row_len * source_height as usize];

    let background = spec.background_color;
    if background != TRANSPARENT {
        data.par_chunks_exact_mut(RGBA_CHANNELS)
            .for_each(|px| px.copy_from_slice(&background));
    }

    if hist.is_degenerate() {
        tracing::debug!(source_height, "degenerate histogram, rendering blank output");
        return OutputBitmap {
            width,
            height: source_height,
            data,
        };
    }

    let heights = bar_heights(hist, source_height);
    let scale = spec.horizontal_scale as usize;
    let fill = spec.fill_color;

    data.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            // A bar of height h covers rows [source_height - h, source_height - 1]
            let rows_below = source_height - y as u32;
            for (bin, &bar) in heights.iter().enumerate() {
                if bar < rows_below {
                    continue;
                }
                let start = bin * scale * RGBA_CHANNELS;
                let end = start + scale * RGBA_CHANNELS;
                for px in row[start..end].chunks_exact_mut(RGBA_CHANNELS) {
                    px.copy_from_slice(&fill);
                }
            }
        });

    OutputBitmap {
        width,
        height: source_height,
        data,
    }
}
