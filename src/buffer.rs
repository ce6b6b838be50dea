//! Pixel and intensity buffers handed between the pipeline stages.

use crate::errors::{HistogramError, Result};
use image::DynamicImage;

/// Bytes per pixel of every buffer the core accepts.
pub const RGBA_CHANNELS: usize = 4;

/// Expected byte length of an RGBA buffer, or `None` on overflow.
pub(crate) fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(RGBA_CHANNELS)
}

/// Decoded RGBA8 image, row-major. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps a flat RGBA buffer, checking it against the declared size.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        validate_rgba(&data, width, height)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / RGBA_CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// Checks the RGBA stride and the `width * height * 4` length contract.
pub(crate) fn validate_rgba(data: &[u8], width: u32, height: u32) -> Result<()> {
    if data.len() % RGBA_CHANNELS != 0 {
        tracing::warn!(len = data.len(), "pixel buffer is not RGBA aligned");
        return Err(HistogramError::invalid_format(format!(
            "buffer length {} is not a multiple of {}",
            data.len(),
            RGBA_CHANNELS
        )));
    }

    let expected = rgba_len(width, height).ok_or_else(|| {
        HistogramError::invalid_format(format!("{}x{} overflows the address space", width, height))
    })?;

    if expected != data.len() {
        tracing::warn!(width, height, len = data.len(), expected, "pixel buffer size mismatch");
        return Err(HistogramError::invalid_format(format!(
            "{}x{} RGBA needs {} bytes, got {}",
            width,
            height,
            expected,
            data.len()
        )));
    }

    Ok(())
}

/// One 8-bit intensity per source pixel, same ordering as the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityBuffer {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl IntensityBuffer {
    pub(crate) fn from_parts(width: u32, height: u32, values: Vec<u8>) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}
