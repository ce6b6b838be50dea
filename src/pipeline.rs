//! One-shot image → histogram bitmap pipeline.
//!
//! Called once per decoded image, after the loader reports the image ready.

use crate::buffer::{PixelBuffer, RGBA_CHANNELS};
use crate::errors::{HistogramError, Result};
use crate::grayscale::{self, GrayscaleMode};
use crate::histogram::{self, Histogram};
use crate::render::{self, OutputBitmap, RenderSpec};
use image::DynamicImage;
use std::time::Instant;

/// A decoded image handed over by the loading layer.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl ImageRequest {
    pub fn rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            channels: RGBA_CHANNELS,
        }
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let buffer = PixelBuffer::from_image(image);
        let (width, height) = (buffer.width(), buffer.height());
        Self::rgba(buffer.into_raw(), width, height)
    }

    fn into_pixels(self) -> Result<PixelBuffer> {
        if self.channels != RGBA_CHANNELS {
            return Err(HistogramError::invalid_format(format!(
                "expected {} channels, got {}",
                RGBA_CHANNELS, self.channels
            )));
        }
        PixelBuffer::new(self.width, self.height, self.data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub mode: GrayscaleMode,
    pub render: RenderSpec,
}

/// Everything produced for one image.
#[derive(Debug, Clone)]
pub struct HistogramOutput {
    pub histogram: Histogram,
    pub bitmap: OutputBitmap,
}

pub fn process(request: ImageRequest, options: &ProcessOptions) -> Result<HistogramOutput> {
    let span = tracing::debug_span!("histogram_pipeline", width = request.width, height = request.height);
    let _enter = span.enter();
    let start = Instant::now();

    let pixels = request.into_pixels()?;
    let histogram = compute_histogram(&pixels, options.mode);
    let bitmap = render::render(&histogram, pixels.height(), &options.render);

    tracing::debug!(
        max_count = histogram.max_count(),
        peak = ?histogram.peak_bin(),
        duration_ms = start.elapsed().as_millis() as u64,
        "histogram rendered"
    );

    Ok(HistogramOutput { histogram, bitmap })
}

pub fn compute_histogram(pixels: &PixelBuffer, mode: GrayscaleMode) -> Histogram {
    let intensities = grayscale::convert_with(pixels, mode);
    histogram::accumulate(&intensities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_rgba_channel_count() {
        let request = ImageRequest {
            data: vec![0; 6],
            width: 2,
            height: 1,
            channels: 3,
        };
        let err = process(request, &ProcessOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FORMAT");
    }

    #[test]
    fn test_two_pixel_scenario() {
        let request = ImageRequest::rgba(vec![10, 0, 0, 255, 10, 0, 0, 255], 2, 1);
        let out = process(request, &ProcessOptions::default()).unwrap();

        assert_eq!(out.histogram.count(10), 2);
        assert_eq!(out.histogram.total(), 2);
        assert_eq!(out.bitmap.height(), 1);
        assert_eq!(out.bitmap.pixel(10, 0), Some(render::DEFAULT_FILL));
        assert_eq!(out.bitmap.pixel(9, 0), Some(render::TRANSPARENT));
        assert_eq!(out.bitmap.pixel(11, 0), Some(render::TRANSPARENT));
    }
}
