//! Grayscale intensity histograms for decoded raster images.
//!
//! The pipeline runs in three pure stages:
//! [`grayscale::convert`] turns RGBA pixels into intensities,
//! [`histogram::accumulate`] counts them into 256 bins, and
//! [`render::render`] draws the bins as a bar chart scaled to the fullest bin.
//! [`pipeline::process`] chains them for one image.

pub mod buffer;
pub mod errors;
pub mod grayscale;
pub mod histogram;
pub mod image_loader;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod settings;

mod tests;

pub use buffer::{IntensityBuffer, PixelBuffer};
pub use errors::{HistogramError, Result};
pub use grayscale::GrayscaleMode;
pub use histogram::{Histogram, BIN_COUNT};
pub use pipeline::{process, HistogramOutput, ImageRequest, ProcessOptions};
pub use render::{OutputBitmap, RenderSpec};

/// Pixel count from which conversion and accumulation switch to rayon.
pub(crate) const PARALLEL_THRESHOLD: usize = 256 * 1024;
