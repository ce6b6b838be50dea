//! 256-bin intensity histogram.

use crate::buffer::IntensityBuffer;
use crate::PARALLEL_THRESHOLD;
use rayon::prelude::*;

pub const BIN_COUNT: usize = 256;

/// Chunk size handed to each rayon worker when accumulating in parallel.
const CHUNK_SIZE: usize = 16 * 1024;

/// Count of pixels per intensity value.
///
/// The sum of all bins always equals the number of intensities accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; BIN_COUNT],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; BIN_COUNT],
        }
    }
}

impl Histogram {
    pub fn bins(&self) -> &[u64; BIN_COUNT] {
        &self.bins
    }

    pub fn count(&self, intensity: u8) -> u64 {
        self.bins[usize::from(intensity)]
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// True when no pixel was counted, so there is nothing to normalise against.
    pub fn is_degenerate(&self) -> bool {
        self.max_count() == 0
    }

    /// Lowest intensity holding the maximum count, `None` if degenerate.
    pub fn peak_bin(&self) -> Option<u8> {
        let max = self.max_count();
        if max == 0 {
            return None;
        }
        self.bins.iter().position(|&c| c == max).map(|i| i as u8)
    }

    /// Elementwise sum of two histograms.
    #[must_use]
    pub fn merge(&self, other: &Histogram) -> Histogram {
        let mut bins = self.bins;
        for (a, b) in bins.iter_mut().zip(other.bins.iter()) {
            *a += b;
        }
        Histogram { bins }
    }

    fn add_all(mut self, values: &[u8]) -> Self {
        for &v in values {
            self.bins[usize::from(v)] += 1;
        }
        self
    }
}

pub fn accumulate(intensities: &IntensityBuffer) -> Histogram {
    accumulate_slice(intensities.as_slice())
}

pub fn accumulate_slice(values: &[u8]) -> Histogram {
    let histogram = if values.len() >= PARALLEL_THRESHOLD {
        accumulate_parallel(values)
    } else {
        Histogram::default().add_all(values)
    };
    debug_assert_eq!(histogram.total(), values.len() as u64);
    histogram
}

fn accumulate_parallel(values: &[u8]) -> Histogram {
    values
        .par_chunks(CHUNK_SIZE)
        .fold(Histogram::default, |acc, chunk| acc.add_all(chunk))
        .reduce(Histogram::default, |a, b| a.merge(&b))
}
