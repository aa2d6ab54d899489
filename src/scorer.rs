//! Grayscale difference scoring.
//!
//! Each sampled frame is reduced to 8-bit luminance at full resolution and
//! compared with the previous sample by mean absolute difference. The result
//! is on the 0–255 intensity scale: identical frames score `0.0`, a cut from
//! black to white scores `255.0`.

use image::{GrayImage, Luma, RgbImage};

/// Convert an RGB frame to 8-bit luminance with the ITU-R BT.601 weights
/// (`0.299 R + 0.587 G + 0.114 B`), rounded to the nearest integer.
pub fn to_intensity(frame: &RgbImage) -> GrayImage {
    // 14-bit fixed point; the weights sum to exactly 1 << 14.
    const R_WEIGHT: u32 = 4899;
    const G_WEIGHT: u32 = 9617;
    const B_WEIGHT: u32 = 1868;
    const SHIFT: u32 = 14;

    let mut gray = GrayImage::new(frame.width(), frame.height());
    for (source, target) in frame.pixels().zip(gray.pixels_mut()) {
        let [r, g, b] = source.0;
        let luma = (r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT
            + (1 << (SHIFT - 1)))
            >> SHIFT;
        *target = Luma([luma as u8]);
    }
    gray
}

/// Mean over all pixels of `|current - previous|`.
///
/// Returns `None` when the two buffers differ in size or are empty.
pub fn mean_absolute_difference(current: &GrayImage, previous: &GrayImage) -> Option<f64> {
    if current.dimensions() != previous.dimensions() {
        return None;
    }

    let pixel_count = current.as_raw().len();
    if pixel_count == 0 {
        return None;
    }

    let total: u64 = current
        .as_raw()
        .iter()
        .zip(previous.as_raw())
        .map(|(&a, &b)| a.abs_diff(b) as u64)
        .sum();

    Some(total as f64 / pixel_count as f64)
}

/// Outcome of scoring one sampled frame.
#[derive(Debug, Clone)]
pub struct ScoredSample {
    /// Dissimilarity against the previous sample, absent for the first
    /// sample or after a frame-size change.
    pub score: Option<f64>,
    /// Luminance of the current frame; becomes the next `previous`.
    pub grayscale: GrayImage,
}

/// Scores sampled frames against their predecessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferenceScorer;

impl DifferenceScorer {
    /// Create a scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score `frame` against `previous`.
    ///
    /// The caller owns the returned grayscale buffer and passes it back in
    /// as `previous` for the next sample.
    pub fn score(&self, frame: &RgbImage, previous: Option<&GrayImage>) -> ScoredSample {
        let grayscale = to_intensity(frame);
        let score = previous.and_then(|previous| {
            let score = mean_absolute_difference(&grayscale, previous);
            if score.is_none() {
                log::debug!(
                    "Frame size changed from {:?} to {:?}; not scored",
                    previous.dimensions(),
                    grayscale.dimensions()
                );
            }
            score
        });
        ScoredSample { score, grayscale }
    }
}
