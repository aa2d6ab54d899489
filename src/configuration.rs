//! Detection configuration.
//!
//! [`DetectionOptions`] is a builder carrying the two tuning knobs
//! (threshold and frame skip) plus the operational settings a host may
//! inject: progress callback, cancellation token, progress cadence and the
//! duration-reconciliation tolerance.
//!
//! # Example
//!
//! ```
//! use scenecut::{CancellationToken, DetectionOptions};
//!
//! let token = CancellationToken::new();
//! let options = DetectionOptions::new()
//!     .with_threshold(25.0)
//!     .with_frame_skip(5)
//!     .with_cancellation(token.clone());
//! assert!(options.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::{
    boundary::DEFAULT_THRESHOLD,
    error::SceneError,
    progress::{CancellationToken, NoOpProgress, ProgressCallback},
    sampler::DEFAULT_FRAME_SKIP,
};

/// Progress is logged every `frame_skip * PROGRESS_FACTOR` decoded frames.
const PROGRESS_FACTOR: u64 = 100;

/// Settings for a detection run.
#[derive(Clone)]
pub struct DetectionOptions {
    /// Mean-difference cutoff on the 0–255 scale. Lower is more sensitive.
    pub(crate) threshold: f64,
    /// Sampling stride. Lower is finer and slower.
    pub(crate) frame_skip: u64,
    /// Explicit progress cadence in decoded frames.
    pub(crate) progress_interval: Option<u64>,
    /// Explicit end-of-clip tolerance in seconds.
    pub(crate) duration_tolerance: Option<f64>,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for DetectionOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DetectionOptions")
            .field("threshold", &self.threshold)
            .field("frame_skip", &self.frame_skip)
            .field("progress_interval", &self.progress_interval)
            .field("duration_tolerance", &self.duration_tolerance)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionOptions {
    /// Defaults: threshold 30.0, frame skip 10, progress every 1000 frames,
    /// half-frame tolerance, no callback, no cancellation.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            frame_skip: DEFAULT_FRAME_SKIP,
            progress_interval: None,
            duration_tolerance: None,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Set the mean-difference threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the sampling stride.
    #[must_use]
    pub fn with_frame_skip(mut self, frame_skip: u64) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// Call the progress callback every `interval` decoded frames (clamped to
    /// at least 1). Does not change how often progress is written to the
    /// run log.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = Some(interval.max(1));
        self
    }

    /// Set the end-of-clip tolerance in seconds.
    ///
    /// Detected boundaries closer than this to the clip duration are merged
    /// into the final boundary.
    #[must_use]
    pub fn with_duration_tolerance(mut self, seconds: f64) -> Self {
        self.duration_tolerance = Some(seconds);
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// A cancelled run stops before the next frame and returns
    /// [`SceneError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The configured sampling stride.
    pub fn frame_skip(&self) -> u64 {
        self.frame_skip
    }

    /// Effective progress-callback cadence in decoded frames.
    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
            .unwrap_or_else(|| self.log_interval())
            .max(1)
    }

    /// Cadence of `Processed i/total frames...` entries in the run log.
    pub fn log_interval(&self) -> u64 {
        self.frame_skip.saturating_mul(PROGRESS_FACTOR).max(1)
    }

    /// Effective end-of-clip tolerance for a stream at `frames_per_second`.
    pub fn duration_tolerance(&self, frames_per_second: f64) -> f64 {
        self.duration_tolerance.unwrap_or_else(|| {
            if frames_per_second > 0.0 {
                0.5 / frames_per_second
            } else {
                0.0
            }
        })
    }

    /// Check the options before a run.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidOptions`] for a zero frame skip, a
    /// negative or non-finite threshold, or a negative or non-finite
    /// tolerance.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.frame_skip == 0 {
            return Err(SceneError::InvalidOptions(
                "frame skip must be greater than zero".to_string(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SceneError::InvalidOptions(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if let Some(tolerance) = self.duration_tolerance
            && (!tolerance.is_finite() || tolerance < 0.0)
        {
            return Err(SceneError::InvalidOptions(format!(
                "duration tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        Ok(())
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
