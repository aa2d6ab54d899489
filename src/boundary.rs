//! Scene boundary accumulation and scene construction.
//!
//! [`BoundaryAccumulator`] collects cut timestamps while frames are being
//! scored. [`finalize`](BoundaryAccumulator::finalize) consumes it and
//! reconciles the list with the clip duration, producing
//! [`SceneBoundaries`]: strictly ascending, starting at `0.0`, ending at
//! the duration. Consecutive pairs of boundaries are the [`Scene`]s.
//!
//! # Example
//!
//! ```
//! use scenecut::BoundaryAccumulator;
//!
//! let mut accumulator = BoundaryAccumulator::new(30.0);
//! accumulator.observe(45.0, 4.0);
//! accumulator.observe(12.0, 6.0);
//!
//! let boundaries = accumulator.finalize(10.0, 0.0);
//! assert_eq!(boundaries.as_slice(), &[0.0, 4.0, 10.0]);
//! assert_eq!(boundaries.scenes().len(), 2);
//! ```

use serde::Serialize;

/// Default mean-difference cutoff on the 0–255 intensity scale.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

/// A half-open interval `[start, end)` between two consecutive boundaries,
/// in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scene {
    /// Start of the scene in seconds.
    pub start: f64,
    /// End of the scene in seconds.
    pub end: f64,
}

impl Scene {
    /// Length of the scene in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Boundary list under construction.
#[derive(Debug, Clone)]
pub struct BoundaryAccumulator {
    threshold: f64,
    boundaries: Vec<f64>,
}

impl BoundaryAccumulator {
    /// Start a list containing only `0.0`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            boundaries: vec![0.0],
        }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Most recent boundary.
    pub fn last(&self) -> f64 {
        self.boundaries.last().copied().unwrap_or(0.0)
    }

    /// Boundaries recorded so far.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Record a cut at `timestamp` when `score` exceeds the threshold.
    ///
    /// Returns `true` when a boundary was appended. Timestamps at or before
    /// the last boundary are ignored.
    pub fn observe(&mut self, score: f64, timestamp: f64) -> bool {
        if !(score > self.threshold) || !(timestamp > self.last()) {
            return false;
        }
        self.boundaries.push(timestamp);
        true
    }

    /// Close the list against the clip `duration`.
    ///
    /// Boundaries at or beyond `duration - tolerance` are dropped (except the
    /// leading `0.0`), then `duration` is appended if the list ends before
    /// it. Frame-count timing and container duration disagree slightly on
    /// variable-frame-rate sources; the tolerance keeps that from producing
    /// a sliver scene or a boundary past the end.
    pub fn finalize(mut self, duration: f64, tolerance: f64) -> SceneBoundaries {
        let cutoff = duration - tolerance.max(0.0);
        while self.boundaries.len() > 1 && self.last() >= cutoff {
            if let Some(dropped) = self.boundaries.pop() {
                log::debug!("Dropping boundary {dropped:.3}s near clip end {duration:.3}s");
            }
        }
        if self.last() < duration {
            self.boundaries.push(duration);
        }
        SceneBoundaries {
            boundaries: self.boundaries,
        }
    }
}

/// Finalized, strictly ascending boundary list.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBoundaries {
    boundaries: Vec<f64>,
}

impl SceneBoundaries {
    /// Boundary timestamps in seconds.
    pub fn as_slice(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Always `false`: a finalized list holds at least `0.0`.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Consecutive boundary pairs as scenes.
    pub fn scenes(&self) -> Vec<Scene> {
        self.boundaries
            .windows(2)
            .map(|pair| Scene {
                start: pair[0],
                end: pair[1],
            })
            .collect()
    }

    /// Take the boundary timestamps.
    pub fn into_vec(self) -> Vec<f64> {
        self.boundaries
    }
}
