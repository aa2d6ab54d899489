//! Progress reporting and cancellation support.
//!
//! [`ProgressCallback`] observes a detection run: periodic
//! [`ProgressInfo`] snapshots and one [`BoundaryEvent`] per detected cut.
//! Callbacks cannot influence the result. [`CancellationToken`] is the only
//! way to stop a run early; the loop checks it once per decoded frame.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scenecut::{
//!     BoundaryEvent, DetectionOptions, NullLogSink, ProgressCallback, ProgressInfo,
//!     SceneDetector, SceneError,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.1}% complete");
//!         }
//!     }
//!
//!     fn on_boundary(&self, event: &BoundaryEvent) {
//!         println!("cut at {:.2}s", event.timestamp);
//!     }
//! }
//!
//! let options = DetectionOptions::new().with_progress(Arc::new(PrintProgress));
//! let scenes = SceneDetector::new(options).detect_file("input.mp4", &NullLogSink)?;
//! # Ok::<(), SceneError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// A snapshot of detection progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Index of the frame just decoded.
    pub current_frame: u64,
    /// Total frames reported by the source, if known.
    pub total_frames: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if the total is known.
    pub percentage: Option<f32>,
    /// Boundaries detected so far, excluding the leading `0.0`.
    pub boundaries_found: usize,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on throughput so far.
    pub estimated_remaining: Option<Duration>,
}

/// A cut detected during the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEvent {
    /// Boundary timestamp in seconds (`frame_index / fps`).
    pub timestamp: f64,
    /// Index of the sampled frame that triggered the boundary.
    pub frame_index: u64,
    /// Mean absolute difference that exceeded the threshold.
    pub score: f64,
}

/// Trait for observing a detection run.
///
/// Implementations must be [`Send`] and [`Sync`] so one callback can be
/// shared between runs on different threads.
pub trait ProgressCallback: Send + Sync {
    /// Called every `progress_interval` decoded frames and once at the end.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called for every boundary appended to the list.
    fn on_boundary(&self, _event: &BoundaryEvent) {}
}

/// Discards all notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state: cancelling any clone cancels the run holding the
/// token.
///
/// ```
/// use scenecut::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks timing and decides when to emit progress snapshots.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    interval: u64,
    start_time: Instant,
    frames_seen: u64,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: Option<u64>, interval: u64) -> Self {
        Self {
            callback,
            total: total.filter(|&t| t > 0),
            interval: interval.max(1),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Record one decoded frame. Returns the snapshot when `frame_index` is
    /// a multiple of the interval, after passing it to the callback.
    pub(crate) fn advance(&mut self, frame_index: u64, boundaries_found: usize) -> Option<ProgressInfo> {
        self.frames_seen += 1;
        if frame_index % self.interval != 0 {
            return None;
        }
        let info = self.snapshot(frame_index, boundaries_found);
        self.callback.on_progress(&info);
        Some(info)
    }

    pub(crate) fn boundary(&self, event: &BoundaryEvent) {
        self.callback.on_boundary(event);
    }

    /// Unconditionally emit a final snapshot.
    pub(crate) fn finish(&self, boundaries_found: usize) {
        let last_frame = self.frames_seen.saturating_sub(1);
        let info = self.snapshot(last_frame, boundaries_found);
        self.callback.on_progress(&info);
    }

    fn snapshot(&self, frame_index: u64, boundaries_found: usize) -> ProgressInfo {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .map(|t| ((self.frames_seen as f32 / t as f32) * 100.0).min(100.0));

        let estimated_remaining = if self.frames_seen > 0 {
            self.total.map(|t| {
                let remaining = t.saturating_sub(self.frames_seen);
                elapsed.mul_f64(remaining as f64 / self.frames_seen as f64)
            })
        } else {
            None
        };

        ProgressInfo {
            current_frame: frame_index,
            total_frames: self.total,
            percentage,
            boundaries_found,
            elapsed,
            estimated_remaining,
        }
    }
}
