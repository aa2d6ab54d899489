//! The detection loop.
//!
//! [`SceneDetector`] pulls frames from a [`FrameSource`] one at a time,
//! scores every `frame_skip`-th frame against the previous sampled frame and
//! records a boundary whenever the score exceeds the threshold. When the
//! source runs dry the boundary list is reconciled with the clip duration.
//!
//! Everything the loop mutates (previous grayscale buffer, accumulator,
//! progress tracker) is local to one call, so repeated runs over the same
//! input with the same options yield identical boundaries.
//!
//! # Example
//!
//! ```no_run
//! use scenecut::{DetectionOptions, MemoryLogSink, SceneDetector, SceneError};
//!
//! let detector = SceneDetector::new(DetectionOptions::new().with_threshold(20.0));
//! let sink = MemoryLogSink::new();
//! let boundaries = detector.detect_file("input.mp4", &sink)?;
//! for scene in boundaries.scenes() {
//!     println!("{:.2}s – {:.2}s", scene.start, scene.end);
//! }
//! # Ok::<(), SceneError>(())
//! ```

use std::path::Path;

use image::GrayImage;
use log::Level;

use crate::{
    boundary::{BoundaryAccumulator, Scene, SceneBoundaries},
    configuration::DetectionOptions,
    error::SceneError,
    log_sink::LogSink,
    progress::{BoundaryEvent, ProgressTracker},
    sampler::FrameSampler,
    scorer::DifferenceScorer,
    source::FrameSource,
    video::VideoFile,
};

/// Runs scene detection with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct SceneDetector {
    options: DetectionOptions,
}

impl SceneDetector {
    /// Create a detector.
    pub fn new(options: DetectionOptions) -> Self {
        Self { options }
    }

    /// The options this detector runs with.
    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Open `path` with FFmpeg and detect its scene boundaries.
    ///
    /// Open failures are recorded in `sink` at error severity before being
    /// returned. The video is closed when this returns, on every path.
    ///
    /// # Errors
    ///
    /// - [`SceneError::InvalidOptions`] if the options do not validate.
    /// - [`SceneError::PathNotFound`] if `path` does not exist.
    /// - [`SceneError::VideoOpen`] if the video cannot be decoded or has no
    ///   video stream.
    /// - [`SceneError::Cancelled`] if the cancellation token fires.
    pub fn detect_file<P: AsRef<Path>>(
        &self,
        path: P,
        sink: &dyn LogSink,
    ) -> Result<SceneBoundaries, SceneError> {
        let path = path.as_ref();

        if let Err(error) = self.options.validate() {
            emit(sink, Level::Error, &error.to_string());
            return Err(error);
        }

        let video = match VideoFile::open(path) {
            Ok(video) => video,
            Err(error) => {
                let message = match &error {
                    SceneError::VideoOpen { reason, .. } => format!("{error} ({reason})"),
                    _ => error.to_string(),
                };
                emit(sink, Level::Error, &message);
                return Err(error);
            }
        };

        emit(
            sink,
            Level::Info,
            &format!("Analyzing video: {}", path.display()),
        );
        self.detect(video, sink)
    }

    /// Detect scene boundaries in an already opened source.
    ///
    /// The source is consumed; pass `&mut source` to keep it.
    ///
    /// # Errors
    ///
    /// - [`SceneError::InvalidOptions`] if the options do not validate.
    /// - [`SceneError::Cancelled`] if the cancellation token fires.
    pub fn detect<S: FrameSource>(
        &self,
        mut source: S,
        sink: &dyn LogSink,
    ) -> Result<SceneBoundaries, SceneError> {
        if let Err(error) = self.options.validate() {
            emit(sink, Level::Error, &error.to_string());
            return Err(error);
        }

        let sampler = FrameSampler::new(self.options.frame_skip)?;
        let scorer = DifferenceScorer::new();
        let metadata = source.metadata().clone();

        emit(
            sink,
            Level::Info,
            &format!(
                "FPS: {}, Total Frames: {}, Frame Skip: {}",
                metadata.frames_per_second,
                metadata.frame_count,
                sampler.stride()
            ),
        );

        let mut accumulator = BoundaryAccumulator::new(self.options.threshold);
        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            Some(metadata.frame_count),
            self.options.progress_interval(),
        );
        let log_interval = self.options.log_interval();
        let mut previous: Option<GrayImage> = None;
        let mut cuts = 0usize;
        let mut frames_decoded = 0u64;

        loop {
            if self.options.is_cancelled() {
                emit(
                    sink,
                    Level::Warn,
                    &format!("Scene detection cancelled after {frames_decoded} frames"),
                );
                return Err(SceneError::Cancelled);
            }

            // Only sampled frames are converted to pixels.
            let index = if sampler.is_sampled(frames_decoded) {
                let Some(frame) = source.next_frame() else {
                    break;
                };
                let sample = scorer.score(&frame.image, previous.as_ref());
                if let Some(score) = sample.score {
                    let timestamp = metadata.index_to_seconds(frame.index);
                    if accumulator.observe(score, timestamp) {
                        cuts += 1;
                        emit(
                            sink,
                            Level::Info,
                            &format!("Scene detected at {timestamp:.2}s (mean_diff={score:.2})"),
                        );
                        tracker.boundary(&BoundaryEvent {
                            timestamp,
                            frame_index: frame.index,
                            score,
                        });
                    }
                }
                previous = Some(sample.grayscale);
                frame.index
            } else {
                let Some(index) = source.skip_frame() else {
                    break;
                };
                index
            };
            frames_decoded += 1;

            tracker.advance(index, cuts);
            if index % log_interval == 0 {
                emit(
                    sink,
                    Level::Info,
                    &format!("Processed {}/{} frames...", index, metadata.frame_count),
                );
            }
        }

        if let Some(fault) = source.decode_fault() {
            emit(
                sink,
                Level::Warn,
                &format!("Decoding stopped early after {frames_decoded} frames: {fault}"),
            );
        }

        let duration = if metadata.duration > 0.0 {
            metadata.duration
        } else {
            log::debug!("Source reports no duration; using {frames_decoded} decoded frames");
            metadata.index_to_seconds(frames_decoded)
        };
        let tolerance = self.options.duration_tolerance(metadata.frames_per_second);
        let boundaries = accumulator.finalize(duration, tolerance);
        tracker.finish(cuts);

        emit(
            sink,
            Level::Info,
            &format!(
                "Scene detection complete. Found {} scenes.",
                boundaries.len().saturating_sub(1)
            ),
        );

        Ok(boundaries)
    }
}

/// Detect the scenes of the video at `path`.
///
/// Shorthand for [`SceneDetector::detect_file`] followed by
/// [`SceneBoundaries::scenes`].
///
/// # Errors
///
/// See [`SceneDetector::detect_file`].
pub fn detect_scenes<P: AsRef<Path>>(
    path: P,
    options: DetectionOptions,
    sink: &dyn LogSink,
) -> Result<Vec<Scene>, SceneError> {
    SceneDetector::new(options)
        .detect_file(path, sink)
        .map(|boundaries| boundaries.scenes())
}

/// Record `message` in the run log and mirror it to the `log` facade.
fn emit(sink: &dyn LogSink, level: Level, message: &str) {
    log::log!(level, "{message}");
    sink.record(level, message);
}
