//! # scenecut
//!
//! Detect hard scene cuts in video files.
//!
//! `scenecut` decodes a video front to back with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), scores
//! every Nth frame by the mean absolute grayscale difference to the previous
//! scored frame, and records a scene boundary whenever the score exceeds a
//! threshold. The boundaries are closed against the container duration and
//! paired into [`Scene`] intervals that tile the whole clip.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scenecut::{DetectionOptions, FileLogSink, SceneDetector, SceneReport, log_path_for};
//!
//! let video = "input.mp4";
//! let sink = FileLogSink::create(log_path_for(video)).unwrap();
//! let detector = SceneDetector::new(DetectionOptions::new().with_frame_skip(5));
//!
//! let result = detector.detect_file(video, &sink).map(|boundaries| boundaries.scenes());
//! println!("{}", SceneReport::from(result).to_json().unwrap());
//! ```
//!
//! ## Custom sources
//!
//! The loop runs over any [`FrameSource`]. [`FrameSequence`] serves frames
//! from memory, which is how the detection logic is tested without media
//! files.
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use scenecut::{DetectionOptions, FrameSequence, NullLogSink, SceneDetector, VideoMetadata};
//!
//! let mut frames = vec![RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])); 20];
//! frames.extend(vec![RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])); 20]);
//! let source = FrameSequence::new(VideoMetadata::new(10.0, 40, 4.0), frames);
//!
//! let boundaries = SceneDetector::new(DetectionOptions::new())
//!     .detect(source, &NullLogSink)
//!     .unwrap();
//! assert_eq!(boundaries.as_slice(), &[0.0, 2.0, 4.0]);
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system.

pub mod boundary;
pub mod configuration;
mod conversion;
pub mod detector;
pub mod error;
pub mod ffmpeg;
pub mod log_sink;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod scorer;
pub mod source;
pub mod video;

pub use boundary::{BoundaryAccumulator, DEFAULT_THRESHOLD, Scene, SceneBoundaries};
pub use configuration::DetectionOptions;
pub use detector::{SceneDetector, detect_scenes};
pub use error::{ErrorKind, SceneError};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use log_sink::{
    FileLogSink, LOG_FILE_SUFFIX, LogRecord, LogSink, MemoryLogSink, NullLogSink, log_path_for,
};
pub use metadata::VideoMetadata;
pub use progress::{BoundaryEvent, CancellationToken, ProgressCallback, ProgressInfo};
pub use report::{MISSING_PATH_MESSAGE, SceneReport};
pub use sampler::{DEFAULT_FRAME_SKIP, FrameSampler};
pub use scorer::{DifferenceScorer, ScoredSample, mean_absolute_difference, to_intensity};
pub use source::{Frame, FrameSequence, FrameSource};
pub use video::VideoFile;
