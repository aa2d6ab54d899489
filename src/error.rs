//! Error types for the `scenecut` crate.
//!
//! [`SceneError`] is returned by every fallible operation. The two errors a
//! caller is expected to see in practice are [`SceneError::PathNotFound`] and
//! [`SceneError::VideoOpen`]; their `Display` output is the message written
//! to the structured `{"error": ...}` result.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `scenecut` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SceneError {
    /// The video file does not exist.
    #[error("Video file '{}' does not exist", path.display())]
    PathNotFound {
        /// Path that was passed to the detector.
        path: PathBuf,
    },

    /// The decoding backend could not open or initialise the video, or the
    /// file holds no video stream.
    #[error("Failed to open video file '{}'", path.display())]
    VideoOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason reported by the backend.
        reason: String,
    },

    /// A detection option is out of range.
    #[error("Invalid detection options: {0}")]
    InvalidOptions(String),

    /// The run was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while writing the run log.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

/// Coarse classification of a [`SceneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist.
    PathNotFound,
    /// The backend could not initialise the stream.
    VideoOpenFailure,
    /// The options were rejected before any decoding started.
    InvalidOptions,
    /// The host cancelled the run.
    Cancelled,
    /// Anything else (backend or I/O failure).
    Internal,
}

impl SceneError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SceneError::PathNotFound { .. } => ErrorKind::PathNotFound,
            SceneError::VideoOpen { .. } => ErrorKind::VideoOpenFailure,
            SceneError::InvalidOptions(_) => ErrorKind::InvalidOptions,
            SceneError::Cancelled => ErrorKind::Cancelled,
            SceneError::FfmpegError(_) | SceneError::IoError(_) => ErrorKind::Internal,
        }
    }
}

impl From<FfmpegError> for SceneError {
    fn from(error: FfmpegError) -> Self {
        SceneError::FfmpegError(error.to_string())
    }
}
