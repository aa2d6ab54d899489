//! Video metadata.
//!
//! [`VideoMetadata`] is read once when a source is opened and never changes
//! afterwards. Boundary timestamps are computed from
//! [`frames_per_second`](VideoMetadata::frames_per_second); the final
//! boundary comes from [`duration`](VideoMetadata::duration), which the
//! FFmpeg source takes from the container rather than from `frames / fps`.

/// Metadata for the analysed video stream.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frames per second as reported by the decoding backend (may be
    /// approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Total number of frames reported by the stream header, or estimated
    /// from duration and frame rate when the header has none.
    pub frame_count: u64,
    /// Clip duration in seconds.
    pub duration: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Codec name (e.g. `"h264"`), `"unknown"` for synthetic sources.
    pub codec: String,
}

impl VideoMetadata {
    /// Metadata for a source that only knows its timing, such as an
    /// in-memory frame sequence.
    pub fn new(frames_per_second: f64, frame_count: u64, duration: f64) -> Self {
        Self {
            frames_per_second,
            frame_count,
            duration,
            width: 0,
            height: 0,
            codec: "unknown".to_string(),
        }
    }

    /// Set the frame dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Duration of a single frame in seconds, or `0.0` when the frame rate
    /// is unknown.
    pub fn frame_period(&self) -> f64 {
        if self.frames_per_second > 0.0 {
            1.0 / self.frames_per_second
        } else {
            0.0
        }
    }

    /// Convert a 0-based frame index to seconds.
    pub fn index_to_seconds(&self, index: u64) -> f64 {
        if self.frames_per_second > 0.0 {
            index as f64 / self.frames_per_second
        } else {
            0.0
        }
    }
}
