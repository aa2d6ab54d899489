//! Sequential frame sources.
//!
//! The detection loop pulls frames through the [`FrameSource`] trait. The
//! production implementation is [`VideoFile`](crate::VideoFile), which
//! decodes with FFmpeg; [`FrameSequence`] serves pre-decoded frames from
//! memory.
//!
//! # Example
//!
//! ```
//! use image::RgbImage;
//! use scenecut::{FrameSequence, FrameSource, VideoMetadata};
//!
//! let frames = vec![RgbImage::new(4, 4); 3];
//! let mut source = FrameSequence::new(VideoMetadata::new(25.0, 3, 0.12), frames);
//! assert_eq!(source.next_frame().map(|frame| frame.index), Some(0));
//! ```

use std::collections::VecDeque;

use image::RgbImage;

use crate::metadata::VideoMetadata;

/// A single decoded frame.
///
/// Frames are handed to the loop one at a time and dropped once scored.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 0-based position in decode order.
    pub index: u64,
    /// Decoded colour pixels.
    pub image: RgbImage,
}

/// A source of sequentially decoded frames.
pub trait FrameSource {
    /// Metadata captured when the source was opened.
    fn metadata(&self) -> &VideoMetadata;

    /// Decode the next frame. `None` signals the end of the stream.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Advance past the next frame without producing its pixels, returning
    /// its index. Used for frames the sampler does not score.
    fn skip_frame(&mut self) -> Option<u64> {
        self.next_frame().map(|frame| frame.index)
    }

    /// Description of a decode fault that ended the stream early, if any.
    ///
    /// A fault still ends the stream through `None` from
    /// [`next_frame`](FrameSource::next_frame); this only lets the caller
    /// tell the two apart after the fact.
    fn decode_fault(&self) -> Option<&str> {
        None
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn metadata(&self) -> &VideoMetadata {
        (**self).metadata()
    }

    fn next_frame(&mut self) -> Option<Frame> {
        (**self).next_frame()
    }

    fn skip_frame(&mut self) -> Option<u64> {
        (**self).skip_frame()
    }

    fn decode_fault(&self) -> Option<&str> {
        (**self).decode_fault()
    }
}

/// An in-memory frame source.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    metadata: VideoMetadata,
    frames: VecDeque<RgbImage>,
    next_index: u64,
    fault: Option<String>,
}

impl FrameSequence {
    /// Serve `frames` in order under the given metadata.
    pub fn new(metadata: VideoMetadata, frames: Vec<RgbImage>) -> Self {
        Self {
            metadata,
            frames: frames.into(),
            next_index: 0,
            fault: None,
        }
    }

    /// Report `reason` as a decode fault once the frames run out.
    pub fn with_decode_fault(mut self, reason: impl Into<String>) -> Self {
        self.fault = Some(reason.into());
        self
    }
}

impl FrameSource for FrameSequence {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Option<Frame> {
        let image = self.frames.pop_front()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(Frame { index, image })
    }

    fn decode_fault(&self) -> Option<&str> {
        if self.frames.is_empty() {
            self.fault.as_deref()
        } else {
            None
        }
    }
}
