//! FFmpeg-backed frame source.
//!
//! [`VideoFile`] opens a container, picks the best video stream and decodes
//! it front to back. Frames pulled with `next_frame` are converted to packed
//! RGB; frames passed over with `skip_frame` are decoded but never scaled,
//! since the decoder needs every packet. Dropping the handle closes the
//! demuxer and the decoder, so the underlying resources are released on
//! every exit path.
//!
//! # Example
//!
//! ```no_run
//! use scenecut::{FrameSource, SceneError, VideoFile};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! println!("{:.3} fps, {:.2}s", video.metadata().frames_per_second, video.metadata().duration);
//! while let Some(frame) = video.next_frame() {
//!     println!("frame {} ({}x{})", frame.index, frame.image.width(), frame.image.height());
//! }
//! # Ok::<(), SceneError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{
    conversion,
    error::SceneError,
    metadata::VideoMetadata,
    source::{Frame, FrameSource},
};

/// Consecutive demux/decode failures tolerated before the stream is
/// considered broken.
const MAX_CONSECUTIVE_ERRORS: u32 = 16;

/// A video file opened for sequential decoding.
pub struct VideoFile {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    metadata: VideoMetadata,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    next_index: u64,
    consecutive_errors: u32,
    eof_sent: bool,
    done: bool,
    fault: Option<String>,
    file_path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("next_index", &self.next_index)
            .field("done", &self.done)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for decoding.
    ///
    /// Initializes FFmpeg (idempotent), opens the container, selects the
    /// best video stream and reads its metadata.
    ///
    /// # Errors
    ///
    /// - [`SceneError::PathNotFound`] if `path` does not exist.
    /// - [`SceneError::VideoOpen`] if FFmpeg cannot open the container, the
    ///   container holds no video stream, or no decoder can be built for it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        if !path.exists() {
            return Err(SceneError::PathNotFound { path: file_path });
        }

        log::debug!("Opening video file: {}", file_path.display());

        let open_error = |reason: String| SceneError::VideoOpen {
            path: file_path.clone(),
            reason,
        };

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let (video_stream_index, frames_per_second, header_frames, stream_seconds, decoder) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| open_error("No video stream found".to_string()))?;

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| open_error(format!("Failed to read codec parameters: {error}")))?;
            let decoder = decoder_context
                .decoder()
                .video()
                .map_err(|error| open_error(format!("Failed to create video decoder: {error}")))?;

            // Average frame rate first, then the stream's real base rate.
            let frames_per_second = conversion::rational_to_f64(stream.avg_frame_rate())
                .or_else(|| conversion::rational_to_f64(stream.rate()))
                .unwrap_or(0.0);

            let stream_seconds = (stream.duration() > 0)
                .then(|| conversion::pts_to_seconds(stream.duration(), stream.time_base()));

            (
                stream.index(),
                frames_per_second,
                stream.frames(),
                stream_seconds,
                decoder,
            )
        };

        if frames_per_second <= 0.0 {
            return Err(open_error("Video stream reports no frame rate".to_string()));
        }
        if decoder.width() == 0 || decoder.height() == 0 {
            return Err(open_error("Video stream reports zero frame size".to_string()));
        }

        // Container duration is the reference end of the clip; fall back to
        // the stream header and only then to the frame count.
        let duration = conversion::container_duration_to_seconds(input_context.duration())
            .or(stream_seconds)
            .unwrap_or(0.0);

        let frame_count = if header_frames > 0 {
            header_frames as u64
        } else {
            (duration * frames_per_second) as u64
        };

        let duration = if duration > 0.0 {
            duration
        } else {
            frame_count as f64 / frames_per_second
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| open_error(format!("Failed to create scaler: {error}")))?;

        let metadata = VideoMetadata {
            frames_per_second,
            frame_count,
            duration,
            width: decoder.width(),
            height: decoder.height(),
            codec,
        };

        log::debug!(
            "Opened {} (stream={}, {}x{}, {:.3} fps, {} frames, {:.3}s)",
            file_path.display(),
            video_stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.duration,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            metadata,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            next_index: 0,
            consecutive_errors: 0,
            eof_sent: false,
            done: false,
            fault: None,
            file_path,
        })
    }

    /// Path this video was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Number of frames decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.next_index
    }

    fn fail(&mut self, reason: String) {
        log::warn!(
            "Decoding {} stopped after {} frames: {reason}",
            self.file_path.display(),
            self.next_index
        );
        self.fault = Some(reason);
        self.done = true;
    }

    /// Count a recoverable error; returns `false` once the limit is hit.
    fn tolerate(&mut self, reason: String) -> bool {
        self.consecutive_errors += 1;
        if self.consecutive_errors > MAX_CONSECUTIVE_ERRORS {
            self.fail(reason);
            return false;
        }
        log::debug!("Skipping unreadable packet: {reason}");
        true
    }

    /// Decode the next frame into `decoded_frame`, leaving it unconverted.
    ///
    /// Returns `false` at end of stream or once decoding has failed.
    fn decode_next(&mut self) -> bool {
        if self.done {
            return false;
        }

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                self.consecutive_errors = 0;
                return true;
            }

            if self.eof_sent {
                self.done = true;
                return false;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() != self.video_stream_index {
                        continue;
                    }
                    if let Err(error) = self.decoder.send_packet(&packet)
                        && !self.tolerate(error.to_string())
                    {
                        return false;
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.fail(error.to_string());
                        return false;
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    if !self.tolerate(error.to_string()) {
                        return false;
                    }
                }
            }
        }
    }

    /// Convert the current `decoded_frame` to packed RGB.
    ///
    /// The scaler is rebuilt when the decoder changes frame size or pixel
    /// format mid-stream.
    fn convert_current_frame(&mut self) -> Result<RgbImage, SceneError> {
        let (format, width, height) = (
            self.decoded_frame.format(),
            self.decoded_frame.width(),
            self.decoded_frame.height(),
        );

        let definition = self.scaler.input();
        if definition.format != format || definition.width != width || definition.height != height
        {
            log::debug!("Frame geometry changed to {width}x{height} ({format:?})");
            self.scaler = ScalingContext::get(
                format,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?;
        }

        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let buffer = conversion::frame_to_buffer(&self.rgb_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            SceneError::FfmpegError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

impl FrameSource for VideoFile {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if !self.decode_next() {
            return None;
        }
        match self.convert_current_frame() {
            Ok(image) => {
                let index = self.next_index;
                self.next_index += 1;
                Some(Frame { index, image })
            }
            Err(error) => {
                self.fail(error.to_string());
                None
            }
        }
    }

    fn skip_frame(&mut self) -> Option<u64> {
        if !self.decode_next() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(index)
    }

    fn decode_fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }
}
