//! Internal conversion helpers.
//!
//! Pixel-data copying and FFmpeg time-base arithmetic shared by the video
//! source.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// FFmpeg's `AV_TIME_BASE`: container durations are expressed in
/// microseconds.
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Copy pixel data from a packed FFmpeg frame into a tightly-packed buffer.
///
/// FFmpeg rows frequently carry padding (stride > width × bytes per pixel);
/// the padding is stripped so the result can be passed to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}

/// Convert a rational to `f64`, or `None` when it is zero or undefined.
pub(crate) fn rational_to_f64(rational: Rational) -> Option<f64> {
    if rational.numerator() <= 0 || rational.denominator() <= 0 {
        return None;
    }
    Some(rational.numerator() as f64 / rational.denominator() as f64)
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Convert a container duration in `AV_TIME_BASE` units to seconds.
///
/// FFmpeg reports unknown durations as `AV_NOPTS_VALUE` (a large negative
/// number), so anything not strictly positive yields `None`.
pub(crate) fn container_duration_to_seconds(duration: i64) -> Option<f64> {
    (duration > 0).then(|| duration as f64 / AV_TIME_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_rejects_zero_denominator() {
        assert_eq!(rational_to_f64(Rational::new(30, 0)), None);
        assert_eq!(rational_to_f64(Rational::new(0, 1)), None);
        assert_eq!(rational_to_f64(Rational::new(30000, 1001)), Some(30000.0 / 1001.0));
    }

    #[test]
    fn pts_rescales_through_time_base() {
        let seconds = pts_to_seconds(90_000, Rational::new(1, 90_000));
        assert!((seconds - 1.0).abs() < 1e-12);
    }

    #[test]
    fn container_duration_ignores_unknown_values() {
        assert_eq!(container_duration_to_seconds(2_500_000), Some(2.5));
        assert_eq!(container_duration_to_seconds(0), None);
        assert_eq!(container_duration_to_seconds(i64::MIN), None);
    }
}
