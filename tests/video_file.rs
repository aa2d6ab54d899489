//! VideoFile integration tests.
//!
//! Fixture-backed tests require `tests/fixtures/generate_fixtures.sh` and
//! return early when the fixture is absent.

use std::{fs, path::Path};

use scenecut::{
    DetectionOptions, ErrorKind, FrameSource, MemoryLogSink, SceneDetector, SceneError, VideoFile,
};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

// Black for two seconds, then white for two seconds, 25 fps.
const FIXTURE_CUT_SECONDS: f64 = 2.0;
const FIXTURE_FPS: f64 = 25.0;

// ── open failures ──────────────────────────────────────────────────

#[test]
fn open_nonexistent_file() {
    let result = VideoFile::open("definitely/not/here.mp4");
    let error = result.expect_err("nonexistent file must fail");
    assert_eq!(error.kind(), ErrorKind::PathNotFound);
}

#[test]
fn open_non_video_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("notes.mp4");
    fs::write(&path, b"plain text, no container here").unwrap();

    let error = VideoFile::open(&path).expect_err("garbage must fail");
    assert_eq!(error.kind(), ErrorKind::VideoOpenFailure);
    assert_eq!(
        error.to_string(),
        format!("Failed to open video file '{}'", path.display())
    );
}

#[test]
fn open_failure_is_logged_with_reason() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("empty.mp4");
    fs::write(&path, b"").unwrap();

    let sink = MemoryLogSink::new();
    let result = SceneDetector::default().detect_file(&path, &sink);
    assert!(matches!(result, Err(SceneError::VideoOpen { .. })));

    let errors = sink.messages_at(log::Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to open video file"));
    assert!(sink.messages_at(log::Level::Info).is_empty());
}

/// A valid mono 16-bit PCM WAV file: it opens, but has no video stream.
fn write_audio_only(path: &Path) {
    let samples: Vec<u8> = (0..800u32)
        .flat_map(|i| ((i % 64) as i16 * 256).to_le_bytes())
        .collect();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&16000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&samples);
    fs::write(path, bytes).unwrap();
}

#[test]
fn audio_only_file_is_an_open_failure() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("tone.wav");
    write_audio_only(&path);

    let error = VideoFile::open(&path).expect_err("audio-only file must fail");
    assert_eq!(error.kind(), ErrorKind::VideoOpenFailure);
    assert_eq!(
        error.to_string(),
        format!("Failed to open video file '{}'", path.display())
    );
    let SceneError::VideoOpen { reason, .. } = error else {
        panic!("expected VideoOpen");
    };
    assert_eq!(reason, "No video stream found");
}

// ── fixture ────────────────────────────────────────────────────────

#[test]
fn fixture_metadata() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let video = VideoFile::open(path).expect("Failed to open fixture");
    let metadata = video.metadata();
    assert!((metadata.frames_per_second - FIXTURE_FPS).abs() < 0.01);
    assert!((metadata.duration - 4.0).abs() < 0.1, "{}", metadata.duration);
    assert!(metadata.frame_count >= 95 && metadata.frame_count <= 105);
    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert_eq!(video.frames_decoded(), 0);
}

#[test]
fn fixture_decodes_every_frame_in_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut video = VideoFile::open(path).expect("Failed to open fixture");
    let mut expected_index = 0;
    while let Some(frame) = video.next_frame() {
        assert_eq!(frame.index, expected_index);
        assert_eq!(frame.image.dimensions(), (320, 240));
        expected_index += 1;
    }
    assert!(expected_index >= 95);
    assert_eq!(video.frames_decoded(), expected_index);
    assert!(video.decode_fault().is_none());
    assert!(video.next_frame().is_none());
}

#[test]
fn fixture_cut_is_found_within_one_stride() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    for frame_skip in [1, 5, 10] {
        let sink = MemoryLogSink::new();
        let boundaries = SceneDetector::new(DetectionOptions::new().with_frame_skip(frame_skip))
            .detect_file(path, &sink)
            .expect("Detection failed");
        let boundaries = boundaries.as_slice();

        assert_eq!(boundaries[0], 0.0);
        assert_eq!(boundaries.len(), 3, "frame_skip {frame_skip}: {boundaries:?}");
        let cut = boundaries[1];
        let latency = cut - FIXTURE_CUT_SECONDS;
        assert!(
            (-0.05..frame_skip as f64 / FIXTURE_FPS + 0.05).contains(&latency),
            "frame_skip {frame_skip}: cut at {cut}"
        );
        assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn fixture_scenes_tile_the_clip() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let video = VideoFile::open(path).expect("Failed to open fixture");
    let duration = video.metadata().duration;
    let sink = MemoryLogSink::new();
    let scenes = SceneDetector::default()
        .detect(video, &sink)
        .expect("Detection failed")
        .scenes();

    assert_eq!(scenes[0].start, 0.0);
    assert_eq!(scenes.last().unwrap().end, duration);
    for pair in scenes.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(scenes.iter().all(|scene| scene.duration() > 0.0));
}

#[test]
fn fixture_detection_is_repeatable() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let detector = SceneDetector::new(DetectionOptions::new().with_frame_skip(3));
    let first = detector.detect_file(path, &MemoryLogSink::new()).unwrap();
    let second = detector.detect_file(path, &MemoryLogSink::new()).unwrap();
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn fixture_skipped_frames_keep_index_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut video = VideoFile::open(path).expect("Failed to open fixture");
    assert_eq!(video.skip_frame(), Some(0));
    assert_eq!(video.skip_frame(), Some(1));
    let frame = video.next_frame().expect("third frame");
    assert_eq!(frame.index, 2);
    assert_eq!(frame.image.dimensions(), (320, 240));
    assert_eq!(video.frames_decoded(), 3);
}
