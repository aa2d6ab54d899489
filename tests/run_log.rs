//! Run log tests: file sink format, truncation, and what a failed open
//! leaves behind.

use std::{fs, path::Path};

use log::Level;
use scenecut::{
    DetectionOptions, ErrorKind, FileLogSink, LogSink, MemoryLogSink, SceneDetector, SceneError,
    log_path_for,
};

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn file_sink_writes_timestamped_lines() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("clip_scenes.log");

    let sink = FileLogSink::create(&path).expect("Failed to create log");
    sink.record(Level::Info, "Analyzing video: clip.mp4");
    sink.record(Level::Warn, "Decoding stopped early");
    sink.record(Level::Error, "Failed to open video file 'clip.mp4'");
    drop(sink);

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" [INFO] Analyzing video: clip.mp4"), "{}", lines[0]);
    assert!(lines[1].ends_with(" [WARNING] Decoding stopped early"), "{}", lines[1]);
    assert!(lines[2].ends_with(" [ERROR] Failed to open video file 'clip.mp4'"));

    // `YYYY-MM-DD HH:MM:SS,mmm`
    let timestamp = &lines[0][..23];
    assert_eq!(timestamp.len(), 23);
    assert_eq!(&timestamp[4..5], "-");
    assert_eq!(&timestamp[10..11], " ");
    assert_eq!(&timestamp[19..20], ",");
    assert!(timestamp[20..].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn file_sink_truncates_previous_run() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("clip_scenes.log");

    {
        let sink = FileLogSink::create(&path).unwrap();
        for index in 0..10 {
            sink.record(Level::Info, &format!("old line {index}"));
        }
    }
    {
        let sink = FileLogSink::create(&path).unwrap();
        sink.record(Level::Info, "new run");
        assert_eq!(sink.path(), path.as_path());
    }

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("new run"));
}

#[test]
fn file_sink_in_missing_directory_fails() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("no/such/dir/clip_scenes.log");
    let result = FileLogSink::create(&path);
    assert!(matches!(result, Err(SceneError::IoError(_))));
}

#[test]
fn log_path_sits_next_to_video() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = temporary_directory.path().join("holiday.mov");
    assert_eq!(
        log_path_for(&video),
        temporary_directory.path().join("holiday_scenes.log")
    );
}

#[test]
fn missing_video_logs_only_the_error() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = temporary_directory.path().join("missing.mp4");

    let sink = MemoryLogSink::new();
    let result = SceneDetector::new(DetectionOptions::new()).detect_file(&video, &sink);

    let error = result.expect_err("missing file must fail");
    assert_eq!(error.kind(), ErrorKind::PathNotFound);
    let expected = format!("Video file '{}' does not exist", video.display());
    assert_eq!(error.to_string(), expected);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Error);
    assert_eq!(records[0].message, expected);
}

#[test]
fn missing_video_error_lands_in_log_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = temporary_directory.path().join("missing.mp4");
    let log_path = log_path_for(&video);

    let sink = FileLogSink::create(&log_path).unwrap();
    let result = scenecut::detect_scenes(&video, DetectionOptions::new(), &sink);
    assert!(result.is_err());
    drop(sink);

    let lines = read_lines(&log_path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(&format!(
        "[ERROR] Video file '{}' does not exist",
        video.display()
    )));
}

#[test]
fn invalid_options_are_logged_before_opening() {
    let sink = MemoryLogSink::new();
    let result = SceneDetector::new(DetectionOptions::new().with_threshold(-1.0))
        .detect_file("does_not_matter.mp4", &sink);
    assert!(matches!(result, Err(SceneError::InvalidOptions(_))));
    assert_eq!(sink.messages_at(Level::Error).len(), 1);
}
