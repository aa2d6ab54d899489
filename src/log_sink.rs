//! Per-run diagnostic log.
//!
//! The detector reports its events (open, parameters, boundaries, progress,
//! completion, errors) to an injected [`LogSink`]. [`FileLogSink`] writes
//! them to the `<video>_scenes.log` file next to the video, truncating it
//! on every run; [`MemoryLogSink`] collects them for inspection. Nothing
//! written to a sink affects the detection result.
//!
//! # Example
//!
//! ```no_run
//! use scenecut::{DetectionOptions, FileLogSink, SceneDetector, SceneError, log_path_for};
//!
//! let video = "clips/interview.mp4";
//! let sink = FileLogSink::create(log_path_for(video))?;
//! let scenes = SceneDetector::new(DetectionOptions::new()).detect_file(video, &sink)?;
//! # Ok::<(), SceneError>(())
//! ```

use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::Level;

use crate::error::SceneError;

/// Suffix that replaces the video's extension to form the log file name.
pub const LOG_FILE_SUFFIX: &str = "_scenes.log";

/// Receiver of run events.
pub trait LogSink: Send + Sync {
    /// Record one event.
    fn record(&self, level: Level, message: &str);
}

/// Log file path for `video`: the extension is replaced by `_scenes.log`.
///
/// ```
/// use std::path::Path;
///
/// use scenecut::log_path_for;
///
/// assert_eq!(log_path_for("media/clip.mp4"), Path::new("media/clip_scenes.log"));
/// assert_eq!(log_path_for("clip"), Path::new("clip_scenes.log"));
/// ```
pub fn log_path_for<P: AsRef<Path>>(video: P) -> PathBuf {
    let video = video.as_ref();
    let stem = video
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    video.with_file_name(format!("{stem}{LOG_FILE_SUFFIX}"))
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Writes events to a file, one timestamped line each:
/// `2024-05-01 14:03:07,512 [INFO] message`.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl FileLogSink {
    /// Create (or truncate) the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IoError`] if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLogSink {
    fn record(&self, level: Level, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(error) = writeln!(writer, "{timestamp} [{}] {message}", level_name(level)) {
            log::warn!("Failed to write to {}: {error}", self.path.display());
        }
    }
}

/// One event captured by [`MemoryLogSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub message: String,
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .map(|record| record.message)
            .collect()
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level,
                message: message.to_string(),
            });
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn record(&self, _level: Level, _message: &str) {}
}
