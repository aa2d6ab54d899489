//! Structured result for callers.
//!
//! A run produces exactly one [`SceneReport`], serialized as either
//! `{"scenes": [{"start": 0.0, "end": 4.2}, ...]}` or
//! `{"error": "<message>"}`.
//!
//! ```
//! use scenecut::{Scene, SceneReport};
//!
//! let report = SceneReport::from(vec![Scene { start: 0.0, end: 2.5 }]);
//! assert_eq!(report.to_json().unwrap(), r#"{"scenes":[{"start":0.0,"end":2.5}]}"#);
//! ```

use serde::Serialize;

use crate::{boundary::Scene, error::SceneError};

/// Message reported when no video path was supplied.
pub const MISSING_PATH_MESSAGE: &str = "No video path provided";

/// Success or failure of one run, in the shape written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SceneReport {
    /// Detected scenes, in order.
    Scenes {
        /// Scenes tiling the clip.
        scenes: Vec<Scene>,
    },
    /// The run failed.
    Error {
        /// Human-readable reason.
        error: String,
    },
}

impl SceneReport {
    /// A failure report with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        SceneReport::Error {
            error: message.into(),
        }
    }

    /// Whether this report describes a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, SceneReport::Error { .. })
    }

    /// Process exit status for this report: `0` on success, `1` on failure.
    pub fn exit_code(&self) -> i32 {
        if self.is_error() { 1 } else { 0 }
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Vec<Scene>> for SceneReport {
    fn from(scenes: Vec<Scene>) -> Self {
        SceneReport::Scenes { scenes }
    }
}

impl From<&SceneError> for SceneReport {
    fn from(error: &SceneError) -> Self {
        SceneReport::error(error.to_string())
    }
}

impl From<Result<Vec<Scene>, SceneError>> for SceneReport {
    fn from(result: Result<Vec<Scene>, SceneError>) -> Self {
        match result {
            Ok(scenes) => scenes.into(),
            Err(error) => (&error).into(),
        }
    }
}
