//! Line-level alignment output and user corrections

use serde::{Deserialize, Serialize};

/// One lyric line with its assigned time range
///
/// Serialises as `{text, startTime, endTime, confidence, lineIndex}`, the
/// shape persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricTimestamp {
    /// Trimmed line text
    pub text: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Alignment confidence (0.0-1.0)
    pub confidence: f32,
    /// Position of the line among the non-empty lyric lines
    pub line_index: usize,
}

impl LyricTimestamp {
    /// Create new timestamp
    pub fn new(
        text: impl Into<String>,
        start_time: f64,
        end_time: f64,
        confidence: f32,
        line_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
            confidence,
            line_index,
        }
    }

    /// Line duration in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// True if the interval is well-formed (`end > start`)
    pub fn is_valid(&self) -> bool {
        self.end_time > self.start_time
    }
}

/// A user-supplied start time for one line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCorrection {
    pub line_index: usize,
    /// Corrected start time in seconds
    pub correct_time: f64,
}

impl UserCorrection {
    pub fn new(line_index: usize, correct_time: f64) -> Self {
        Self {
            line_index,
            correct_time,
        }
    }
}
