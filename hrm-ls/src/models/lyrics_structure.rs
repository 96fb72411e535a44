//! Derived view of lyric text

use serde::{Deserialize, Serialize};

/// Lines, verses and word statistics for one lyric text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsStructure {
    /// Non-empty trimmed lines in original order
    pub lines: Vec<String>,
    /// Blank-line separated paragraphs
    pub verses: Vec<String>,
    pub total_words: usize,
    pub average_words_per_line: f64,
    /// Word-count based sung duration estimate in seconds
    pub estimated_duration: f64,
}

impl LyricsStructure {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
