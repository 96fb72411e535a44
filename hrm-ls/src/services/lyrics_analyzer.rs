//! Lyrics Structure Analyzer
//!
//! Turns raw lyric text (possibly rich-text markup from the hymn editor) into
//! ordered lines, verses and word statistics.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::LyricsStructure;

/// Sung delivery rate used for the duration estimate
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Tags that end a visual line in editor markup
static LINE_BREAK_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p\s*>|</div\s*>|</li\s*>").expect("valid regex"));

static MARKUP_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

/// Lyrics Structure Analyzer
pub struct LyricsAnalyzer;

impl LyricsAnalyzer {
    /// Create new analyzer
    pub fn new() -> Self {
        Self
    }

    /// Analyze lyric text
    ///
    /// Never fails: empty or markup-only input yields an empty structure and
    /// callers decide what zero lines means.
    pub fn analyze(&self, raw_text: &str) -> LyricsStructure {
        let text = Self::clean_text(raw_text);
        if text.is_empty() {
            return LyricsStructure::default();
        }

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let verses: Vec<String> = PARAGRAPH_BREAK
            .split(&text)
            .map(str::trim)
            .filter(|verse| !verse.is_empty())
            .map(str::to_string)
            .collect();

        let total_words: usize = lines.iter().map(|line| word_count(line)).sum();

        let average_words_per_line = if lines.is_empty() {
            0.0
        } else {
            total_words as f64 / lines.len() as f64
        };

        tracing::debug!(
            lines = lines.len(),
            verses = verses.len(),
            total_words,
            "Lyrics structure analyzed"
        );

        LyricsStructure {
            lines,
            verses,
            total_words,
            average_words_per_line,
            estimated_duration: total_words as f64 / WORDS_PER_SECOND,
        }
    }

    /// Strip markup and non-breaking spaces, normalise line endings, trim
    fn clean_text(raw_text: &str) -> String {
        let normalized = raw_text.replace("\r\n", "\n").replace('\r', "\n");
        let with_breaks = LINE_BREAK_TAGS.replace_all(&normalized, "\n");
        let stripped = MARKUP_TAGS.replace_all(&with_breaks, "");
        stripped
            .replace("&nbsp;", " ")
            .replace('\u{a0}', " ")
            .trim()
            .to_string()
    }
}

impl Default for LyricsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace-separated word count
pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}
