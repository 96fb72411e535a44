//! Fallback Synchronizer
//!
//! Even spacing of all lines across the expected duration, at flat low
//! confidence. Used when there is no audio, decoding fails, analysis is
//! cancelled or no vocals were found.

use crate::models::{LyricTimestamp, LyricsStructure};
use crate::services::lyrics_analyzer::LyricsAnalyzer;

/// Confidence of every evenly spaced timestamp
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Evenly spaced alignment for raw lyric text
///
/// Returns an empty list when the text has no non-empty lines.
pub fn fallback_synchronize(lyrics_text: &str, estimated_duration: f64) -> Vec<LyricTimestamp> {
    let structure = LyricsAnalyzer::new().analyze(lyrics_text);
    fallback_from_structure(&structure, estimated_duration)
}

/// Evenly spaced alignment for already analyzed lyrics
///
/// Non-finite or non-positive durations are treated as zero, giving
/// zero-length segments rather than an error.
pub fn fallback_from_structure(structure: &LyricsStructure, estimated_duration: f64) -> Vec<LyricTimestamp> {
    let line_count = structure.line_count();
    if line_count == 0 {
        return Vec::new();
    }

    let duration = if estimated_duration.is_finite() && estimated_duration > 0.0 {
        estimated_duration
    } else {
        tracing::warn!(estimated_duration, "Unusable estimated duration, using zero-length segments");
        0.0
    };

    let average = duration / line_count as f64;

    tracing::debug!(lines = line_count, duration, average, "Fallback synchronization");

    structure
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            LyricTimestamp::new(
                line.trim(),
                i as f64 * average,
                (i + 1) as f64 * average,
                FALLBACK_CONFIDENCE,
                i,
            )
        })
        .collect()
}
