//! Pattern-to-Lyrics Mapper
//!
//! Walks lyric lines in order with a cursor through the recording. Each
//! line's duration is estimated from its text, nudged toward nearby silence,
//! and the cursor then skips over the following silence (the inter-line gap).

use crate::models::{AudioPattern, LyricTimestamp, LyricsStructure};
use crate::services::fallback_synchronizer::{fallback_from_structure, FALLBACK_CONFIDENCE};
use crate::services::lyrics_analyzer::word_count;

/// Sung words per second used for the base line duration
const WORDS_PER_SECOND: f64 = 2.2;
/// Cursor offset before the first vocal onset
const LEAD_IN: f64 = 0.2;
/// Pattern search margin around the provisional line window
const SEARCH_MARGIN: f64 = 1.0;
/// A silence counts as the line ending only past this fraction of the estimate
const SILENCE_POSITION_RATIO: f64 = 0.7;
const MAX_SHRINK_RATIO: f64 = 0.3;
const MAX_EXTEND_RATIO: f64 = 0.5;
const BASE_CONFIDENCE: f32 = 0.8;
const SILENCE_BONUS: f32 = 0.1;
const VOCAL_BONUS_PER_PATTERN: f32 = 0.02;
const MAX_VOCAL_BONUS: f32 = 0.1;
/// How far ahead of a line end to look for the inter-line silence
const GAP_LOOKAHEAD: f64 = 2.0;
const MIN_GAP_SILENCE: f64 = 0.3;
const DEFAULT_LINE_GAP: f64 = 0.1;
/// Float tolerance when comparing a line end against a silence start
const TOLERANCE: f64 = 1e-6;

/// Mapper output
#[derive(Debug, Clone, PartialEq)]
pub enum Alignment {
    /// Timestamps derived from audio patterns, still to be post-processed
    Mapped {
        timestamps: Vec<LyricTimestamp>,
        total_duration: f64,
    },
    /// No vocal evidence; evenly spaced fallback timestamps
    Fallback(Vec<LyricTimestamp>),
}

impl Alignment {
    pub fn timestamps(&self) -> &[LyricTimestamp] {
        match self {
            Alignment::Mapped { timestamps, .. } => timestamps,
            Alignment::Fallback(timestamps) => timestamps,
        }
    }

    pub fn into_timestamps(self) -> Vec<LyricTimestamp> {
        match self {
            Alignment::Mapped { timestamps, .. } => timestamps,
            Alignment::Fallback(timestamps) => timestamps,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Alignment::Fallback(_))
    }
}

/// Timing evidence found around one line
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimingAdjustment {
    end_shift: f64,
    confidence_bonus: f32,
}

/// Pattern-to-Lyrics Mapper
pub struct PatternMapper;

impl PatternMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map lyric lines onto the cleaned pattern list
    ///
    /// `estimated_duration` is only used when there are no vocal patterns.
    pub fn map(
        &self,
        patterns: &[AudioPattern],
        lyrics: &LyricsStructure,
        estimated_duration: f64,
    ) -> Alignment {
        let Some(first_vocal) = patterns.iter().find(|p| p.is_vocal()) else {
            tracing::debug!("No vocal patterns, using evenly spaced fallback");
            return Alignment::Fallback(fallback_from_structure(lyrics, estimated_duration));
        };

        let total_duration = patterns.iter().map(|p| p.end).fold(0.0_f64, f64::max);
        let line_count = lyrics.line_count();
        if line_count == 0 {
            return Alignment::Mapped {
                timestamps: Vec::new(),
                total_duration,
            };
        }

        let average_duration_per_line = total_duration / line_count as f64;
        let mut current_time = (first_vocal.start - LEAD_IN).max(0.0);
        let mut timestamps = Vec::with_capacity(line_count);

        for (line_index, line) in lyrics.lines.iter().enumerate() {
            if current_time >= total_duration {
                Self::compress_tail(&mut timestamps, &lyrics.lines[line_index..], total_duration);
                break;
            }

            let line_duration = Self::estimate_line_duration(line, average_duration_per_line);
            let start_time = current_time;
            let adjustment = Self::timing_adjustment(patterns, start_time, line_duration);
            let end_time = start_time + line_duration + adjustment.end_shift;

            let confidence = (BASE_CONFIDENCE + adjustment.confidence_bonus).min(1.0);
            timestamps.push(LyricTimestamp::new(
                line.trim(),
                start_time,
                end_time,
                confidence,
                line_index,
            ));

            current_time = Self::next_line_start(patterns, end_time);
        }

        tracing::debug!(
            lines = timestamps.len(),
            total_duration,
            average_duration_per_line,
            "Lyrics mapped onto audio patterns"
        );

        Alignment::Mapped {
            timestamps,
            total_duration,
        }
    }

    /// Multi-factor line duration estimate in seconds
    ///
    /// Base rate of 2.2 words/s, scaled by a content factor (punctuation and
    /// long lines sing slower, one- or two-word lines faster), bounded to
    /// half/double the average time available per line.
    pub fn estimate_line_duration(line: &str, average_duration_per_line: f64) -> f64 {
        let words = word_count(line);
        let base = words as f64 / WORDS_PER_SECOND;

        let mut factor = 1.0;
        if line.contains(',') || line.contains('.') {
            factor += 0.2;
        }
        if line.chars().count() > 50 {
            factor += 0.3;
        }
        if words <= 2 {
            factor -= 0.2;
        }

        let floor = average_duration_per_line * 0.5;
        let ceiling = average_duration_per_line * 2.0;
        (base * factor).max(floor).min(ceiling)
    }

    fn timing_adjustment(patterns: &[AudioPattern], start_time: f64, line_duration: f64) -> TimingAdjustment {
        let search_from = start_time - SEARCH_MARGIN;
        let search_to = start_time + line_duration + SEARCH_MARGIN;

        let nearby = || patterns.iter().filter(move |p| p.overlaps(search_from, search_to));

        let mut end_shift = 0.0;
        let mut confidence_bonus = 0.0;

        let line_ending_silence = nearby()
            .filter(|p| p.is_silence())
            .find(|p| p.start - start_time >= line_duration * SILENCE_POSITION_RATIO);

        if let Some(silence) = line_ending_silence {
            let offset = silence.start - start_time;
            end_shift = (offset - line_duration)
                .max(-line_duration * MAX_SHRINK_RATIO)
                .min(line_duration * MAX_EXTEND_RATIO);
            confidence_bonus += SILENCE_BONUS;
        }

        let vocal_count = nearby().filter(|p| p.is_vocal()).count();
        confidence_bonus += (vocal_count as f32 * VOCAL_BONUS_PER_PATTERN).min(MAX_VOCAL_BONUS);

        TimingAdjustment {
            end_shift,
            confidence_bonus,
        }
    }

    /// Spread lines the cursor could not place inside the recording over its tail
    ///
    /// The tail starts where the last placed line ends. If that line already
    /// runs to the end, it shares the tail with the remaining lines instead.
    /// The last line ends exactly at `total_duration`.
    fn compress_tail(timestamps: &mut Vec<LyricTimestamp>, remaining: &[String], total_duration: f64) {
        let first_index = timestamps.len();
        let (tail_start, slots) = match timestamps.last() {
            Some(prev) if prev.end_time < total_duration => (prev.end_time, remaining.len()),
            Some(prev) => (prev.start_time, remaining.len() + 1),
            None => (0.0, remaining.len()),
        };
        let boundary = |slot: usize| {
            if slot >= slots {
                total_duration
            } else {
                tail_start + (total_duration - tail_start) * slot as f64 / slots as f64
            }
        };

        let first_slot = slots - remaining.len();
        if first_slot == 1 {
            if let Some(prev) = timestamps.last_mut() {
                prev.end_time = boundary(1);
            }
        }

        for (k, line) in remaining.iter().enumerate() {
            let slot = first_slot + k;
            timestamps.push(LyricTimestamp::new(
                line.trim(),
                boundary(slot),
                boundary(slot + 1),
                FALLBACK_CONFIDENCE,
                first_index + k,
            ));
        }

        tracing::warn!(
            lines = remaining.len(),
            tail_start,
            total_duration,
            "Recording too short for the lyrics, compressing remaining lines"
        );
    }

    /// Cursor after a line: the end of a following silence, or a flat gap
    fn next_line_start(patterns: &[AudioPattern], end_time: f64) -> f64 {
        patterns
            .iter()
            .filter(|p| p.is_silence())
            .find(|p| {
                p.start >= end_time - TOLERANCE
                    && p.start <= end_time + GAP_LOOKAHEAD
                    && p.duration() > MIN_GAP_SILENCE
            })
            .map(|silence| silence.end)
            .unwrap_or(end_time + DEFAULT_LINE_GAP)
    }
}

impl Default for PatternMapper {
    fn default() -> Self {
        Self::new()
    }
}
