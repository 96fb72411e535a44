//! Timestamp Post-Processor
//!
//! Repairs overlaps between consecutive lines and keeps the final line inside
//! the recording.

use crate::models::LyricTimestamp;

/// Half-gap left around the midpoint when splitting an overlap
pub const OVERLAP_PADDING: f64 = 0.05;
/// Shortest line the repair pass will produce
const MIN_LINE_DURATION: f64 = 0.05;
/// Final line keeps at least this much time after its start
const FINAL_MIN_DURATION: f64 = 1.0;
/// Preferred margin between the final line end and the recording end
const FINAL_TAIL: f64 = 0.5;

/// Timestamp Post-Processor
pub struct TimestampPostProcessor;

impl TimestampPostProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Resolve overlaps, then clamp the final line to `total_duration`
    pub fn process(&self, timestamps: Vec<LyricTimestamp>, total_duration: f64) -> Vec<LyricTimestamp> {
        let mut timestamps = self.resolve_overlaps(timestamps);
        Self::clamp_final_line(&mut timestamps, total_duration);
        timestamps
    }

    /// Split every overlap at its midpoint, ±0.05s
    ///
    /// Single left-to-right pass. Intervals stay valid (`end > start`) even
    /// for overlaps deeper than a whole line.
    pub fn resolve_overlaps(&self, mut timestamps: Vec<LyricTimestamp>) -> Vec<LyricTimestamp> {
        let mut repaired = 0usize;

        for i in 1..timestamps.len() {
            let (done, rest) = timestamps.split_at_mut(i);
            let current = &mut done[i - 1];
            let next = &mut rest[0];

            if current.end_time <= next.start_time {
                continue;
            }

            let midpoint = (current.end_time + next.start_time) / 2.0;
            current.end_time = (midpoint - OVERLAP_PADDING).max(current.start_time + MIN_LINE_DURATION);
            next.start_time = (midpoint + OVERLAP_PADDING).max(current.end_time);
            if next.end_time <= next.start_time {
                next.end_time = next.start_time + MIN_LINE_DURATION;
            }
            repaired += 1;
        }

        if repaired > 0 {
            tracing::debug!(repaired, "Resolved overlapping lyric timestamps");
        }

        timestamps
    }

    fn clamp_final_line(timestamps: &mut [LyricTimestamp], total_duration: f64) {
        let Some(last) = timestamps.last_mut() else {
            return;
        };
        if last.end_time <= total_duration {
            return;
        }

        let mut end_time = (last.start_time + FINAL_MIN_DURATION).max(total_duration - FINAL_TAIL);
        if end_time > total_duration && total_duration > last.start_time {
            end_time = total_duration;
        }

        tracing::debug!(
            line_index = last.line_index,
            from = last.end_time,
            to = end_time,
            total_duration,
            "Clamped final line to recording length"
        );
        last.end_time = end_time;
    }
}

impl Default for TimestampPostProcessor {
    fn default() -> Self {
        Self::new()
    }
}
