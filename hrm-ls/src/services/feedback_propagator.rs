//! Feedback Propagator
//!
//! Applies user-corrected start times and carries a decaying share of each
//! shift into the lines that follow.

use crate::models::{LyricTimestamp, UserCorrection};

/// Confidence of a line the user positioned
pub const CORRECTED_CONFIDENCE: f32 = 0.95;
/// Per-line decay of the propagated shift
const DECAY_STEP: f64 = 0.1;
/// Smallest share of the shift any later line receives
const MIN_DECAY: f64 = 0.1;
/// Confidence lost by each line a correction propagates into
const PROPAGATION_PENALTY: f32 = 0.1;
/// Propagation never lowers confidence below this
const PROPAGATION_CONFIDENCE_FLOOR: f32 = 0.6;

/// Apply corrections in order, each against the result of the previous one
///
/// Corrections naming a line that does not exist, or carrying a non-finite
/// time, are skipped.
pub fn apply_corrections(timestamps: &[LyricTimestamp], corrections: &[UserCorrection]) -> Vec<LyricTimestamp> {
    let mut result = timestamps.to_vec();

    for correction in corrections {
        if !correction.correct_time.is_finite() {
            tracing::warn!(
                line_index = correction.line_index,
                "Ignoring correction with non-finite time"
            );
            continue;
        }

        let Some(position) = result.iter().position(|t| t.line_index == correction.line_index) else {
            tracing::warn!(
                line_index = correction.line_index,
                lines = result.len(),
                "Ignoring correction for unknown line"
            );
            continue;
        };

        apply_one(&mut result, position, correction.correct_time);
    }

    result
}

/// Decay applied to the line `offset` positions after a correction
pub fn decay_factor(offset: usize) -> f64 {
    (1.0 - DECAY_STEP * offset as f64).max(MIN_DECAY)
}

fn apply_one(timestamps: &mut [LyricTimestamp], position: usize, correct_time: f64) {
    let following = timestamps.len() - position - 1;
    let corrected = &mut timestamps[position];
    let original_start = corrected.start_time;
    let original_duration = corrected.duration();
    let shift = correct_time - original_start;

    corrected.start_time = correct_time;
    corrected.end_time = correct_time + original_duration;
    corrected.confidence = CORRECTED_CONFIDENCE;

    tracing::debug!(
        line_index = corrected.line_index,
        shift,
        following,
        "Applying user correction"
    );

    for (offset, later) in timestamps[position + 1..].iter_mut().enumerate() {
        let adjustment = shift * decay_factor(offset + 1);
        later.start_time += adjustment;
        later.end_time += adjustment;
        if later.confidence > PROPAGATION_CONFIDENCE_FLOOR {
            later.confidence = (later.confidence - PROPAGATION_PENALTY).max(PROPAGATION_CONFIDENCE_FLOOR);
        }
    }
}
