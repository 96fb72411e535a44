//! Sync Quality Scorer
//!
//! Read-only summary of a timestamp list: mean confidence, count of weak
//! lines, and a quality bucket.

use crate::models::{LyricTimestamp, QualityScore, SyncQuality};

/// Lines below this confidence count as low confidence
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Sync Quality Scorer
pub struct QualityScorer {
    low_confidence_threshold: f32,
}

impl QualityScorer {
    /// Create scorer with the default 0.5 low-confidence threshold
    pub fn new() -> Self {
        Self {
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }

    /// Create scorer with a custom low-confidence threshold
    pub fn with_threshold(low_confidence_threshold: f32) -> Self {
        Self {
            low_confidence_threshold,
        }
    }

    /// Score a timestamp list
    pub fn score(&self, timestamps: &[LyricTimestamp]) -> SyncQuality {
        let total_timestamps = timestamps.len();

        let average_confidence = if total_timestamps == 0 {
            0.0
        } else {
            timestamps.iter().map(|t| t.confidence).sum::<f32>() / total_timestamps as f32
        };

        let low_confidence_count = timestamps
            .iter()
            .filter(|t| t.confidence < self.low_confidence_threshold)
            .count();

        let quality_score = if total_timestamps == 0 {
            QualityScore::Poor
        } else {
            QualityScore::from_average(average_confidence)
        };

        tracing::debug!(
            total_timestamps,
            average_confidence,
            low_confidence_count,
            quality = quality_score.as_str(),
            "Sync quality scored"
        );

        SyncQuality {
            average_confidence,
            low_confidence_count,
            total_timestamps,
            quality_score,
        }
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score with default thresholds
pub fn score_quality(timestamps: &[LyricTimestamp]) -> SyncQuality {
    QualityScorer::new().score(timestamps)
}

/// Line indices whose confidence is below `threshold`, for review
pub fn low_confidence_lines(timestamps: &[LyricTimestamp], threshold: f32) -> Vec<usize> {
    timestamps
        .iter()
        .filter(|t| t.confidence < threshold)
        .map(|t| t.line_index)
        .collect()
}
