//! Aggregate alignment quality

use serde::{Deserialize, Serialize};

/// Quality bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityScore {
    /// Average confidence ≥ 0.8
    Excellent,
    /// Average confidence ≥ 0.6
    Good,
    /// Average confidence ≥ 0.4
    Fair,
    /// Anything lower, or no timestamps
    Poor,
}

impl QualityScore {
    /// Bucket an average confidence
    pub fn from_average(average: f32) -> Self {
        if average >= 0.8 {
            QualityScore::Excellent
        } else if average >= 0.6 {
            QualityScore::Good
        } else if average >= 0.4 {
            QualityScore::Fair
        } else {
            QualityScore::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityScore::Excellent => "excellent",
            QualityScore::Good => "good",
            QualityScore::Fair => "fair",
            QualityScore::Poor => "poor",
        }
    }
}

/// Summary of a timestamp list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuality {
    pub average_confidence: f32,
    /// Timestamps with confidence below 0.5
    pub low_confidence_count: usize,
    pub total_timestamps: usize,
    pub quality_score: QualityScore,
}
