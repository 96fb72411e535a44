//! Serializable alignment record handed to the storage layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LyricTimestamp;

/// How an alignment was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMethod {
    /// Produced entirely by the engine (audio analysis or fallback)
    Automatic,
    /// Every line positioned by the user
    Manual,
    /// Engine output with some user corrections applied
    Hybrid,
}

impl SyncMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMethod::Automatic => "automatic",
            SyncMethod::Manual => "manual",
            SyncMethod::Hybrid => "hybrid",
        }
    }

    /// Method after `corrected_lines` distinct lines out of `total_lines` were corrected
    pub fn after_corrections(corrected_lines: usize, total_lines: usize) -> Self {
        if corrected_lines == 0 {
            SyncMethod::Automatic
        } else if corrected_lines >= total_lines {
            SyncMethod::Manual
        } else {
            SyncMethod::Hybrid
        }
    }
}

/// Alignment of one hymn as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub hymn_id: Uuid,
    pub sync_method: SyncMethod,
    /// `max(average confidence, caller floor)`
    pub confidence: f32,
    pub timestamps: Vec<LyricTimestamp>,
    pub synced_at: DateTime<Utc>,
}

impl SyncRecord {
    /// Build a record, lifting the overall confidence to `confidence_floor`
    pub fn new(
        hymn_id: Uuid,
        timestamps: Vec<LyricTimestamp>,
        sync_method: SyncMethod,
        confidence_floor: f32,
    ) -> Self {
        let average = if timestamps.is_empty() {
            0.0
        } else {
            timestamps.iter().map(|t| t.confidence).sum::<f32>() / timestamps.len() as f32
        };

        Self {
            hymn_id,
            sync_method,
            confidence: average.max(confidence_floor).clamp(0.0, 1.0),
            timestamps,
            synced_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamps(confidences: &[f32]) -> Vec<LyricTimestamp> {
        confidences
            .iter()
            .enumerate()
            .map(|(i, &c)| LyricTimestamp::new(format!("line {}", i), i as f64, i as f64 + 1.0, c, i))
            .collect()
    }

    #[test]
    fn test_confidence_is_max_of_average_and_floor() {
        let record = SyncRecord::new(Uuid::new_v4(), timestamps(&[0.5, 0.5]), SyncMethod::Automatic, 0.7);
        assert!((record.confidence - 0.7).abs() < 1e-6);

        let record = SyncRecord::new(Uuid::new_v4(), timestamps(&[0.9, 0.9]), SyncMethod::Automatic, 0.7);
        assert!((record.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_empty_record_uses_floor() {
        let record = SyncRecord::new(Uuid::new_v4(), Vec::new(), SyncMethod::Manual, 0.3);
        assert!((record.confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_method_after_corrections() {
        assert_eq!(SyncMethod::after_corrections(0, 4), SyncMethod::Automatic);
        assert_eq!(SyncMethod::after_corrections(2, 4), SyncMethod::Hybrid);
        assert_eq!(SyncMethod::after_corrections(4, 4), SyncMethod::Manual);
    }

    #[test]
    fn test_serialized_shape() {
        let record = SyncRecord::new(Uuid::nil(), timestamps(&[0.8]), SyncMethod::Hybrid, 0.0);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["syncMethod"], "hybrid");
        let line = &json["timestamps"][0];
        assert_eq!(line["text"], "line 0");
        assert_eq!(line["startTime"], 0.0);
        assert_eq!(line["endTime"], 1.0);
        assert_eq!(line["lineIndex"], 0);
        assert!(line.get("confidence").is_some());
    }
}
