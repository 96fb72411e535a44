//! Corrections, quality scoring and the persisted record shape

mod helpers;

use helpers::{HYMN, HYMN_LINES};
use hrm_ls::models::{SyncMethod, SyncRecord};
use hrm_ls::services::{fallback_synchronize, low_confidence_lines, to_lrc, TimestampPostProcessor};
use hrm_ls::{apply_corrections, score_quality, LyricTimestamp, QualityScore, UserCorrection};
use uuid::Uuid;

fn aligned() -> Vec<LyricTimestamp> {
    (0..4)
        .map(|i| {
            let start = i as f64 * 4.0;
            LyricTimestamp::new(format!("line {}", i), start, start + 3.5, 0.9, i)
        })
        .collect()
}

#[test]
fn test_correction_decays_into_following_lines() {
    let corrected = apply_corrections(&aligned(), &[UserCorrection::new(1, 6.0)]);

    assert_eq!(corrected[0], aligned()[0]);
    assert!((corrected[1].start_time - 6.0).abs() < 1e-9);
    assert!((corrected[1].end_time - 9.5).abs() < 1e-9);
    assert!((corrected[2].start_time - 9.8).abs() < 1e-9);
    assert!((corrected[3].start_time - 13.6).abs() < 1e-9);
    assert!((corrected[2].confidence - 0.8).abs() < 1e-6);
    assert!((corrected[3].confidence - 0.8).abs() < 1e-6);
}

#[test]
fn test_stale_corrections_ignored() {
    let corrected = apply_corrections(&aligned(), &[UserCorrection::new(42, 1.0)]);
    assert_eq!(corrected, aligned());
}

#[test]
fn test_correction_then_repair_keeps_order() {
    // Pulling line 2 back over line 1 overlaps them until repaired
    let corrected = apply_corrections(&aligned(), &[UserCorrection::new(2, 6.0)]);
    assert!(corrected[1].end_time > corrected[2].start_time);

    let repaired = TimestampPostProcessor::new().resolve_overlaps(corrected);
    for pair in repaired.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time);
    }
    assert!(repaired.iter().all(|t| t.end_time > t.start_time));
}

#[test]
fn test_scoring_fallback_alignment() {
    let timestamps = fallback_synchronize(HYMN, 60.0);
    let quality = score_quality(&timestamps);

    assert_eq!(quality.total_timestamps, HYMN_LINES);
    assert_eq!(quality.average_confidence, 0.5);
    assert_eq!(quality.quality_score, QualityScore::Fair);
    assert_eq!(quality.low_confidence_count, 0);
    assert_eq!(low_confidence_lines(&timestamps, 0.6).len(), HYMN_LINES);
    assert_eq!(score_quality(&timestamps), quality);
}

#[test]
fn test_sync_record_json_shape() {
    let hymn_id = Uuid::new_v4();
    let record = SyncRecord::new(hymn_id, aligned(), SyncMethod::Hybrid, 0.0);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["hymnId"], hymn_id.to_string());
    assert_eq!(json["syncMethod"], "hybrid");
    assert_eq!(json["timestamps"][1]["lineIndex"], 1);
    assert_eq!(json["timestamps"][1]["startTime"], 4.0);
    assert_eq!(json["timestamps"][1]["endTime"], 7.5);

    let back: SyncRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_lrc_from_fallback() {
    let lrc = to_lrc(&fallback_synchronize("Holy, holy, holy\nLord God Almighty", 10.0), None);
    assert_eq!(lrc, "[00:00.00]Holy, holy, holy\n[00:05.00]Lord God Almighty\n[00:10.00]\n");
}
