//! End-to-end synchronisation properties on synthetic recordings
//!
//! Buffers are six sung phrases (3.0s tone, 0.6s breath) after a 1s
//! lead-in, aligned against a six-line hymn.

mod helpers;

use helpers::audio_generator::{render, Segment, TEST_SAMPLE_RATE};
use helpers::{phrase_buffer, LogCapture, HYMN, HYMN_LINES};
use hrm_ls::services::fallback_synchronize;
use hrm_ls::{synchronize, synchronize_or_fallback, SyncError, SyncOptions};
use tokio_util::sync::CancellationToken;

fn hymn_lines() -> Vec<&'static str> {
    HYMN.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn buffer_seconds(samples: &[f32]) -> f64 {
    samples.len() as f64 / TEST_SAMPLE_RATE as f64
}

#[test]
fn test_one_timestamp_per_line_in_order() {
    let samples = phrase_buffer(HYMN_LINES, 3.0, 0.6);
    let timestamps = synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &SyncOptions::default()).unwrap();

    assert_eq!(timestamps.len(), HYMN_LINES);
    for (i, (ts, line)) in timestamps.iter().zip(hymn_lines()).enumerate() {
        assert_eq!(ts.line_index, i);
        assert_eq!(ts.text, line);
    }
}

#[test]
fn test_intervals_valid_and_non_overlapping() {
    let samples = phrase_buffer(HYMN_LINES, 3.0, 0.6);
    let timestamps = synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &SyncOptions::default()).unwrap();

    for ts in &timestamps {
        assert!(ts.end_time > ts.start_time, "invalid interval {:?}", ts);
        assert!((0.0..=1.0).contains(&ts.confidence));
    }
    for pair in timestamps.windows(2) {
        assert!(
            pair[0].end_time <= pair[1].start_time + 1e-9,
            "overlap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }

    let last = timestamps.last().unwrap();
    assert!(last.end_time <= buffer_seconds(&samples) + 1e-9);
}

#[test]
fn test_lines_follow_phrases() {
    let samples = phrase_buffer(HYMN_LINES, 3.0, 0.6);
    let timestamps = synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &SyncOptions::default()).unwrap();

    // First line starts 0.2s before the first onset, later lines right after each breath
    assert!((timestamps[0].start_time - 0.8).abs() < 1e-6);
    for (k, ts) in timestamps.iter().enumerate().skip(1) {
        let phrase_start = 1.0 + 3.6 * k as f64;
        assert!(
            (ts.start_time - phrase_start).abs() < 1e-6,
            "line {} starts at {}, expected {}",
            k,
            ts.start_time,
            phrase_start
        );
    }

    // Every line end lands on the breath that follows its phrase
    for (k, ts) in timestamps.iter().enumerate() {
        let breath = 4.0 + 3.6 * k as f64;
        assert!((ts.end_time - breath).abs() < 1e-6);
        assert!(ts.confidence > 0.9);
    }
}

#[test]
fn test_short_recording_many_lines_stays_in_bounds() {
    let samples = render(
        &[Segment::Silence(0.5), Segment::Tone(2.0, 0.5), Segment::Silence(0.3)],
        TEST_SAMPLE_RATE,
    );
    let lyrics = vec!["Holy holy holy Lord God Almighty"; 12].join("\n");

    let capture = LogCapture::new();
    let timestamps = capture
        .scoped(|| synchronize(&samples, TEST_SAMPLE_RATE, &lyrics, &SyncOptions::default()))
        .unwrap();

    let total = buffer_seconds(&samples);
    assert_eq!(timestamps.len(), 12);
    for ts in &timestamps {
        assert!(ts.end_time > ts.start_time, "invalid interval {:?}", ts);
        assert!(ts.start_time < total);
    }
    for pair in timestamps.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time + 1e-9);
    }
    assert!(timestamps.last().unwrap().end_time <= total + 1e-9);
    capture.assert_contains("compressing remaining lines");
}

#[test]
fn test_silence_threshold_override() {
    // Nothing in the buffer is louder than the override, so no vocals are found
    let samples = phrase_buffer(HYMN_LINES, 3.0, 0.6);
    let options = SyncOptions::default()
        .with_estimated_duration(90.0)
        .with_silence_threshold(1.0);

    let timestamps = synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &options).unwrap();
    assert_eq!(timestamps, fallback_synchronize(HYMN, 90.0));
}

#[test]
fn test_instrumental_only_matches_fallback() {
    // Quiet constant level: above the silence floor, too weak to count as voice
    let samples = render(&[Segment::Level(20.0, 0.015)], TEST_SAMPLE_RATE);
    let options = SyncOptions::default().with_estimated_duration(120.0);

    let timestamps = synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &options).unwrap();
    assert_eq!(timestamps, fallback_synchronize(HYMN, 120.0));
    assert!(timestamps.iter().all(|t| t.confidence == 0.5));
}

#[test]
fn test_fallback_even_spacing() {
    let lyrics = "Praise God\nfrom whom\nall blessings\nflow";
    let timestamps = fallback_synchronize(lyrics, 120.0);

    let expected = [(0.0, 30.0), (30.0, 60.0), (60.0, 90.0), (90.0, 120.0)];
    assert_eq!(timestamps.len(), 4);
    for (ts, (start, end)) in timestamps.iter().zip(expected) {
        assert_eq!(ts.start_time, start);
        assert_eq!(ts.end_time, end);
        assert_eq!(ts.confidence, 0.5);
    }
}

#[test]
fn test_empty_lyrics_surfaced() {
    let samples = phrase_buffer(2, 3.0, 0.6);
    let result = synchronize_or_fallback(
        &samples,
        TEST_SAMPLE_RATE,
        "\n   \n\t\n",
        &SyncOptions::default(),
        &CancellationToken::new(),
    );
    assert!(matches!(result, Err(SyncError::EmptyLyrics)));
}

#[test]
fn test_corrupt_buffer_falls_back_with_warning() {
    let mut samples = phrase_buffer(2, 3.0, 0.6);
    samples[100] = f32::NAN;
    let options = SyncOptions::default().with_estimated_duration(60.0);

    assert!(matches!(
        synchronize(&samples, TEST_SAMPLE_RATE, HYMN, &options),
        Err(SyncError::AudioDecode(_))
    ));

    let capture = LogCapture::new();
    let timestamps = capture
        .scoped(|| {
            synchronize_or_fallback(&samples, TEST_SAMPLE_RATE, HYMN, &options, &CancellationToken::new())
        })
        .unwrap();

    assert_eq!(timestamps, fallback_synchronize(HYMN, 60.0));
    capture.assert_contains("falling back to even spacing");
}

#[test]
fn test_cancelled_scan_falls_back() {
    let samples = phrase_buffer(HYMN_LINES, 3.0, 0.6);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let timestamps = synchronize_or_fallback(
        &samples,
        TEST_SAMPLE_RATE,
        HYMN,
        &SyncOptions::default(),
        &cancel,
    )
    .unwrap();

    assert_eq!(timestamps, fallback_synchronize(HYMN, 180.0));
}
