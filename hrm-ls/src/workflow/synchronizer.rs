//! Lyrics-to-audio synchronizer
//!
//! **Pipeline:** lyrics structure → audio patterns → optimized patterns →
//! line mapping → overlap repair. Stages are stateless; the only shared
//! state is the cancellation token checked by the pattern scan.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::models::{AnalyzerParameters, LyricTimestamp, LyricsStructure, SyncOptions};
use crate::services::{
    fallback_from_structure, Alignment, AudioPatternAnalyzer, LyricsAnalyzer, PatternMapper,
    PatternOptimizer, TimestampPostProcessor,
};

/// Align lyric lines to a mono sample buffer
///
/// # Errors
/// - `EmptyLyrics` when the text has no non-empty lines
/// - `AudioDecode` when the buffer cannot be analyzed; callers should fall
///   back to [`crate::services::fallback_synchronize`]
pub fn synchronize(
    samples: &[f32],
    sample_rate: u32,
    lyrics_text: &str,
    options: &SyncOptions,
) -> SyncResult<Vec<LyricTimestamp>> {
    synchronize_with_cancel(samples, sample_rate, lyrics_text, options, &CancellationToken::new())
}

/// [`synchronize`] with a caller-owned cancellation token
///
/// Returns `Cancelled` if the token fires during the pattern scan.
pub fn synchronize_with_cancel(
    samples: &[f32],
    sample_rate: u32,
    lyrics_text: &str,
    options: &SyncOptions,
    cancel: &CancellationToken,
) -> SyncResult<Vec<LyricTimestamp>> {
    let structure = analyze_lyrics(lyrics_text)?;
    align(samples, sample_rate, &structure, options, cancel)
}

/// Align, recovering from analysis failures with the evenly spaced fallback
///
/// Only `EmptyLyrics` (and configuration errors) reach the caller.
pub fn synchronize_or_fallback(
    samples: &[f32],
    sample_rate: u32,
    lyrics_text: &str,
    options: &SyncOptions,
    cancel: &CancellationToken,
) -> SyncResult<Vec<LyricTimestamp>> {
    let structure = analyze_lyrics(lyrics_text)?;
    recover(
        align(samples, sample_rate, &structure, options, cancel),
        &structure,
        options,
    )
}

/// Run synchronisation on the blocking pool with an optional time cap
///
/// The scan runs under `spawn_blocking` so async callers stay responsive.
/// When `options.analysis_timeout_secs` elapses the scan is cancelled and
/// the fallback alignment is returned. Cancelling `cancel` has the same
/// effect.
pub async fn synchronize_async(
    samples: Vec<f32>,
    sample_rate: u32,
    lyrics_text: String,
    options: SyncOptions,
    cancel: CancellationToken,
) -> SyncResult<Vec<LyricTimestamp>> {
    let structure = analyze_lyrics(&lyrics_text)?;

    let scan_token = cancel.child_token();
    let task = {
        let structure = structure.clone();
        let options = options.clone();
        let scan_token = scan_token.clone();
        tokio::task::spawn_blocking(move || {
            align(&samples, sample_rate, &structure, &options, &scan_token)
        })
    };

    let joined = match options.analysis_timeout() {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                scan_token.cancel();
                return recover(Err(SyncError::Timeout(limit)), &structure, &options);
            }
        },
        None => task.await,
    };

    let result = joined.map_err(|e| {
        SyncError::Common(hrm_common::Error::Internal(format!(
            "Synchronisation task failed: {}",
            e
        )))
    })?;

    recover(result, &structure, &options)
}

fn analyze_lyrics(lyrics_text: &str) -> SyncResult<LyricsStructure> {
    let structure = LyricsAnalyzer::new().analyze(lyrics_text);
    if structure.is_empty() {
        return Err(SyncError::EmptyLyrics);
    }
    Ok(structure)
}

fn align(
    samples: &[f32],
    sample_rate: u32,
    structure: &LyricsStructure,
    options: &SyncOptions,
    cancel: &CancellationToken,
) -> SyncResult<Vec<LyricTimestamp>> {
    let params = AnalyzerParameters::default();

    info!(
        lines = structure.line_count(),
        samples = samples.len(),
        sample_rate,
        "Starting lyrics synchronisation"
    );

    let patterns = AudioPatternAnalyzer::new(params.clone()).analyze(
        samples,
        sample_rate,
        options.silence_threshold,
        cancel,
    )?;
    let patterns = PatternOptimizer::new(&params).optimize(&patterns);
    debug!(patterns = patterns.len(), "Audio patterns optimized");

    let timestamps = match PatternMapper::new().map(&patterns, structure, options.estimated_duration) {
        Alignment::Mapped {
            timestamps,
            total_duration,
        } => TimestampPostProcessor::new().process(timestamps, total_duration),
        Alignment::Fallback(timestamps) => {
            info!("No vocal patterns found, using evenly spaced alignment");
            timestamps
        }
    };

    info!(lines = timestamps.len(), "Lyrics synchronisation complete");
    Ok(timestamps)
}

fn recover(
    result: SyncResult<Vec<LyricTimestamp>>,
    structure: &LyricsStructure,
    options: &SyncOptions,
) -> SyncResult<Vec<LyricTimestamp>> {
    match result {
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "Audio analysis unavailable, falling back to even spacing");
            Ok(fallback_from_structure(structure, options.estimated_duration))
        }
        other => other,
    }
}
