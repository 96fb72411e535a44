//! Audio Pattern Analyzer
//!
//! Walks a mono sample buffer in fixed windows and classifies each one as
//! silence, vocal or instrumental from its RMS alone.
//!
//! Per-window work is independent, so windows are measured in parallel
//! batches (rayon) with the cancellation token checked before each batch.
//! Silence runs are then assembled sequentially over the ordered window
//! results, giving the same output as a single serial scan.

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::error::{SyncError, SyncResult};
use crate::models::{AnalyzerParameters, AudioPattern, PatternKind};

/// Confidence assigned to vocal windows
pub const VOCAL_CONFIDENCE: f32 = 0.85;
/// Confidence assigned to instrumental windows
pub const INSTRUMENTAL_CONFIDENCE: f32 = 0.65;
/// Base confidence of a silence run, grown by its duration in seconds
const SILENCE_BASE_CONFIDENCE: f64 = 0.6;
const SILENCE_MAX_CONFIDENCE: f64 = 0.95;
const EPSILON: f32 = 1e-10;

/// Measured analysis window
#[derive(Debug, Clone, Copy)]
struct Window {
    start: f64,
    end: f64,
    rms: f32,
    /// `None` when below the silence threshold
    kind: Option<PatternKind>,
}

/// Audio Pattern Analyzer
pub struct AudioPatternAnalyzer {
    params: AnalyzerParameters,
}

impl AudioPatternAnalyzer {
    pub fn new(params: AnalyzerParameters) -> Self {
        Self { params }
    }

    /// Classify a mono buffer into window-granularity patterns
    ///
    /// `silence_threshold` overrides the threshold derived from global RMS.
    ///
    /// # Errors
    /// - `AudioDecode` for an empty buffer, zero sample rate or non-finite samples
    /// - `Cancelled` if `cancel` fires between window batches
    pub fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
        silence_threshold: Option<f32>,
        cancel: &CancellationToken,
    ) -> SyncResult<Vec<AudioPattern>> {
        if sample_rate == 0 {
            return Err(SyncError::AudioDecode("sample rate is zero".to_string()));
        }
        if samples.is_empty() {
            return Err(SyncError::AudioDecode("sample buffer is empty".to_string()));
        }

        let global_rms = Self::global_rms(samples)?;
        let threshold = self.silence_threshold(global_rms, silence_threshold);

        tracing::debug!(
            samples = samples.len(),
            sample_rate,
            global_rms,
            threshold,
            "Starting audio pattern analysis"
        );

        let windows = self.measure_windows(samples, sample_rate, threshold, cancel)?;
        let total_duration = samples.len() as f64 / sample_rate as f64;
        let patterns = self.assemble_patterns(&windows, total_duration);

        tracing::debug!(
            windows = windows.len(),
            patterns = patterns.len(),
            silences = patterns.iter().filter(|p| p.is_silence()).count(),
            vocals = patterns.iter().filter(|p| p.is_vocal()).count(),
            "Audio pattern analysis complete"
        );

        Ok(patterns)
    }

    /// Dynamic threshold: `max(floor, global_rms × ratio)` unless overridden
    pub fn silence_threshold(&self, global_rms: f32, override_threshold: Option<f32>) -> f32 {
        override_threshold
            .unwrap_or_else(|| (global_rms * self.params.threshold_ratio).max(self.params.threshold_floor))
    }

    /// Window classification from RMS via the band model
    pub fn classify(&self, rms: f32) -> PatternKind {
        let (low, mid, high) = self.params.band_model.band_energies(rms);
        let vocal_ratio = mid / (low + mid + high + EPSILON);

        if vocal_ratio > self.params.vocal_ratio && mid > self.params.min_mid_energy {
            PatternKind::Vocal
        } else {
            PatternKind::Instrumental
        }
    }

    fn global_rms(samples: &[f32]) -> SyncResult<f32> {
        let sum_squares: f64 = samples.par_iter().map(|&s| (s as f64) * (s as f64)).sum();
        if !sum_squares.is_finite() {
            return Err(SyncError::AudioDecode(
                "sample buffer contains non-finite values".to_string(),
            ));
        }
        Ok((sum_squares / samples.len() as f64).sqrt() as f32)
    }

    fn measure_windows(
        &self,
        samples: &[f32],
        sample_rate: u32,
        threshold: f32,
        cancel: &CancellationToken,
    ) -> SyncResult<Vec<Window>> {
        let window_size = ((sample_rate as f64 * self.params.window_seconds()).round() as usize).max(1);
        let batch_windows = self.params.batch_windows.max(1);
        let batch_size = window_size * batch_windows;
        let rate = sample_rate as f64;

        let batches: Vec<Vec<Window>> = samples
            .par_chunks(batch_size)
            .enumerate()
            .map(|(batch_idx, batch)| {
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }

                let batch_offset = batch_idx * batch_size;
                Ok(batch
                    .chunks(window_size)
                    .enumerate()
                    .map(|(i, chunk)| {
                        // samples, position in the buffer
                        let start_sample = batch_offset + i * window_size;
                        let end_sample = start_sample + chunk.len();
                        let rms = calculate_rms(chunk);
                        let kind = if rms < threshold {
                            None
                        } else {
                            Some(self.classify(rms))
                        };
                        Window {
                            start: start_sample as f64 / rate,
                            end: end_sample as f64 / rate,
                            rms,
                            kind,
                        }
                    })
                    .collect())
            })
            .collect::<SyncResult<Vec<_>>>()?;

        Ok(batches.into_iter().flatten().collect())
    }

    fn assemble_patterns(&self, windows: &[Window], total_duration: f64) -> Vec<AudioPattern> {
        let mut patterns = Vec::new();
        let mut silence_start: Option<f64> = None;

        for window in windows {
            match window.kind {
                None => {
                    if silence_start.is_none() {
                        silence_start = Some(window.start);
                    }
                }
                Some(kind) => {
                    if let Some(start) = silence_start.take() {
                        self.push_silence(&mut patterns, start, window.start);
                    }

                    let confidence = match kind {
                        PatternKind::Vocal => VOCAL_CONFIDENCE,
                        _ => INSTRUMENTAL_CONFIDENCE,
                    };
                    patterns.push(
                        AudioPattern::new(kind, window.start, window.end, confidence)
                            .with_intensity(window.rms),
                    );
                }
            }
        }

        // Silence running to the end of the buffer
        if let Some(start) = silence_start {
            self.push_silence(&mut patterns, start, total_duration);
        }

        patterns
    }

    fn push_silence(&self, patterns: &mut Vec<AudioPattern>, start: f64, end: f64) {
        let duration = end - start;
        // Tolerance for window boundaries computed from sample positions
        if duration + 1e-9 < self.params.min_silence_seconds() {
            return;
        }

        let confidence = (SILENCE_BASE_CONFIDENCE + duration).min(SILENCE_MAX_CONFIDENCE) as f32;
        patterns.push(AudioPattern::new(PatternKind::Silence, start, end, confidence));
    }
}

impl Default for AudioPatternAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerParameters::default())
    }
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
