//! Pattern Optimizer
//!
//! Collapses window-granularity patterns into segments: consecutive
//! same-kind sounding patterns separated by less than the merge gap become one,
//! then fragments shorter than the minimum pattern length are dropped.

use crate::models::{AnalyzerParameters, AudioPattern};

/// Boundary tolerance for durations computed from sample positions
const TOLERANCE: f64 = 1e-9;

/// Pattern Optimizer
pub struct PatternOptimizer {
    /// Merge gap in seconds (default: 0.08)
    merge_gap: f64,
    /// Minimum kept duration in seconds (default: 0.05)
    min_duration: f64,
}

impl PatternOptimizer {
    pub fn new(params: &AnalyzerParameters) -> Self {
        Self {
            merge_gap: params.merge_gap_seconds(),
            min_duration: params.min_pattern_seconds(),
        }
    }

    /// Merge and filter in a single pass
    pub fn optimize(&self, patterns: &[AudioPattern]) -> Vec<AudioPattern> {
        let mut merged: Vec<AudioPattern> = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            if let Some(last) = merged.last_mut() {
                let mergeable = last.kind == pattern.kind
                    && !pattern.is_silence()
                    && pattern.start - last.end < self.merge_gap;

                if mergeable {
                    last.end = last.end.max(pattern.end);
                    last.confidence = last.confidence.max(pattern.confidence);
                    last.intensity = match (last.intensity, pattern.intensity) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, b) => a.or(b),
                    };
                    continue;
                }
            }
            merged.push(pattern.clone());
        }

        let before = merged.len();
        merged.retain(|p| {
            let keep = p.duration() + TOLERANCE >= self.min_duration;
            if !keep {
                tracing::trace!(kind = p.kind.as_str(), start = p.start, end = p.end, "Dropping short pattern");
            }
            keep
        });

        tracing::debug!(
            input = patterns.len(),
            merged = before,
            kept = merged.len(),
            "Pattern optimization complete"
        );

        merged
    }
}

impl Default for PatternOptimizer {
    fn default() -> Self {
        Self::new(&AnalyzerParameters::default())
    }
}
