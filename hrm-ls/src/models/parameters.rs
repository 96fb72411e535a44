//! Audio analysis parameters
//!
//! Defaults reproduce the reference heuristics; every field can be overridden
//! from serialized configuration.

use serde::{Deserialize, Serialize};

/// Fixed proportional split of a window's RMS into frequency bands
///
/// This is not a frequency transform. Each band receives a constant share of
/// the window RMS, so classification depends on overall level only. Replacing
/// it with real spectral analysis would change every downstream value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandModel {
    /// Share attributed to < 300 Hz
    #[serde(default = "default_low_weight")]
    pub low_weight: f32,
    /// Share attributed to 300-2000 Hz
    #[serde(default = "default_mid_weight")]
    pub mid_weight: f32,
    /// Share attributed to 2000-8000 Hz
    #[serde(default = "default_high_weight")]
    pub high_weight: f32,
}

impl Default for BandModel {
    fn default() -> Self {
        Self {
            low_weight: default_low_weight(),
            mid_weight: default_mid_weight(),
            high_weight: default_high_weight(),
        }
    }
}

impl BandModel {
    /// Approximate (low, mid, high) band energies for a window RMS
    pub fn band_energies(&self, rms: f32) -> (f32, f32, f32) {
        (rms * self.low_weight, rms * self.mid_weight, rms * self.high_weight)
    }
}

/// Audio pattern analysis and optimisation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerParameters {
    /// Analysis window in milliseconds (default: 50ms)
    #[serde(default = "default_window_ms")]
    pub window_ms: u32,

    /// Shortest silence run reported, in milliseconds (default: 100ms)
    #[serde(default = "default_min_silence_ms")]
    pub min_silence_ms: u32,

    /// Floor for the derived silence threshold (default: 0.005)
    #[serde(default = "default_threshold_floor")]
    pub threshold_floor: f32,

    /// Derived threshold as a fraction of global RMS (default: 0.08)
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f32,

    /// Minimum mid-band share for a vocal window (default: 0.4)
    #[serde(default = "default_vocal_ratio")]
    pub vocal_ratio: f32,

    /// Minimum mid-band energy for a vocal window (default: 0.01)
    #[serde(default = "default_min_mid_energy")]
    pub min_mid_energy: f32,

    /// Merge same-kind patterns closer than this, in milliseconds (default: 80ms)
    #[serde(default = "default_merge_gap_ms")]
    pub merge_gap_ms: u32,

    /// Drop merged patterns shorter than this, in milliseconds (default: 50ms)
    #[serde(default = "default_min_pattern_ms")]
    pub min_pattern_ms: u32,

    /// Windows per parallel batch; cancellation is checked between batches
    #[serde(default = "default_batch_windows")]
    pub batch_windows: usize,

    #[serde(default)]
    pub band_model: BandModel,
}

impl Default for AnalyzerParameters {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            min_silence_ms: default_min_silence_ms(),
            threshold_floor: default_threshold_floor(),
            threshold_ratio: default_threshold_ratio(),
            vocal_ratio: default_vocal_ratio(),
            min_mid_energy: default_min_mid_energy(),
            merge_gap_ms: default_merge_gap_ms(),
            min_pattern_ms: default_min_pattern_ms(),
            batch_windows: default_batch_windows(),
            band_model: BandModel::default(),
        }
    }
}

impl AnalyzerParameters {
    pub fn window_seconds(&self) -> f64 {
        self.window_ms as f64 / 1000.0
    }

    pub fn min_silence_seconds(&self) -> f64 {
        self.min_silence_ms as f64 / 1000.0
    }

    pub fn merge_gap_seconds(&self) -> f64 {
        self.merge_gap_ms as f64 / 1000.0
    }

    pub fn min_pattern_seconds(&self) -> f64 {
        self.min_pattern_ms as f64 / 1000.0
    }
}

// Default value functions
fn default_low_weight() -> f32 {
    0.3
}

fn default_mid_weight() -> f32 {
    0.5
}

fn default_high_weight() -> f32 {
    0.2
}

fn default_window_ms() -> u32 {
    50
}

fn default_min_silence_ms() -> u32 {
    100
}

fn default_threshold_floor() -> f32 {
    0.005
}

fn default_threshold_ratio() -> f32 {
    0.08
}

fn default_vocal_ratio() -> f32 {
    0.4
}

fn default_min_mid_energy() -> f32 {
    0.01
}

fn default_merge_gap_ms() -> u32 {
    80
}

fn default_min_pattern_ms() -> u32 {
    50
}

fn default_batch_windows() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = AnalyzerParameters::default();
        assert_eq!(params.window_ms, 50);
        assert_eq!(params.min_silence_ms, 100);
        assert_eq!(params.merge_gap_ms, 80);
        assert_eq!(params.min_pattern_ms, 50);
        assert!((params.window_seconds() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let params: AnalyzerParameters =
            serde_json::from_str(r#"{"window_ms": 25, "band_model": {"mid_weight": 0.6}}"#).unwrap();
        assert_eq!(params.window_ms, 25);
        assert_eq!(params.min_silence_ms, 100);
        assert!((params.band_model.mid_weight - 0.6).abs() < 1e-6);
        assert!((params.band_model.low_weight - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_band_energies_scale_with_rms() {
        let (low, mid, high) = BandModel::default().band_energies(0.1);
        assert!((low - 0.03).abs() < 1e-6);
        assert!((mid - 0.05).abs() < 1e-6);
        assert!((high - 0.02).abs() < 1e-6);
    }
}
