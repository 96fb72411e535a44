//! Per-request synchronisation options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default expected recording length when nothing better is known
pub const DEFAULT_ESTIMATED_DURATION: f64 = 180.0;

/// Options for one synchronisation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOptions {
    /// Expected recording length in seconds (default: 180)
    #[serde(default = "default_estimated_duration")]
    pub estimated_duration: f64,

    /// Linear RMS silence threshold; derived from the recording when unset
    #[serde(default)]
    pub silence_threshold: Option<f32>,

    /// Lines below this confidence are flagged for review
    #[serde(default)]
    pub confidence_threshold: Option<f32>,

    /// Language hint (not used by the current heuristics)
    #[serde(default)]
    pub language: Option<String>,

    /// Reserved for speech-recognition assisted alignment
    #[serde(default)]
    pub use_voice_recognition: Option<bool>,

    /// Cap on analysis wall time before falling back (async entry point only)
    #[serde(default)]
    pub analysis_timeout_secs: Option<u64>,
}

fn default_estimated_duration() -> f64 {
    DEFAULT_ESTIMATED_DURATION
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            estimated_duration: default_estimated_duration(),
            silence_threshold: None,
            confidence_threshold: None,
            language: None,
            use_voice_recognition: None,
            analysis_timeout_secs: None,
        }
    }
}

impl SyncOptions {
    pub fn with_estimated_duration(mut self, seconds: f64) -> Self {
        self.estimated_duration = seconds;
        self
    }

    pub fn with_silence_threshold(mut self, threshold: f32) -> Self {
        self.silence_threshold = Some(threshold);
        self
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_secs.map(Duration::from_secs)
    }
}
