//! Classified audio segments

use serde::{Deserialize, Serialize};

/// Segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Window RMS below the silence threshold
    Silence,
    /// Energy concentrated in the mid band (sung voice)
    Vocal,
    /// Audible but not voice-like
    Instrumental,
}

impl PatternKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Silence => "silence",
            PatternKind::Vocal => "vocal",
            PatternKind::Instrumental => "instrumental",
        }
    }
}

/// A classified time segment of the recording
///
/// Emitted by the analyzer and never mutated afterwards; the optimizer builds
/// new values when it merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioPattern {
    pub kind: PatternKind,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (always greater than `start`)
    pub end: f64,
    /// Window RMS for sounding segments
    pub intensity: Option<f32>,
    /// Classification confidence (0.0-1.0)
    pub confidence: f32,
}

impl AudioPattern {
    /// Create new pattern
    pub fn new(kind: PatternKind, start: f64, end: f64, confidence: f32) -> Self {
        Self {
            kind,
            start,
            end,
            intensity: None,
            confidence,
        }
    }

    /// Attach an intensity measure
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True if the segment intersects `[from, to]`
    pub fn overlaps(&self, from: f64, to: f64) -> bool {
        self.start <= to && self.end >= from
    }

    pub fn is_silence(&self) -> bool {
        self.kind == PatternKind::Silence
    }

    pub fn is_vocal(&self) -> bool {
        self.kind == PatternKind::Vocal
    }
}
