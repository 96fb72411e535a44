//! hrm-ls library interface
//!
//! Automatic lyrics-to-audio synchronisation: classifies a decoded recording
//! into silence/vocal/instrumental segments, maps lyric lines onto it, and
//! lets users nudge individual lines with the correction decaying into the
//! lines that follow.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use crate::error::{SyncError, SyncResult};
pub use crate::models::{
    AudioPattern, LyricTimestamp, LyricsStructure, PatternKind, QualityScore, SyncOptions,
    SyncQuality, UserCorrection,
};
pub use crate::services::{apply_corrections, fallback_synchronize, score_quality};
pub use crate::workflow::{synchronize, synchronize_async, synchronize_or_fallback};
