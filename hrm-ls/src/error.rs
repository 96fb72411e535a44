//! Error types for hrm-ls

use std::time::Duration;
use thiserror::Error;

/// Synchronisation error type
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input buffer or file could not be interpreted as audio
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    /// No non-empty lyric lines to align
    #[error("Lyrics contain no non-empty lines")]
    EmptyLyrics,

    /// Analysis stopped by a cancellation request
    #[error("Audio analysis cancelled")]
    Cancelled,

    /// Analysis exceeded its time budget
    #[error("Audio analysis exceeded {0:?}")]
    Timeout(Duration),

    /// hrm-common error
    #[error("Common error: {0}")]
    Common(#[from] hrm_common::Error),
}

impl SyncError {
    /// True for failures the orchestrator recovers from with the evenly spaced fallback
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyncError::AudioDecode(_) | SyncError::Cancelled | SyncError::Timeout(_)
        )
    }
}

/// Result type for synchronisation operations
pub type SyncResult<T> = Result<T, SyncError>;
