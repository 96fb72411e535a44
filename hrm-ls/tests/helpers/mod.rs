//! Test Helper Utilities
//!
//! Shared utilities for testing hrm-ls

#![allow(dead_code)]

pub mod audio_generator;
pub mod log_capture;

pub use audio_generator::{phrase_buffer, write_test_wav, Segment, WavConfig};
pub use log_capture::LogCapture;

/// Four-line hymn verse plus a second verse after a blank line
pub const HYMN: &str = "Amazing grace, how sweet the sound\n\
That saved a wretch like me\n\
I once was lost but now am found\n\
Was blind but now I see\n\
\n\
'Twas grace that taught my heart to fear\n\
And grace my fears relieved";

/// Non-empty line count of [`HYMN`]
pub const HYMN_LINES: usize = 6;
