//! Synchronisation orchestration
//!
//! Runs the pipeline stages in order and routes recoverable analysis
//! failures to the evenly spaced fallback.

pub mod synchronizer;

pub use synchronizer::{
    synchronize, synchronize_async, synchronize_or_fallback, synchronize_with_cancel,
};
