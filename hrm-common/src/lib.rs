//! # HRM Common Library
//!
//! Shared code for the hymn-rehearsal services including:
//! - Error and result types
//! - Bootstrap configuration loading (TOML, environment, platform defaults)
//! - Logging initialisation
//! - Human-readable time formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod logging;

pub use error::{Error, Result};
