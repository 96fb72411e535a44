//! Synchronisation option resolution
//!
//! **Priority:** command line → TOML `[sync]` section → built-in defaults

use hrm_common::config::SyncSection;
use hrm_common::{Error, Result};
use tracing::{debug, info};

use crate::models::SyncOptions;

/// Default floor for the overall confidence stored with an alignment
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.0;

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct SyncOverrides {
    pub estimated_duration: Option<f64>,
    pub silence_threshold: Option<f32>,
    pub confidence_threshold: Option<f32>,
    pub language: Option<String>,
    pub analysis_timeout_secs: Option<u64>,
}

/// Merge overrides and config into validated options
pub fn resolve_sync_options(overrides: &SyncOverrides, section: &SyncSection) -> Result<SyncOptions> {
    let defaults = SyncOptions::default();

    let estimated_duration = pick(
        "estimated_duration",
        overrides.estimated_duration,
        section.estimated_duration,
    )
    .unwrap_or(defaults.estimated_duration);
    if !estimated_duration.is_finite() || estimated_duration <= 0.0 {
        return Err(Error::Config(format!(
            "estimated_duration must be a positive number of seconds, got {}",
            estimated_duration
        )));
    }

    let silence_threshold = pick(
        "silence_threshold",
        overrides.silence_threshold,
        section.silence_threshold,
    );
    if let Some(threshold) = silence_threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::Config(format!(
                "silence_threshold must be >= 0, got {}",
                threshold
            )));
        }
    }

    let confidence_threshold = pick(
        "confidence_threshold",
        overrides.confidence_threshold,
        section.confidence_threshold,
    );
    if let Some(threshold) = confidence_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold must be within 0.0-1.0, got {}",
                threshold
            )));
        }
    }

    let language = pick("language", overrides.language.clone(), section.language.clone());
    let analysis_timeout_secs = pick(
        "analysis_timeout_secs",
        overrides.analysis_timeout_secs,
        section.analysis_timeout_secs,
    );

    let options = SyncOptions {
        estimated_duration,
        silence_threshold,
        confidence_threshold,
        language,
        use_voice_recognition: None,
        analysis_timeout_secs,
    };

    info!(
        estimated_duration = options.estimated_duration,
        silence_threshold = ?options.silence_threshold,
        timeout_secs = ?options.analysis_timeout_secs,
        "Sync options resolved"
    );

    Ok(options)
}

/// Confidence floor from config, validated
pub fn resolve_confidence_floor(section: &SyncSection) -> Result<f32> {
    match section.confidence_floor {
        Some(floor) if (0.0..=1.0).contains(&floor) => Ok(floor),
        Some(floor) => Err(Error::Config(format!(
            "confidence_floor must be within 0.0-1.0, got {}",
            floor
        ))),
        None => Ok(DEFAULT_CONFIDENCE_FLOOR),
    }
}

fn pick<T>(name: &str, cli: Option<T>, toml: Option<T>) -> Option<T> {
    match (cli, toml) {
        (Some(value), _) => {
            debug!("{} from command line", name);
            Some(value)
        }
        (None, Some(value)) => {
            debug!("{} from TOML config", name);
            Some(value)
        }
        (None, None) => None,
    }
}
