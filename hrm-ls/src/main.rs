//! Lyrics Sync (hrm-ls) - command line entry point
//!
//! Aligns hymn lyrics to a recording, applies user corrections to a saved
//! alignment, and reports alignment quality. Results are written to stdout
//! (or `--output`) as JSON or LRC; logs go to stderr.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use hrm_common::config::{load_or_default, resolve_config_path, write_toml_config, TomlConfig};
use hrm_common::human_time::format_range;
use hrm_common::logging::init_logging;
use hrm_ls::config::{resolve_confidence_floor, resolve_sync_options, SyncOverrides};
use hrm_ls::models::{SyncMethod, SyncRecord};
use hrm_ls::services::lrc_exporter::to_lrc;
use hrm_ls::services::{low_confidence_lines, TimestampPostProcessor};
use hrm_ls::utils::decode_audio_file;
use hrm_ls::{
    apply_corrections, fallback_synchronize, score_quality, synchronize_async, LyricTimestamp,
    SyncError, UserCorrection,
};

const MODULE_NAME: &str = "hrm-ls";

/// Command-line arguments for hrm-ls
#[derive(Parser, Debug)]
#[command(name = "hrm-ls")]
#[command(about = "Automatic lyrics-to-audio synchronisation for hymn recordings")]
#[command(version)]
struct Args {
    /// Config file (overrides HRM_CONFIG and the per-user default)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Align lyrics to an audio file
    Sync {
        /// Recording to analyze (MP3, FLAC, WAV, OGG, ...)
        #[arg(short, long)]
        audio: PathBuf,

        #[command(flatten)]
        lyrics: LyricsArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Evenly spaced alignment without audio
    Fallback {
        #[command(flatten)]
        lyrics: LyricsArgs,

        /// Expected recording length in seconds
        #[arg(short, long)]
        estimated_duration: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply user corrections to a saved alignment
    Correct {
        /// JSON array of timestamps
        #[arg(short, long)]
        timestamps: PathBuf,

        /// JSON array of `{lineIndex, correctTime}` corrections
        #[arg(long)]
        corrections: PathBuf,

        /// Re-run overlap repair after propagation
        #[arg(long)]
        repair: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Summarize alignment quality
    Score {
        /// JSON array of timestamps
        #[arg(short, long)]
        timestamps: PathBuf,

        /// List lines below this confidence
        #[arg(long)]
        confidence_threshold: Option<f32>,
    },

    /// Write a config file with default values
    InitConfig {
        /// Destination (defaults to the resolved config path)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct LyricsArgs {
    /// Lyric text file, one line per sung phrase, blank lines between verses
    #[arg(short, long)]
    lyrics: PathBuf,
}

#[derive(clap::Args, Debug)]
struct TuningArgs {
    /// Expected recording length in seconds (fallback only)
    #[arg(short, long)]
    estimated_duration: Option<f64>,

    /// Linear RMS silence threshold
    #[arg(long)]
    silence_threshold: Option<f32>,

    /// Report lines below this confidence
    #[arg(long)]
    confidence_threshold: Option<f32>,

    /// Language hint
    #[arg(long)]
    language: Option<String>,

    /// Give up on audio analysis after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Wrap JSON output in a sync record for this hymn
    #[arg(long)]
    hymn_id: Option<Uuid>,

    /// LRC title tag
    #[arg(long)]
    title: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Lrc,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), MODULE_NAME);
    let config = load_or_default(config_path.as_deref());

    init_logging(&config.logging).context("Failed to initialize logging")?;

    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    match args.command {
        Command::Sync {
            audio,
            lyrics,
            tuning,
            output,
        } => run_sync(&config, &audio, &lyrics.lyrics, tuning, &output).await,
        Command::Fallback {
            lyrics,
            estimated_duration,
            output,
        } => {
            let overrides = SyncOverrides {
                estimated_duration,
                ..Default::default()
            };
            let options = resolve_sync_options(&overrides, &config.sync)?;
            let text = read_lyrics(&lyrics.lyrics)?;
            let timestamps = fallback_synchronize(&text, options.estimated_duration);
            if timestamps.is_empty() {
                bail!(SyncError::EmptyLyrics);
            }
            emit(&config, timestamps, SyncMethod::Automatic, &output)
        }
        Command::Correct {
            timestamps,
            corrections,
            repair,
            output,
        } => run_correct(&config, &timestamps, &corrections, repair, &output),
        Command::Score {
            timestamps,
            confidence_threshold,
        } => run_score(&config, &timestamps, confidence_threshold),
        Command::InitConfig { path, force } => run_init_config(config_path, path, force),
    }
}

async fn run_sync(
    config: &TomlConfig,
    audio: &Path,
    lyrics: &Path,
    tuning: TuningArgs,
    output: &OutputArgs,
) -> Result<()> {
    let text = read_lyrics(lyrics)?;

    let mut overrides = SyncOverrides {
        estimated_duration: tuning.estimated_duration,
        silence_threshold: tuning.silence_threshold,
        confidence_threshold: tuning.confidence_threshold,
        language: tuning.language,
        analysis_timeout_secs: tuning.timeout,
    };

    let decoded = match decode_audio_file(audio) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(error = %e, "Audio unavailable, lines will be evenly spaced");
            None
        }
    };

    // Without an explicit estimate the decoded length is the best guess
    if overrides.estimated_duration.is_none() && config.sync.estimated_duration.is_none() {
        overrides.estimated_duration = decoded
            .as_ref()
            .map(|d| d.duration_seconds)
            .filter(|&d| d > 0.0);
    }

    let options = resolve_sync_options(&overrides, &config.sync)?;
    let confidence_threshold = options.confidence_threshold;

    let timestamps = match decoded {
        Some(decoded) => {
            info!(
                "Decoded {} ({} Hz, {} channel(s), {:.1}s)",
                audio.display(),
                decoded.sample_rate,
                decoded.channels,
                decoded.duration_seconds
            );

            let cancel = CancellationToken::new();
            let ctrl_c_token = cancel.clone();
            tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, stopping analysis");
                    ctrl_c_token.cancel();
                }
            });

            synchronize_async(decoded.samples, decoded.sample_rate, text, options, cancel)
                .await
                .context("Synchronisation failed")?
        }
        None => {
            let timestamps = fallback_synchronize(&text, options.estimated_duration);
            if timestamps.is_empty() {
                bail!(SyncError::EmptyLyrics);
            }
            timestamps
        }
    };

    if let Some(threshold) = confidence_threshold {
        report_low_confidence(&timestamps, threshold);
    }

    emit(config, timestamps, SyncMethod::Automatic, output)
}

fn run_correct(
    config: &TomlConfig,
    timestamps_path: &Path,
    corrections_path: &Path,
    repair: bool,
    output: &OutputArgs,
) -> Result<()> {
    let timestamps = read_timestamps(timestamps_path)?;
    let corrections: Vec<UserCorrection> = read_json(corrections_path)?;

    let mut corrected = apply_corrections(&timestamps, &corrections);
    if repair {
        corrected = TimestampPostProcessor::new().resolve_overlaps(corrected);
    }

    let corrected_lines: HashSet<usize> = corrections
        .iter()
        .map(|c| c.line_index)
        .filter(|index| timestamps.iter().any(|t| t.line_index == *index))
        .collect();
    let method = SyncMethod::after_corrections(corrected_lines.len(), timestamps.len());

    info!(
        corrections = corrections.len(),
        applied = corrected_lines.len(),
        method = method.as_str(),
        "Corrections applied"
    );

    emit(config, corrected, method, output)
}

fn run_score(
    config: &TomlConfig,
    timestamps_path: &Path,
    confidence_threshold: Option<f32>,
) -> Result<()> {
    let timestamps = read_timestamps(timestamps_path)?;
    let quality = score_quality(&timestamps);

    let threshold = confidence_threshold.or(config.sync.confidence_threshold);
    let flagged = threshold.map(|t| low_confidence_lines(&timestamps, t));
    if let Some(t) = threshold {
        report_low_confidence(&timestamps, t);
    }

    let report = serde_json::json!({
        "quality": quality,
        "lowConfidenceLines": flagged,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_init_config(resolved: Option<PathBuf>, path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = path.or(resolved) else {
        bail!("No config directory available on this platform; pass --path");
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    write_toml_config(&TomlConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}

fn report_low_confidence(timestamps: &[LyricTimestamp], threshold: f32) {
    for ts in timestamps.iter().filter(|t| t.confidence < threshold) {
        warn!(
            line_index = ts.line_index,
            confidence = ts.confidence,
            "Low confidence {} {:?}",
            format_range(ts.start_time, ts.end_time),
            ts.text
        );
    }
}

fn emit(
    config: &TomlConfig,
    timestamps: Vec<LyricTimestamp>,
    method: SyncMethod,
    output: &OutputArgs,
) -> Result<()> {
    let quality = score_quality(&timestamps);
    info!(
        lines = quality.total_timestamps,
        average_confidence = quality.average_confidence,
        quality = quality.quality_score.as_str(),
        "Alignment ready"
    );

    let rendered = match (output.format, output.hymn_id) {
        (OutputFormat::Lrc, _) => to_lrc(&timestamps, output.title.as_deref()),
        (OutputFormat::Json, Some(hymn_id)) => {
            let floor = resolve_confidence_floor(&config.sync)?;
            let record = SyncRecord::new(hymn_id, timestamps, method, floor);
            serde_json::to_string_pretty(&record)? + "\n"
        }
        (OutputFormat::Json, None) => serde_json::to_string_pretty(&timestamps)? + "\n",
    };

    match &output.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn read_lyrics(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lyrics from {}", path.display()))
}

/// Accepts a bare timestamp array or a full sync record
fn read_timestamps(path: &Path) -> Result<Vec<LyricTimestamp>> {
    let value: serde_json::Value = read_json(path)?;
    let timestamps = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<SyncRecord>(value).map(|record| record.timestamps)
    }
    .with_context(|| format!("{} is not a timestamp list", path.display()))?;
    Ok(timestamps)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
