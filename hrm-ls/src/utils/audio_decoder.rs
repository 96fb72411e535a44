//! Audio Decoding
//!
//! Turns a recording on disk into the mono f32 PCM the pattern analyzer
//! consumes. Uses symphonia, so MP3, FLAC, AAC, WAV and OGG all work.

use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::{SyncError, SyncResult};

/// Decoded recording
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source
    pub channels: usize,
    pub duration_seconds: f64,
}

/// Decode an audio file to mono f32 PCM
///
/// Every failure (missing file, unknown container, no audio track, corrupt
/// stream) is reported as [`SyncError::AudioDecode`] so callers can fall
/// back to even-spacing alignment. Individual undecodable packets are
/// skipped.
pub fn decode_audio_file(file_path: &Path) -> SyncResult<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .map_err(|e| decode_error("Failed to open", file_path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| decode_error("Failed to probe", file_path, e))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            SyncError::AudioDecode(format!("No audio track in {}", file_path.display()))
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| {
            SyncError::AudioDecode(format!("Sample rate unknown for {}", file_path.display()))
        })?;
    let channel_count = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

    tracing::debug!(
        path = %file_path.display(),
        sample_rate,
        channels = channel_count,
        "Audio stream info"
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error("Failed to create decoder for", file_path, e))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error("Error reading packet from", file_path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => samples.extend(mix_to_mono(&decoded)),
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                tracing::debug!(path = %file_path.display(), error = msg, "Skipping corrupt packet");
            }
            Err(e) => return Err(decode_error("Failed to decode", file_path, e)),
        }
    }

    if samples.is_empty() {
        return Err(SyncError::AudioDecode(format!(
            "No samples decoded from {}",
            file_path.display()
        )));
    }

    let duration_seconds = samples.len() as f64 / sample_rate as f64;

    if skipped_packets > 0 {
        tracing::warn!(
            path = %file_path.display(),
            skipped_packets,
            "Some packets could not be decoded"
        );
    }

    tracing::debug!(
        path = %file_path.display(),
        total_samples = samples.len(),
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channel_count,
        duration_seconds,
    })
}

fn decode_error(what: &str, path: &Path, e: impl std::fmt::Display) -> SyncError {
    SyncError::AudioDecode(format!("{} {}: {}", what, path.display(), e))
}

/// Average all channels of a decoded buffer into mono f32
pub fn mix_to_mono(decoded: &AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::U8(buf) => average_channels(buf),
        AudioBufferRef::U16(buf) => average_channels(buf),
        AudioBufferRef::U24(buf) => average_channels(buf),
        AudioBufferRef::U32(buf) => average_channels(buf),
        AudioBufferRef::S8(buf) => average_channels(buf),
        AudioBufferRef::S16(buf) => average_channels(buf),
        AudioBufferRef::S24(buf) => average_channels(buf),
        AudioBufferRef::S32(buf) => average_channels(buf),
        AudioBufferRef::F32(buf) => average_channels(buf),
        AudioBufferRef::F64(buf) => average_channels(buf),
    }
}

fn average_channels<S>(buf: &AudioBuffer<S>) -> Vec<f32>
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    let num_frames = buf.frames();

    if num_channels == 0 {
        return Vec::new();
    }

    let mut mono = Vec::with_capacity(num_frames);
    for frame_idx in 0..num_frames {
        let mut sum = 0.0f32;
        for ch in 0..num_channels {
            sum += f32::from_sample(buf.chan(ch)[frame_idx]);
        }
        mono.push(sum / num_channels as f32);
    }

    mono
}
