//! Synthetic Audio Generator
//!
//! Builds mono buffers out of tone and silence segments, and writes them as
//! WAV files for decoder tests.

use std::path::{Path, PathBuf};

/// Default rate for synthetic buffers; low enough to keep tests fast
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// One stretch of a synthetic recording
#[derive(Debug, Clone, Copy)]
pub enum Segment {
    Silence(f64),
    /// 220 Hz sine at the given peak amplitude
    Tone(f64, f32),
    /// Constant DC level
    Level(f64, f32),
}

/// Render segments into a mono buffer
pub fn render(segments: &[Segment], sample_rate: u32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &segment in segments {
        let seconds = match segment {
            Segment::Silence(s) | Segment::Tone(s, _) | Segment::Level(s, _) => s,
        };
        let count = (seconds * sample_rate as f64).round() as usize;
        samples.extend((0..count).map(|i| sample_at(segment, i, sample_rate)));
    }
    samples
}

fn sample_at(segment: Segment, i: usize, sample_rate: u32) -> f32 {
    match segment {
        Segment::Silence(_) => 0.0,
        Segment::Level(_, level) => level,
        Segment::Tone(_, amplitude) => {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
        }
    }
}

/// Sung phrases separated by breaths, with a short lead-in and tail
///
/// Each phrase is `phrase_secs` of tone followed by `gap_secs` of silence.
pub fn phrase_buffer(phrases: usize, phrase_secs: f64, gap_secs: f64) -> Vec<f32> {
    let mut segments = vec![Segment::Silence(1.0)];
    for _ in 0..phrases {
        segments.push(Segment::Tone(phrase_secs, 0.5));
        segments.push(Segment::Silence(gap_secs));
    }
    render(&segments, TEST_SAMPLE_RATE)
}

/// WAV output configuration
#[derive(Debug, Clone)]
pub struct WavConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub segments: Vec<Segment>,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            channels: 2,
            segments: vec![
                Segment::Silence(0.5),
                Segment::Tone(3.0, 0.4),
                Segment::Silence(0.5),
                Segment::Tone(3.0, 0.4),
                Segment::Silence(0.5),
            ],
        }
    }
}

/// Write a 16-bit PCM WAV file, duplicating the mono signal on every channel
pub fn write_test_wav(path: &Path, config: &WavConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in render(&config.segments, config.sample_rate) {
        let value = (sample * i16::MAX as f32) as i16;
        for _ in 0..config.channels {
            writer.write_sample(value)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_lengths() {
        let samples = render(&[Segment::Silence(0.5), Segment::Tone(1.0, 0.5)], 8000);
        assert_eq!(samples.len(), 12000);
        assert!(samples[..4000].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_write_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_test_wav(&temp_dir.path().join("hymn.wav"), &WavConfig::default()).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 1000, "WAV file should be non-trivial size");
    }
}
