// src/testgen/mod.rs
//
// Synthetic test signals for SirenCheckr.
// Generates harmonic tones and two-tone sirens and writes them as WAV files,
// so detection can be exercised without field recordings.

use anyhow::{Context, Result};
use std::f32::consts::PI;
use std::path::Path;

/// A periodic tone with fixed overtone ratios
#[derive(Debug, Clone)]
pub struct ToneSpec {
    /// Fundamental frequency in Hz
    pub fundamental: f32,
    /// Amplitude of each partial relative to the fundamental (index 0 = 1.0)
    pub ratios: Vec<f32>,
    /// Upper bound of the mixed signal's amplitude (0-1)
    pub amplitude: f32,
}

impl ToneSpec {
    pub fn new(fundamental: f32, ratios: &[f32]) -> Self {
        Self {
            fundamental,
            ratios: ratios.to_vec(),
            amplitude: 0.4,
        }
    }
}

/// Sum of harmonics `k * fundamental` weighted by `ratios[k - 1]`
pub fn harmonic_tone(spec: &ToneSpec, sample_rate: u32, seconds: f32) -> Vec<f32> {
    let total = (seconds * sample_rate as f32).round() as usize;
    let norm = spec.ratios.iter().sum::<f32>().max(1.0);
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let value: f32 = spec
                .ratios
                .iter()
                .enumerate()
                .map(|(k, &r)| r * (2.0 * PI * spec.fundamental * (k + 1) as f32 * t).sin())
                .sum();
            spec.amplitude * value / norm
        })
        .collect()
}

/// European-style two-tone siren: alternates between two pitches
///
/// Phase is kept continuous across the switches.
pub fn two_tone_siren(
    low: f32,
    high: f32,
    ratios: &[f32],
    period_secs: f32,
    sample_rate: u32,
    seconds: f32,
) -> Vec<f32> {
    let total = (seconds * sample_rate as f32).round() as usize;
    let norm = ratios.iter().sum::<f32>().max(1.0);
    let mut phase = 0.0f32;
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let in_high_half = (t / period_secs).fract() >= 0.5;
            let frequency = if in_high_half { high } else { low };
            phase = (phase + 2.0 * PI * frequency / sample_rate as f32) % (2.0 * PI);
            let value: f32 = ratios
                .iter()
                .enumerate()
                .map(|(k, &r)| r * (phase * (k + 1) as f32).sin())
                .sum();
            0.4 * value / norm
        })
        .collect()
}

pub fn silence(sample_rate: u32, seconds: f32) -> Vec<f32> {
    vec![0.0; (seconds * sample_rate as f32).round() as usize]
}

/// Write mono f32 samples as 16-bit PCM WAV
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_length_and_range() {
        let spec = ToneSpec::new(1000.0, &[1.0, 0.5, 0.3]);
        let samples = harmonic_tone(&spec, 44100, 0.5);
        assert_eq!(samples.len(), 22050);
        assert!(samples.iter().all(|s| s.abs() <= 0.4 + 1e-6));
    }

    #[test]
    fn test_siren_is_bounded() {
        let samples = two_tone_siren(440.0, 585.0, &[1.0, 0.4], 1.0, 44100, 1.0);
        assert_eq!(samples.len(), 44100);
        assert!(samples.iter().all(|s| s.abs() <= 0.4 + 1e-6));
    }
}
