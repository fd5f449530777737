// src/core/analysis/harmonics.rs
//
// Overtone strength measurement relative to the fundamental

use serde::Serialize;

/// Half-width (bins) of the search window around each expected overtone
pub const HARMONIC_SEARCH_RADIUS: usize = 3;

/// Relative strengths of a fundamental and its overtones
///
/// Index 0 is the fundamental; index k is harmonic order k+1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicProfile {
    pub fundamental_freq_hz: f32,
    /// Measured magnitudes, `num_harmonics + 1` entries
    pub magnitudes: Vec<f32>,
    /// Frequency of the bin each magnitude was taken from
    pub frequencies: Vec<f32>,
    /// `magnitudes[k] / fundamental magnitude`; `ratios[0]` is exactly 1.0
    pub ratios: Vec<f32>,
}

impl HarmonicProfile {
    /// Number of overtones above the fundamental
    pub fn num_harmonics(&self) -> usize {
        self.ratios.len().saturating_sub(1)
    }
}

/// Measures the first `num_harmonics` overtones of a fundamental
#[derive(Debug, Clone, Copy)]
pub struct HarmonicAnalyzer {
    bin_width: f32,
    num_harmonics: usize,
}

impl HarmonicAnalyzer {
    pub fn new(bin_width: f32, num_harmonics: usize) -> Self {
        Self {
            bin_width,
            num_harmonics,
        }
    }

    pub fn num_harmonics(&self) -> usize {
        self.num_harmonics
    }

    /// Build the harmonic profile of `fundamental_freq` in a linear spectrum
    ///
    /// Never fails: missing energy degrades to ratios near zero, and a silent
    /// fundamental bin is treated as magnitude 1 for the division.
    pub fn analyze(&self, spectrum: &[f32], fundamental_freq: f32) -> HarmonicProfile {
        let fundamental_bin = self.frequency_to_bin(fundamental_freq);
        let fundamental_magnitude = spectrum.get(fundamental_bin).copied().unwrap_or(0.0);
        let reference = if fundamental_magnitude == 0.0 {
            1.0
        } else {
            fundamental_magnitude
        };

        let capacity = self.num_harmonics + 1;
        let mut magnitudes = Vec::with_capacity(capacity);
        let mut frequencies = Vec::with_capacity(capacity);
        let mut ratios = Vec::with_capacity(capacity);

        magnitudes.push(fundamental_magnitude);
        frequencies.push(fundamental_freq);
        ratios.push(1.0);

        for order in 2..=self.num_harmonics + 1 {
            let expected_bin = self.frequency_to_bin(fundamental_freq * order as f32);
            let (bin, magnitude) = local_maximum(spectrum, expected_bin, HARMONIC_SEARCH_RADIUS);
            magnitudes.push(magnitude);
            frequencies.push(bin as f32 * self.bin_width);
            ratios.push((magnitude / reference).max(0.0));
        }

        HarmonicProfile {
            fundamental_freq_hz: fundamental_freq,
            magnitudes,
            frequencies,
            ratios,
        }
    }

    fn frequency_to_bin(&self, frequency: f32) -> usize {
        (frequency / self.bin_width).round().max(0.0) as usize
    }
}

/// Strongest bin within `radius` of `center`, first maximum wins
///
/// A window entirely past the end of the spectrum reports `(center, 0.0)`.
fn local_maximum(spectrum: &[f32], center: usize, radius: usize) -> (usize, f32) {
    let start = center.saturating_sub(radius);
    let end = (center + radius).min(spectrum.len().saturating_sub(1));
    if start >= spectrum.len() || start > end {
        return (center, 0.0);
    }

    let mut best = (start, spectrum[start]);
    for (bin, &magnitude) in spectrum.iter().enumerate().take(end + 1).skip(start + 1) {
        if magnitude > best.1 {
            best = (bin, magnitude);
        }
    }
    best
}
