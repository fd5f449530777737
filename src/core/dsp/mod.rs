//! Digital Signal Processing utilities
//!
//! Decibel-to-linear conversion, band/bin geometry, the Blackman window,
//! the analyser that turns PCM into dB frames, and small statistics helpers.

mod fft;
mod stats;
mod windows;

pub use fft::{SpectrumAnalyser, DB_FLOOR};
pub use stats::{mean, normalize_to_peak, pearson_correlation};
pub use windows::blackman_window;

use crate::config::DetectorConfig;

/// Map one dB magnitude onto the linear scale used by the analysis
///
/// `linear = max(0, 10^((db + 100) / 40) * 10)`. -100 dB maps to 10,
/// -60 dB to 100. NaN and -inf map to 0.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    (10f32.powf((db + 100.0) / 40.0) * 10.0).max(0.0)
}

/// Convert a frame of dB magnitudes to a same-length linear frame
pub fn convert_to_linear(db_frame: &[f32]) -> Vec<f32> {
    db_frame.iter().map(|&db| db_to_linear(db)).collect()
}

/// Bin geometry of the analysis band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Hz per bin (`sample_rate / fft_size`)
    pub bin_width: f32,
    /// `floor(min_frequency / bin_width)`
    pub min_bin: usize,
    /// `ceil(max_frequency / bin_width)`, inclusive for peak search
    pub max_bin: usize,
}

impl FrequencyBand {
    pub fn new(min_frequency: f32, max_frequency: f32, bin_width: f32) -> Self {
        Self {
            min_frequency,
            max_frequency,
            bin_width,
            min_bin: (min_frequency / bin_width).floor() as usize,
            max_bin: (max_frequency / bin_width).ceil() as usize,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.min_frequency, config.max_frequency, config.bin_width())
    }

    #[inline]
    pub fn bin_to_frequency(&self, bin: f32) -> f32 {
        bin * self.bin_width
    }

    #[inline]
    pub fn frequency_to_bin(&self, frequency: f32) -> usize {
        (frequency / self.bin_width).round().max(0.0) as usize
    }

    pub fn contains(&self, frequency: f32) -> bool {
        frequency >= self.min_frequency && frequency <= self.max_frequency
    }

    /// Band slice `[min_bin, max_bin)` of a spectrum, clipped to its length
    pub fn slice<'a>(&self, spectrum: &'a [f32]) -> &'a [f32] {
        let end = self.max_bin.min(spectrum.len());
        let start = self.min_bin.min(end);
        &spectrum[start..end]
    }
}
