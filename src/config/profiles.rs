// src/config/profiles.rs
//
// Detector configuration, presets and the runtime-adjustable knobs

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest tolerance the host can dial in (percent)
pub const MIN_TOLERANCE: f32 = 10.0;
/// Highest tolerance the host can dial in (percent)
pub const MAX_TOLERANCE: f32 = 90.0;
/// Step used by the tolerance +/- controls
pub const TOLERANCE_STEP: f32 = 10.0;

pub const MIN_MAGNITUDE_FLOOR: f32 = 1.0;
pub const MIN_MAGNITUDE_CEILING: f32 = 50.0;
pub const MIN_MAGNITUDE_STEP: f32 = 2.0;

/// How a live frame is scored against the learned signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Per-harmonic relative deviation of overtone ratios
    #[default]
    Harmonic,
    /// Pearson correlation of the normalized band spectrum
    Correlation,
}

impl MatchMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "harmonic" | "harmonics" => Some(Self::Harmonic),
            "correlation" | "pearson" => Some(Self::Correlation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchMethod::Harmonic => "harmonic",
            MatchMethod::Correlation => "correlation",
        }
    }
}

/// Preset profiles for common listening environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfilePreset {
    /// Balanced defaults
    Standard,
    /// Distant or quiet sirens: low magnitude floor, permissive matching
    Sensitive,
    /// Busy streets: high magnitude floor, tight matching
    Strict,
}

impl ProfilePreset {
    pub fn all() -> Vec<Self> {
        vec![Self::Standard, Self::Sensitive, Self::Strict]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "sensitive" => Some(Self::Sensitive),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProfilePreset::Standard => "standard",
            ProfilePreset::Sensitive => "sensitive",
            ProfilePreset::Strict => "strict",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProfilePreset::Standard => "Balanced defaults (tolerance 50%, magnitude floor 10)",
            ProfilePreset::Sensitive => "Distant or quiet sirens (tolerance 60%, magnitude floor 6)",
            ProfilePreset::Strict => "Noisy streets (tolerance 30%, magnitude floor 16)",
        }
    }
}

/// Complete detector configuration
///
/// `sample_rate`, `fft_size`, the band and `num_harmonics` must stay fixed
/// for the lifetime of a session. `tolerance` and `min_magnitude` can be
/// changed between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    /// Sample rate of the analyzed audio in Hz
    pub sample_rate: u32,
    /// FFT length; frames carry `fft_size / 2` bins
    pub fft_size: usize,
    /// Lower edge of the analysis band in Hz
    pub min_frequency: f32,
    /// Upper edge of the analysis band in Hz
    pub max_frequency: f32,
    /// Length of one learning window in milliseconds
    pub learn_duration_ms: u64,
    /// Number of overtones measured above the fundamental
    pub num_harmonics: usize,
    /// Match permissiveness in percent (10-90)
    pub tolerance: f32,
    /// Linear magnitude a peak needs to count as signal
    pub min_magnitude: f32,
    /// Spectrum smoothing time constant of the analyser (0 = none)
    pub smoothing: f32,
    /// Frames per second delivered by the host
    pub frame_rate: f32,
    /// Scoring method used while detecting
    pub match_method: MatchMethod,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from_preset(ProfilePreset::Standard)
    }
}

impl DetectorConfig {
    /// Create configuration from preset
    pub fn from_preset(preset: ProfilePreset) -> Self {
        let base = Self {
            sample_rate: 44100,
            fft_size: 4096,
            min_frequency: 300.0,
            max_frequency: 3000.0,
            learn_duration_ms: 5000,
            num_harmonics: 4,
            tolerance: 50.0,
            min_magnitude: 10.0,
            smoothing: 0.8,
            frame_rate: 60.0,
            match_method: MatchMethod::Harmonic,
        };

        match preset {
            ProfilePreset::Standard => base,
            ProfilePreset::Sensitive => Self {
                tolerance: 60.0,
                min_magnitude: 6.0,
                ..base
            },
            ProfilePreset::Strict => Self {
                tolerance: 30.0,
                min_magnitude: 16.0,
                ..base
            },
        }
    }

    /// Load a JSON config file; missing fields fall back to the standard preset
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(ConfigError::InvalidFftSize(self.fft_size));
        }
        if !(self.min_frequency >= 0.0 && self.min_frequency < self.max_frequency) {
            return Err(ConfigError::InvalidBand {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if self.max_frequency > nyquist {
            return Err(ConfigError::AboveNyquist {
                max: self.max_frequency,
                nyquist,
            });
        }
        if self.num_harmonics == 0 {
            return Err(ConfigError::NoHarmonics);
        }
        if self.learn_duration_ms == 0 {
            return Err(ConfigError::ZeroLearnDuration);
        }
        if !(self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing));
        }
        if !(MIN_TOLERANCE..=MAX_TOLERANCE).contains(&self.tolerance) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !(MIN_MAGNITUDE_FLOOR..=MIN_MAGNITUDE_CEILING).contains(&self.min_magnitude) {
            return Err(ConfigError::InvalidMinMagnitude(self.min_magnitude));
        }
        Ok(())
    }

    /// Width of one frequency bin in Hz
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Number of bins in a frame delivered by the analyser
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Similarity (percent) a frame must reach to count as a match
    pub fn match_threshold(&self) -> f32 {
        100.0 - self.tolerance
    }

    /// Clamp into [10, 90]; NaN leaves the current value in place
    pub fn set_tolerance(&mut self, tolerance: f32) {
        if !tolerance.is_nan() {
            self.tolerance = tolerance.clamp(MIN_TOLERANCE, MAX_TOLERANCE);
        }
    }

    /// Clamp into [1, 50]; NaN leaves the current value in place
    pub fn set_min_magnitude(&mut self, min_magnitude: f32) {
        if !min_magnitude.is_nan() {
            self.min_magnitude = min_magnitude.clamp(MIN_MAGNITUDE_FLOOR, MIN_MAGNITUDE_CEILING);
        }
    }

    /// Move tolerance by `steps` increments of 10, clamped to [10, 90]
    pub fn adjust_tolerance(&mut self, steps: i32) -> f32 {
        self.set_tolerance(self.tolerance + steps as f32 * TOLERANCE_STEP);
        self.tolerance
    }

    /// Move the magnitude floor by `steps` increments of 2, clamped to [1, 50]
    pub fn adjust_min_magnitude(&mut self, steps: i32) -> f32 {
        self.set_min_magnitude(self.min_magnitude + steps as f32 * MIN_MAGNITUDE_STEP);
        self.min_magnitude
    }
}

/// Builder for custom configurations
pub struct ConfigBuilder {
    config: DetectorConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn from_preset(preset: ProfilePreset) -> Self {
        Self {
            config: DetectorConfig::from_preset(preset),
        }
    }

    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn fft_size(mut self, fft_size: usize) -> Self {
        self.config.fft_size = fft_size;
        self
    }

    pub fn band(mut self, min_frequency: f32, max_frequency: f32) -> Self {
        self.config.min_frequency = min_frequency;
        self.config.max_frequency = max_frequency;
        self
    }

    pub fn learn_duration_ms(mut self, duration_ms: u64) -> Self {
        self.config.learn_duration_ms = duration_ms;
        self
    }

    pub fn num_harmonics(mut self, count: usize) -> Self {
        self.config.num_harmonics = count;
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.config.set_tolerance(tolerance);
        self
    }

    pub fn min_magnitude(mut self, min_magnitude: f32) -> Self {
        self.config.set_min_magnitude(min_magnitude);
        self
    }

    pub fn smoothing(mut self, smoothing: f32) -> Self {
        self.config.smoothing = smoothing;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    pub fn match_method(mut self, method: MatchMethod) -> Self {
        self.config.match_method = method;
        self
    }

    pub fn build(self) -> Result<DetectorConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
