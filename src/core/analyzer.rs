// src/core/analyzer.rs
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::decoder::{load_mono, MonoAudio};
use super::detector::{detect_in_samples, learn_from_samples, LearningReport};
use super::signature::Signature;
use crate::config::DetectorConfig;
use crate::detection::DetectionReport;

/// A recording decoded for siren analysis
pub struct SirenAnalyzer {
    path: PathBuf,
    audio: MonoAudio,
    config: DetectorConfig,
}

impl SirenAnalyzer {
    /// Decode `path`, downmix and resample to the configured rate
    pub fn new(path: &Path, config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let audio = load_mono(path, config.sample_rate)?;
        Ok(Self {
            path: path.to_path_buf(),
            audio,
            config: config.clone(),
        })
    }

    /// Wrap already-decoded mono samples at the configured rate
    pub fn from_samples(label: impl Into<PathBuf>, samples: Vec<f32>, config: &DetectorConfig) -> Self {
        Self {
            path: label.into(),
            audio: MonoAudio {
                samples,
                sample_rate: config.sample_rate,
            },
            config: config.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_secs(&self) -> f64 {
        self.audio.duration_secs()
    }

    pub fn learn(&self) -> Result<LearningReport> {
        learn_from_samples(&self.audio.samples, &self.config)
    }

    pub fn detect(&self, signature: Option<Arc<Signature>>) -> Result<DetectionReport> {
        let label = self.path.display().to_string();
        detect_in_samples(&self.audio.samples, &self.config, signature, &label)
    }
}
