// src/core/signature.rs
//
// Learned siren signature and its JSON persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::DetectorConfig;
use crate::error::SignatureError;

/// Analysis settings a signature was learned under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureContext {
    pub sample_rate: u32,
    pub fft_size: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,
}

impl SignatureContext {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            fft_size: config.fft_size,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
        }
    }
}

/// Averaged harmonic fingerprint of a learned sound
///
/// Immutable once built; a new learning run replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Mean harmonic ratios, index 0 is the fundamental (1.0)
    pub harmonic_ratios: Vec<f32>,
    /// Mean band spectrum normalized to peak 1.0 (correlation matching)
    #[serde(default)]
    pub band_spectrum: Vec<f32>,
    /// Number of accepted frames that went into the averages
    pub sample_count: usize,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SignatureContext>,
}

impl Signature {
    pub fn num_harmonics(&self) -> usize {
        self.harmonic_ratios.len().saturating_sub(1)
    }

    /// Check the invariants a usable signature must satisfy
    pub fn validate(&self) -> Result<(), SignatureError> {
        let fundamental = *self.harmonic_ratios.first().ok_or(SignatureError::Empty)?;
        if fundamental != 1.0 {
            return Err(SignatureError::BadFundamental(fundamental));
        }
        if let Some((index, &value)) = self
            .harmonic_ratios
            .iter()
            .enumerate()
            .find(|(_, &r)| !(r >= 0.0))
        {
            return Err(SignatureError::NegativeRatio { index, value });
        }
        Ok(())
    }

    /// Whether this signature was learned with the same analysis geometry
    ///
    /// Signatures without a recorded context are assumed compatible.
    pub fn is_compatible_with(&self, config: &DetectorConfig) -> bool {
        match &self.context {
            Some(context) => *context == SignatureContext::from_config(config),
            None => true,
        }
    }

    pub fn to_json(&self) -> Result<String, SignatureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SignatureError> {
        let signature: Self = serde_json::from_str(json)?;
        signature.validate()?;
        Ok(signature)
    }

    pub fn save(&self, path: &Path) -> Result<(), SignatureError> {
        let io_err = |source: std::io::Error| SignatureError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_err)
    }

    pub fn load(path: &Path) -> Result<Self, SignatureError> {
        let json = std::fs::read_to_string(path).map_err(|source| SignatureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Default signature location: `<data dir>/sirencheckr/signature.json`
pub fn default_signature_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sirencheckr")
        .join("signature.json")
}
