//! Error types for SirenCheckr
//!
//! Per-frame processing never fails; these cover configuration, persisted
//! signatures and misuse of the session API by the host.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid detector configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,

    #[error("FFT size {0} must be a power of two between 32 and 32768")]
    InvalidFftSize(usize),

    #[error("frequency band {min} Hz - {max} Hz is empty or inverted")]
    InvalidBand { min: f32, max: f32 },

    #[error("maximum frequency {max} Hz exceeds Nyquist ({nyquist} Hz)")]
    AboveNyquist { max: f32, nyquist: f32 },

    #[error("at least one harmonic must be analyzed")]
    NoHarmonics,

    #[error("learning window must be longer than zero")]
    ZeroLearnDuration,

    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(f32),

    #[error("smoothing factor must be in [0, 1), got {0}")]
    InvalidSmoothing(f32),

    #[error("tolerance must be in [10, 90], got {0}")]
    InvalidTolerance(f32),

    #[error("minimum magnitude must be in [1, 50], got {0}")]
    InvalidMinMagnitude(f32),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Problems loading or storing a learned signature
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed signature document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signature has no harmonic ratios")]
    Empty,

    #[error("fundamental ratio must be exactly 1.0, got {0}")]
    BadFundamental(f32),

    #[error("harmonic ratio {index} is negative ({value})")]
    NegativeRatio { index: usize, value: f32 },
}

/// Host-side misuse of a detection session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a learning run is already in progress")]
    LearningInProgress,
}
