//! SirenCheckr - Learn a siren's acoustic signature and detect it in audio
//!
//! Captures the harmonic fingerprint of one siren during a short learning
//! window and then scores every incoming spectrum frame against it.
//!
//! ## Features
//!
//! - **Sub-bin peak location**: Parabolic interpolation inside a configurable band
//! - **Harmonic fingerprinting**: Relative strength of the first N harmonics
//! - **Two scoring methods**: Harmonic-ratio deviation or band-spectrum correlation
//! - **Runtime knobs**: Tolerance and magnitude floor adjustable between frames
//! - **Recorded audio**: Any format symphonia decodes, resampled to the analysis rate
//!
//! ## Module Structure
//!
//! - `core` - DSP, analysis, learning, matching and the detection session
//! - `cli` - Command-line interface
//! - `config` - Detector configuration and presets
//! - `detection` - Per-frame results and detection reports
//! - `error` - Error types
//! - `testgen` - Synthetic siren signals for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sirencheckr::config::DetectorConfig;
//! use sirencheckr::core::SirenAnalyzer;
//!
//! let config = DetectorConfig::default();
//!
//! // Learn from a recording that starts with the siren
//! let learned = SirenAnalyzer::new(path, &config)?.learn()?;
//! let signature = learned.signature.expect("no signature");
//!
//! // Scan another recording
//! let report = SirenAnalyzer::new(other, &config)?.detect(Some(signature.into()))?;
//! println!("{} ({:.0}%)", report.verdict.description(), report.best_similarity);
//! ```
//!
//! ## Presets
//!
//! | Preset    | Use Case                   | Tolerance | Magnitude floor |
//! |-----------|----------------------------|-----------|-----------------|
//! | Standard  | General use                | 50%       | 10              |
//! | Sensitive | Distant or quiet sirens    | 60%       | 6               |
//! | Strict    | Busy streets               | 30%       | 16              |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and presets
pub mod config;

// Detection result types
pub mod detection;

pub mod error;

// Synthetic test signals
pub mod testgen;

// Re-export commonly used types at crate root for convenience
pub use config::{ConfigBuilder, DetectorConfig, MatchMethod, ProfilePreset};
pub use core::{
    DetectionSession, LearningReport, MatchResult, SessionMode, Signature, SirenAnalyzer,
};
pub use detection::{DetectionReport, DetectionVerdict, FrameOutcome, FrameResult, LearningStatus};
pub use error::{ConfigError, SessionError, SignatureError};
