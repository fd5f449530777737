// src/core/session.rs
//
// Per-frame orchestration: convert, locate, analyze, then learn or match

use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use super::analysis::{HarmonicAnalyzer, PeakLocator};
use super::clock::{Clock, SystemClock};
use super::dsp::{convert_to_linear, FrequencyBand};
use super::learner::{LearningProgress, SignatureLearner};
use super::matcher::SignatureMatcher;
use super::signature::{Signature, SignatureContext};
use crate::config::{DetectorConfig, MatchMethod};
use crate::detection::{FrameOutcome, FrameResult, LearningStatus};
use crate::error::{ConfigError, SessionError};

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// No signature, not learning
    Idle,
    /// A learning window is open
    Learning,
    /// Idle with a signature: frames are scored
    Detecting,
}

/// Owns the signature, the learning run and the per-frame pipeline
///
/// The signature is held behind an `Arc` and replaced wholesale, so a host
/// can hand the current one to other threads without locking.
pub struct DetectionSession<C: Clock = SystemClock> {
    config: DetectorConfig,
    band: FrequencyBand,
    locator: PeakLocator,
    analyzer: HarmonicAnalyzer,
    learner: SignatureLearner,
    matcher: SignatureMatcher,
    signature: Option<Arc<Signature>>,
    last_learning: Option<LearningStatus>,
    clock: C,
}

impl DetectionSession<SystemClock> {
    /// Session timed by the wall clock
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> DetectionSession<C> {
    pub fn with_clock(config: DetectorConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let band = FrequencyBand::from_config(&config);
        debug!(
            "Session band {:.0}-{:.0} Hz -> bins {}..={} ({:.2} Hz/bin)",
            band.min_frequency, band.max_frequency, band.min_bin, band.max_bin, band.bin_width
        );

        Ok(Self {
            locator: PeakLocator::new(band),
            analyzer: HarmonicAnalyzer::new(band.bin_width, config.num_harmonics),
            learner: SignatureLearner::new(
                band,
                Duration::from_millis(config.learn_duration_ms),
                SignatureContext::from_config(&config),
            ),
            matcher: SignatureMatcher::new(config.match_method),
            band,
            signature: None,
            last_learning: None,
            clock,
            config,
        })
    }

    pub fn mode(&self) -> SessionMode {
        if self.learner.is_learning() {
            SessionMode::Learning
        } else if self.signature.is_some() {
            SessionMode::Detecting
        } else {
            SessionMode::Idle
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn band(&self) -> &FrequencyBand {
        &self.band
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Current signature handle
    pub fn signature(&self) -> Option<Arc<Signature>> {
        self.signature.clone()
    }

    /// Install a previously stored (or shared) signature
    pub fn set_signature(&mut self, signature: impl Into<Arc<Signature>>) {
        let signature = signature.into();
        if !signature.is_compatible_with(&self.config) {
            debug!("Signature was learned with different analysis settings");
        }
        self.signature = Some(signature);
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    /// Outcome of the most recent learning run
    pub fn last_learning(&self) -> Option<LearningStatus> {
        self.last_learning
    }

    // Runtime knobs

    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.config.set_tolerance(tolerance);
    }

    pub fn set_min_magnitude(&mut self, min_magnitude: f32) {
        self.config.set_min_magnitude(min_magnitude);
    }

    pub fn adjust_tolerance(&mut self, steps: i32) -> f32 {
        self.config.adjust_tolerance(steps)
    }

    pub fn adjust_min_magnitude(&mut self, steps: i32) -> f32 {
        self.config.adjust_min_magnitude(steps)
    }

    pub fn set_match_method(&mut self, method: MatchMethod) {
        self.config.match_method = method;
        self.matcher.set_method(method);
    }

    // Learning lifecycle

    /// Open a fresh learning window at the current clock time
    pub fn start_learning(&mut self) -> Result<(), SessionError> {
        if self.learner.is_learning() {
            return Err(SessionError::LearningInProgress);
        }
        self.learner.start(self.clock.now());
        Ok(())
    }

    pub fn learning_progress(&self) -> Option<LearningProgress> {
        self.learner.progress(self.clock.now())
    }

    /// Close the learning window now
    ///
    /// On success the new signature replaces the old one; on failure the old
    /// one is kept.
    pub fn finish_learning(&mut self) -> LearningStatus {
        let status = match self.learner.finish() {
            Ok(signature) => {
                let sample_count = signature.sample_count;
                self.signature = Some(Arc::new(signature));
                LearningStatus::Learned { sample_count }
            }
            Err(reason) => LearningStatus::Failed(reason),
        };
        self.last_learning = Some(status);
        status
    }

    /// Capture stopped: drop any open learning run without a signature
    pub fn cancel_learning(&mut self) -> Option<LearningStatus> {
        let status = self.learner.cancel().map(LearningStatus::Failed);
        if status.is_some() {
            self.last_learning = status;
        }
        status
    }

    // Per-frame processing

    /// Process one dB-scale frame from the spectrum provider
    pub fn process_frame(&mut self, db_frame: &[f32]) -> FrameResult {
        let spectrum = convert_to_linear(db_frame);
        self.process_linear(&spectrum)
    }

    /// Process one frame that is already on the linear scale
    pub fn process_linear(&mut self, spectrum: &[f32]) -> FrameResult {
        let now = self.clock.now();
        let peak = self.locator.locate(spectrum);
        let profile = self.analyzer.analyze(spectrum, peak.frequency_hz);
        let band_spectrum = self.band.slice(spectrum);

        let observed = self.learner.observe(
            &profile,
            &peak,
            band_spectrum,
            self.config.min_magnitude,
            now,
        );

        let outcome = if let Some(progress) = observed {
            if progress.window_closed {
                let status = self.finish_learning();
                info!("Learning window closed: {}", status.description());
                FrameOutcome::LearningFinished(status)
            } else {
                FrameOutcome::Learning(progress)
            }
        } else if peak.magnitude < self.config.min_magnitude {
            FrameOutcome::WeakSignal
        } else if let Some(signature) = self.signature.as_deref() {
            FrameOutcome::Scored(self.matcher.evaluate(
                Some(signature),
                &profile,
                band_spectrum,
                peak.magnitude,
                self.config.min_magnitude,
                self.config.tolerance,
            ))
        } else {
            FrameOutcome::NoSignature
        };

        FrameResult {
            timestamp: now,
            peak,
            outcome,
        }
    }
}
