// src/core/learner.rs
//
// Time-boxed accumulation of harmonic measurements into a signature

use chrono::Utc;
use log::{debug, info, warn};
use std::time::Duration;

use super::analysis::{HarmonicProfile, PeakEstimate};
use super::dsp::{mean, normalize_to_peak, FrequencyBand};
use super::signature::{Signature, SignatureContext};

/// Accepted frames required before a signature is trusted
pub const MIN_LEARNING_SAMPLES: usize = 10;

/// One accepted frame of a learning run
#[derive(Debug, Clone)]
pub struct LearningSample {
    pub ratios: Vec<f32>,
    pub band_spectrum: Vec<f32>,
    pub frequency_hz: f32,
    pub magnitude: f32,
    /// Time since the run started
    pub elapsed: Duration,
}

/// Progress report after each observed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningProgress {
    /// Share of the learning window already elapsed (0-100)
    pub percent: f32,
    /// Accepted samples so far
    pub sample_count: usize,
    /// Whether this frame was accepted
    pub accepted: bool,
    /// The window has run out; the caller should `finish()`
    pub window_closed: bool,
}

/// Why a learning run produced no signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningFailure {
    /// Window closed with too few strong, in-band frames
    InsufficientSamples { collected: usize, required: usize },
    /// Capture stopped before the window closed
    Aborted { collected: usize },
    /// `finish()` without a run in progress
    NotLearning,
}

impl std::fmt::Display for LearningFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningFailure::InsufficientSamples { collected, required } => {
                write!(f, "too few samples ({collected} of {required} required)")
            }
            LearningFailure::Aborted { collected } => {
                write!(f, "learning aborted after {collected} samples")
            }
            LearningFailure::NotLearning => write!(f, "no learning run in progress"),
        }
    }
}

#[derive(Debug, Clone)]
enum LearnerState {
    Idle,
    Learning {
        started_at: Duration,
        samples: Vec<LearningSample>,
    },
}

/// Collects samples for one learning window and reduces them to a signature
#[derive(Debug, Clone)]
pub struct SignatureLearner {
    band: FrequencyBand,
    learn_duration: Duration,
    context: SignatureContext,
    state: LearnerState,
}

impl SignatureLearner {
    pub fn new(band: FrequencyBand, learn_duration: Duration, context: SignatureContext) -> Self {
        Self {
            band,
            learn_duration,
            context,
            state: LearnerState::Idle,
        }
    }

    pub fn is_learning(&self) -> bool {
        matches!(self.state, LearnerState::Learning { .. })
    }

    pub fn learn_duration(&self) -> Duration {
        self.learn_duration
    }

    /// Begin a fresh run at `now`, discarding anything collected before
    pub fn start(&mut self, now: Duration) {
        info!(
            "Learning started ({} ms window, {:.0}-{:.0} Hz)",
            self.learn_duration.as_millis(),
            self.band.min_frequency,
            self.band.max_frequency
        );
        self.state = LearnerState::Learning {
            started_at: now,
            samples: Vec::new(),
        };
    }

    /// Offer one analysed frame
    ///
    /// Frames at or below `min_magnitude`, or whose peak lies outside the
    /// band, are dropped silently. Returns `None` while idle.
    pub fn observe(
        &mut self,
        profile: &HarmonicProfile,
        peak: &PeakEstimate,
        band_spectrum: &[f32],
        min_magnitude: f32,
        now: Duration,
    ) -> Option<LearningProgress> {
        let LearnerState::Learning { started_at, samples } = &mut self.state else {
            return None;
        };

        let elapsed = now.saturating_sub(*started_at);
        let accepted = peak.magnitude > min_magnitude && self.band.contains(peak.frequency_hz);
        if accepted {
            samples.push(LearningSample {
                ratios: profile.ratios.clone(),
                band_spectrum: band_spectrum.to_vec(),
                frequency_hz: peak.frequency_hz,
                magnitude: peak.magnitude,
                elapsed,
            });
        }

        Some(LearningProgress {
            percent: progress_percent(elapsed, self.learn_duration),
            sample_count: samples.len(),
            accepted,
            window_closed: elapsed >= self.learn_duration,
        })
    }

    /// Progress at `now` without observing a frame
    pub fn progress(&self, now: Duration) -> Option<LearningProgress> {
        match &self.state {
            LearnerState::Idle => None,
            LearnerState::Learning { started_at, samples } => {
                let elapsed = now.saturating_sub(*started_at);
                Some(LearningProgress {
                    percent: progress_percent(elapsed, self.learn_duration),
                    sample_count: samples.len(),
                    accepted: false,
                    window_closed: elapsed >= self.learn_duration,
                })
            }
        }
    }

    /// Close the run and build a signature from the accepted samples
    ///
    /// Always returns to idle. Fewer than `MIN_LEARNING_SAMPLES` samples
    /// produce no signature.
    pub fn finish(&mut self) -> Result<Signature, LearningFailure> {
        let samples = match std::mem::replace(&mut self.state, LearnerState::Idle) {
            LearnerState::Idle => return Err(LearningFailure::NotLearning),
            LearnerState::Learning { samples, .. } => samples,
        };

        if samples.len() < MIN_LEARNING_SAMPLES {
            warn!(
                "Learning failed: {} samples collected, {} required",
                samples.len(),
                MIN_LEARNING_SAMPLES
            );
            return Err(LearningFailure::InsufficientSamples {
                collected: samples.len(),
                required: MIN_LEARNING_SAMPLES,
            });
        }

        let ratios: Vec<&[f32]> = samples.iter().map(|s| s.ratios.as_slice()).collect();
        let spectra: Vec<&[f32]> = samples.iter().map(|s| s.band_spectrum.as_slice()).collect();
        let harmonic_ratios = average_columns(&ratios);
        let mean_spectrum = average_columns(&spectra);
        let band_spectrum =
            normalize_to_peak(&mean_spectrum).unwrap_or_else(|| vec![0.0; mean_spectrum.len()]);

        let frequencies: Vec<f32> = samples.iter().map(|s| s.frequency_hz).collect();
        let mean_frequency = mean(&frequencies);
        info!(
            "Signature learned from {} samples (mean fundamental {:.0} Hz)",
            samples.len(),
            mean_frequency
        );
        debug!("Learned harmonic ratios: {:?}", harmonic_ratios);

        Ok(Signature {
            harmonic_ratios,
            band_spectrum,
            sample_count: samples.len(),
            created_at: Utc::now(),
            context: Some(self.context.clone()),
        })
    }

    /// Drop the run without producing a signature (capture stopped)
    pub fn cancel(&mut self) -> Option<LearningFailure> {
        match std::mem::replace(&mut self.state, LearnerState::Idle) {
            LearnerState::Idle => None,
            LearnerState::Learning { samples, .. } => {
                warn!("Learning aborted after {} samples", samples.len());
                Some(LearningFailure::Aborted {
                    collected: samples.len(),
                })
            }
        }
    }
}

fn progress_percent(elapsed: Duration, window: Duration) -> f32 {
    if window.is_zero() {
        return 100.0;
    }
    (elapsed.as_secs_f32() / window.as_secs_f32() * 100.0).min(100.0)
}

/// Element-wise mean over rows, truncated to the shortest row
fn average_columns(rows: &[&[f32]]) -> Vec<f32> {
    let width = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    let count = rows.len() as f32;
    (0..width)
        .map(|i| rows.iter().map(|r| r[i]).sum::<f32>() / count)
        .collect()
}
