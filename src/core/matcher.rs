// src/core/matcher.rs
//
// Scoring live frames against the learned signature
//
// Both methods report similarity in percent and share one tolerance rule:
// a frame matches when `similarity_percent >= 100 - tolerance`. For the
// correlation method that is `correlation >= 1 - tolerance / 100`.

use serde::Serialize;

use super::analysis::HarmonicProfile;
use super::dsp::{normalize_to_peak, pearson_correlation};
use super::signature::Signature;
use crate::config::MatchMethod;

/// Floor for the learned ratio when computing relative deviation
pub const DEVIATION_FLOOR: f32 = 0.1;

/// Score of one live frame against the signature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched: bool,
    /// Similarity in [0, 100]
    pub similarity_percent: f32,
    /// Relative deviation per overtone (harmonic method only)
    pub per_harmonic_deviation: Vec<f32>,
}

impl MatchResult {
    /// The "nothing to compare" result
    pub fn none() -> Self {
        Self {
            matched: false,
            similarity_percent: 0.0,
            per_harmonic_deviation: Vec::new(),
        }
    }
}

/// Compares live measurements with a signature under a tolerance
#[derive(Debug, Clone, Copy)]
pub struct SignatureMatcher {
    method: MatchMethod,
}

impl SignatureMatcher {
    pub fn new(method: MatchMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }

    pub fn set_method(&mut self, method: MatchMethod) {
        self.method = method;
    }

    /// Score a frame
    ///
    /// Short-circuits to no match when there is no signature or the live
    /// magnitude is below `min_magnitude`.
    pub fn evaluate(
        &self,
        signature: Option<&Signature>,
        profile: &HarmonicProfile,
        band_spectrum: &[f32],
        magnitude: f32,
        min_magnitude: f32,
        tolerance: f32,
    ) -> MatchResult {
        let Some(signature) = signature else {
            return MatchResult::none();
        };
        if magnitude < min_magnitude {
            return MatchResult::none();
        }

        let (similarity_percent, per_harmonic_deviation) = match self.method {
            MatchMethod::Harmonic => harmonic_similarity(&signature.harmonic_ratios, &profile.ratios),
            MatchMethod::Correlation => (
                spectral_similarity(&signature.band_spectrum, band_spectrum),
                Vec::new(),
            ),
        };

        MatchResult {
            matched: similarity_percent >= 100.0 - tolerance,
            similarity_percent,
            per_harmonic_deviation,
        }
    }
}

/// Similarity (percent) from per-overtone relative deviation
///
/// The fundamental (index 0) is skipped. Only the overlapping range of the
/// two ratio vectors is compared; no overlap counts as total mismatch.
pub fn harmonic_similarity(learned: &[f32], live: &[f32]) -> (f32, Vec<f32>) {
    let overlap = learned.len().min(live.len());
    let deviations: Vec<f32> = (1..overlap)
        .map(|i| (learned[i] - live[i]).abs() / learned[i].max(DEVIATION_FLOOR))
        .collect();

    let average_deviation = if deviations.is_empty() {
        1.0
    } else {
        deviations.iter().sum::<f32>() / deviations.len() as f32
    };

    ((1.0 - average_deviation).max(0.0) * 100.0, deviations)
}

/// Similarity (percent) from the Pearson correlation of peak-normalized band spectra
///
/// A silent live band or a degenerate comparison scores 0.
pub fn spectral_similarity(learned: &[f32], live: &[f32]) -> f32 {
    let Some(live) = normalize_to_peak(live) else {
        return 0.0;
    };
    pearson_correlation(&live, learned) * 100.0
}
