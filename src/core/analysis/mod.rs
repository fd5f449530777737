//! Per-frame spectral analysis
//!
//! - Peak location with parabolic sub-bin refinement
//! - Harmonic ratio extraction relative to the fundamental

mod harmonics;
mod peak;

pub use harmonics::{HarmonicAnalyzer, HarmonicProfile, HARMONIC_SEARCH_RADIUS};
pub use peak::{parabolic_offset, PeakEstimate, PeakLocator};
