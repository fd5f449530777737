//! Core analysis and detection modules

pub mod analysis;
pub mod analyzer;
pub mod clock;
pub mod decoder;
pub mod detector;
pub mod dsp;
pub mod learner;
pub mod matcher;
pub mod session;
pub mod signature;

pub use analysis::{HarmonicAnalyzer, HarmonicProfile, PeakEstimate, PeakLocator};
pub use analyzer::SirenAnalyzer;
pub use clock::{Clock, ManualClock, SystemClock};
pub use decoder::{decode_audio, extract_mono, load_mono, resample_mono, AudioData, MonoAudio};
pub use detector::{
    detect_in_samples, learn_from_samples, scan_frames, FrameScanner, LearningReport,
};
pub use dsp::{convert_to_linear, db_to_linear, FrequencyBand, SpectrumAnalyser};
pub use learner::{
    LearningFailure, LearningProgress, LearningSample, SignatureLearner, MIN_LEARNING_SAMPLES,
};
pub use matcher::{harmonic_similarity, spectral_similarity, MatchResult, SignatureMatcher};
pub use session::{DetectionSession, SessionMode};
pub use signature::{default_signature_path, Signature, SignatureContext};
