//! Configuration module for SirenCheckr

mod profiles;

pub use profiles::{
    ConfigBuilder, DetectorConfig, MatchMethod, ProfilePreset,
    MAX_TOLERANCE, MIN_MAGNITUDE_CEILING, MIN_MAGNITUDE_FLOOR, MIN_MAGNITUDE_STEP,
    MIN_TOLERANCE, TOLERANCE_STEP,
};
