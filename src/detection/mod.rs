//! Detection module for SirenCheckr

mod result;

pub use result::{
    DetectionEvent, DetectionReport, DetectionVerdict, FrameOutcome, FrameResult, LearningStatus,
};
