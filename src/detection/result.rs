//! Per-frame results and whole-stream detection reports

use serde::Serialize;
use std::time::Duration;

use crate::config::{DetectorConfig, MatchMethod};
use crate::core::{LearningFailure, LearningProgress, MatchResult, PeakEstimate};

/// How a learning run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningStatus {
    /// A new signature replaced the old one
    Learned { sample_count: usize },
    /// No signature was produced; any previous one is kept
    Failed(LearningFailure),
}

impl LearningStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, LearningStatus::Learned { .. })
    }

    pub fn description(&self) -> String {
        match self {
            LearningStatus::Learned { sample_count } => {
                format!("Signature learned ({} samples)", sample_count)
            }
            LearningStatus::Failed(reason) => format!("Learning failed: {}", reason),
        }
    }
}

/// What the session concluded for one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Frame went to the learner
    Learning(LearningProgress),
    /// The learning window closed on this frame
    LearningFinished(LearningStatus),
    /// Peak below the magnitude floor; nothing classified
    WeakSignal,
    /// No signature yet; frequency only
    NoSignature,
    /// Frame was scored against the signature
    Scored(MatchResult),
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    /// Session clock at the time of the frame
    pub timestamp: Duration,
    pub peak: PeakEstimate,
    pub outcome: FrameOutcome,
}

impl FrameResult {
    pub fn is_match(&self) -> bool {
        matches!(&self.outcome, FrameOutcome::Scored(m) if m.matched)
    }

    /// Similarity of a scored frame
    pub fn similarity(&self) -> Option<f32> {
        match &self.outcome {
            FrameOutcome::Scored(m) => Some(m.similarity_percent),
            _ => None,
        }
    }

    /// Frequency worth displaying, `None` for weak frames
    pub fn display_frequency(&self) -> Option<f32> {
        match self.outcome {
            FrameOutcome::WeakSignal => None,
            _ => Some(self.peak.frequency_hz),
        }
    }
}

/// A run of consecutive matching frames
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionEvent {
    pub start_secs: f64,
    pub end_secs: f64,
    pub frames: usize,
    pub peak_similarity: f32,
    pub mean_frequency_hz: f32,
}

impl DetectionEvent {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

#[derive(Debug, Clone)]
struct OpenEvent {
    start: Duration,
    end: Duration,
    frames: usize,
    peak_similarity: f32,
    frequency_sum: f32,
}

impl OpenEvent {
    fn close(self) -> DetectionEvent {
        DetectionEvent {
            start_secs: self.start.as_secs_f64(),
            end_secs: self.end.as_secs_f64(),
            frames: self.frames,
            peak_similarity: self.peak_similarity,
            mean_frequency_hz: self.frequency_sum / self.frames as f32,
        }
    }
}

/// Overall verdict for a scanned stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionVerdict {
    /// At least one frame matched the signature
    Detected,
    /// Signal was present but never matched
    NotDetected,
    /// Every frame was below the magnitude floor
    NoSignal,
    /// Nothing could be scored (no signature)
    Unknown,
}

impl DetectionVerdict {
    pub fn symbol(&self) -> &'static str {
        match self {
            DetectionVerdict::Detected => "✓",
            DetectionVerdict::NotDetected => "✗",
            DetectionVerdict::NoSignal => "·",
            DetectionVerdict::Unknown => "—",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DetectionVerdict::Detected => "Siren detected",
            DetectionVerdict::NotDetected => "No siren",
            DetectionVerdict::NoSignal => "Signal too weak",
            DetectionVerdict::Unknown => "No signature learned",
        }
    }
}

/// Summary of a detection pass over one stream
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub file_path: String,
    pub method: MatchMethod,
    pub tolerance: f32,
    pub min_magnitude: f32,
    pub duration_secs: f64,
    pub verdict: DetectionVerdict,
    pub total_frames: usize,
    pub weak_frames: usize,
    pub unscored_frames: usize,
    pub scored_frames: usize,
    pub matched_frames: usize,
    pub best_similarity: f32,
    pub mean_similarity: f32,
    pub events: Vec<DetectionEvent>,
    #[serde(skip)]
    similarity_sum: f64,
    #[serde(skip)]
    open_event: Option<OpenEvent>,
}

impl DetectionReport {
    pub fn new(file_path: impl Into<String>, config: &DetectorConfig) -> Self {
        Self {
            file_path: file_path.into(),
            method: config.match_method,
            tolerance: config.tolerance,
            min_magnitude: config.min_magnitude,
            duration_secs: 0.0,
            verdict: DetectionVerdict::Unknown,
            total_frames: 0,
            weak_frames: 0,
            unscored_frames: 0,
            scored_frames: 0,
            matched_frames: 0,
            best_similarity: 0.0,
            mean_similarity: 0.0,
            events: Vec::new(),
            similarity_sum: 0.0,
            open_event: None,
        }
    }

    /// Fold one frame into the summary
    pub fn record(&mut self, frame: &FrameResult) {
        self.total_frames += 1;
        self.duration_secs = self.duration_secs.max(frame.timestamp.as_secs_f64());

        match &frame.outcome {
            FrameOutcome::WeakSignal => self.weak_frames += 1,
            FrameOutcome::Scored(result) => {
                self.scored_frames += 1;
                self.similarity_sum += result.similarity_percent as f64;
                self.best_similarity = self.best_similarity.max(result.similarity_percent);
            }
            _ => self.unscored_frames += 1,
        }

        if frame.is_match() {
            self.matched_frames += 1;
            let similarity = frame.similarity().unwrap_or(0.0);
            let event = self.open_event.get_or_insert(OpenEvent {
                start: frame.timestamp,
                end: frame.timestamp,
                frames: 0,
                peak_similarity: 0.0,
                frequency_sum: 0.0,
            });
            event.end = frame.timestamp;
            event.frames += 1;
            event.peak_similarity = event.peak_similarity.max(similarity);
            event.frequency_sum += frame.peak.frequency_hz;
        } else if let Some(event) = self.open_event.take() {
            self.events.push(event.close());
        }
    }

    /// Close any open event and derive the verdict
    pub fn finalize(&mut self) {
        if let Some(event) = self.open_event.take() {
            self.events.push(event.close());
        }

        self.mean_similarity = if self.scored_frames > 0 {
            (self.similarity_sum / self.scored_frames as f64) as f32
        } else {
            0.0
        };

        self.verdict = if self.matched_frames > 0 {
            DetectionVerdict::Detected
        } else if self.scored_frames > 0 {
            DetectionVerdict::NotDetected
        } else if self.total_frames > 0 && self.weak_frames == self.total_frames {
            DetectionVerdict::NoSignal
        } else {
            DetectionVerdict::Unknown
        };
    }

    /// Share of all frames that matched (0-1)
    pub fn match_ratio(&self) -> f32 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.matched_frames as f32 / self.total_frames as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ms: u64, outcome: FrameOutcome) -> FrameResult {
        FrameResult {
            timestamp: Duration::from_millis(ms),
            peak: PeakEstimate {
                frequency_hz: 1000.0,
                magnitude: 40.0,
                bin_index: 93,
            },
            outcome,
        }
    }

    fn scored(similarity: f32, matched: bool) -> FrameOutcome {
        FrameOutcome::Scored(MatchResult {
            matched,
            similarity_percent: similarity,
            per_harmonic_deviation: vec![],
        })
    }

    #[test]
    fn test_events_split_on_non_matching_frames() {
        let mut report = DetectionReport::new("test.wav", &DetectorConfig::default());
        report.record(&frame(0, scored(90.0, true)));
        report.record(&frame(100, scored(95.0, true)));
        report.record(&frame(200, scored(20.0, false)));
        report.record(&frame(300, FrameOutcome::WeakSignal));
        report.record(&frame(400, scored(70.0, true)));
        report.finalize();

        assert_eq!(report.verdict, DetectionVerdict::Detected);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[0].frames, 2);
        assert_eq!(report.events[0].peak_similarity, 95.0);
        assert!((report.events[0].duration_secs() - 0.1).abs() < 1e-9);
        assert_eq!(report.events[1].frames, 1);
        assert_eq!(report.matched_frames, 3);
        assert_eq!(report.weak_frames, 1);
        assert!((report.mean_similarity - 68.75).abs() < 1e-3);
        assert_eq!(report.best_similarity, 95.0);
    }

    #[test]
    fn test_verdicts() {
        let config = DetectorConfig::default();

        let mut weak = DetectionReport::new("a", &config);
        weak.record(&frame(0, FrameOutcome::WeakSignal));
        weak.finalize();
        assert_eq!(weak.verdict, DetectionVerdict::NoSignal);

        let mut missed = DetectionReport::new("b", &config);
        missed.record(&frame(0, scored(10.0, false)));
        missed.finalize();
        assert_eq!(missed.verdict, DetectionVerdict::NotDetected);

        let mut unknown = DetectionReport::new("c", &config);
        unknown.record(&frame(0, FrameOutcome::NoSignature));
        unknown.finalize();
        assert_eq!(unknown.verdict, DetectionVerdict::Unknown);
    }

    #[test]
    fn test_display_frequency_hidden_when_weak() {
        assert!(frame(0, FrameOutcome::WeakSignal).display_frequency().is_none());
        assert_eq!(frame(0, FrameOutcome::NoSignature).display_frequency(), Some(1000.0));
    }
}
