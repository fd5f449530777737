// src/core/detector.rs
//
// Drives a detection session over recorded audio, frame by frame, the way a
// live host would: one analyser frame per refresh tick, stream time as clock.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::clock::ManualClock;
use super::dsp::SpectrumAnalyser;
use super::session::DetectionSession;
use super::signature::Signature;
use crate::config::DetectorConfig;
use crate::detection::{DetectionReport, FrameOutcome, FrameResult, LearningStatus};

/// Yields the analysis window for each host refresh tick
///
/// Tick `k` ends at sample `k * hop`; its window is the trailing `fft_size`
/// samples (shorter at the very start, like a freshly opened capture).
pub struct FrameScanner<'a> {
    samples: &'a [f32],
    sample_rate: u32,
    fft_size: usize,
    hop: usize,
    next_end: usize,
}

impl<'a> FrameScanner<'a> {
    pub fn new(samples: &'a [f32], config: &DetectorConfig) -> Self {
        let hop = (config.sample_rate as f32 / config.frame_rate).round().max(1.0) as usize;
        Self {
            samples,
            sample_rate: config.sample_rate,
            fft_size: config.fft_size,
            hop,
            next_end: hop,
        }
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of ticks the whole signal yields
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.hop
    }
}

impl<'a> Iterator for FrameScanner<'a> {
    /// (stream time at the end of the window, window samples)
    type Item = (Duration, &'a [f32]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_end > self.samples.len() {
            return None;
        }
        let end = self.next_end;
        let start = end.saturating_sub(self.fft_size);
        self.next_end += self.hop;

        let timestamp = Duration::from_secs_f64(end as f64 / self.sample_rate as f64);
        Some((timestamp, &self.samples[start..end]))
    }
}

/// Outcome of learning from a recording
#[derive(Debug, Clone)]
pub struct LearningReport {
    pub status: LearningStatus,
    pub signature: Option<Signature>,
    /// Frames fed to the learner
    pub frames_observed: usize,
    /// Frames the learner kept
    pub samples_accepted: usize,
}

/// Feed every tick of `samples` through `session`
///
/// `on_frame` returns `false` to stop early.
pub fn scan_frames<F>(
    samples: &[f32],
    session: &mut DetectionSession<ManualClock>,
    mut on_frame: F,
) where
    F: FnMut(&FrameResult) -> bool,
{
    let config = session.config().clone();
    let mut analyser = SpectrumAnalyser::new(config.fft_size, config.smoothing);

    for (timestamp, window) in FrameScanner::new(samples, &config) {
        session.clock_mut().set(timestamp);
        let db_frame = analyser.process(window);
        let result = session.process_frame(&db_frame);
        if !on_frame(&result) {
            break;
        }
    }
}

/// Learn a signature from the start of a recording
///
/// The learning window starts at t = 0. A recording shorter than the window
/// counts as capture stopping early: the run is aborted.
pub fn learn_from_samples(samples: &[f32], config: &DetectorConfig) -> Result<LearningReport> {
    let mut session = DetectionSession::with_clock(config.clone(), ManualClock::new())?;
    session.start_learning()?;

    let mut frames_observed = 0;
    let mut samples_accepted = 0;
    let mut finished = None;

    scan_frames(samples, &mut session, |frame| {
        frames_observed += 1;
        match frame.outcome {
            FrameOutcome::Learning(progress) => {
                samples_accepted = progress.sample_count;
                true
            }
            FrameOutcome::LearningFinished(status) => {
                if let LearningStatus::Learned { sample_count } = status {
                    samples_accepted = sample_count;
                }
                finished = Some(status);
                false
            }
            _ => false,
        }
    });

    let status = match finished {
        Some(status) => status,
        None => {
            warn!(
                "Recording ended before the {} ms learning window closed",
                config.learn_duration_ms
            );
            session
                .cancel_learning()
                .unwrap_or(LearningStatus::Failed(crate::core::LearningFailure::NotLearning))
        }
    };

    let signature = if status.is_success() {
        session.signature().map(|s| (*s).clone())
    } else {
        None
    };

    debug!(
        "Learning pass: {} frames, {} accepted, {}",
        frames_observed,
        samples_accepted,
        status.description()
    );

    Ok(LearningReport {
        status,
        signature,
        frames_observed,
        samples_accepted,
    })
}

/// Score every tick of a recording against `signature`
pub fn detect_in_samples(
    samples: &[f32],
    config: &DetectorConfig,
    signature: Option<Arc<Signature>>,
    label: &str,
) -> Result<DetectionReport> {
    let mut session = DetectionSession::with_clock(config.clone(), ManualClock::new())?;
    if let Some(signature) = signature {
        session.set_signature(signature);
    }

    let mut report = DetectionReport::new(label, config);
    scan_frames(samples, &mut session, |frame| {
        report.record(frame);
        true
    });
    report.finalize();

    debug!(
        "{}: {} frames, {} matched, {} events",
        label,
        report.total_frames,
        report.matched_frames,
        report.events.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_ticks() {
        let config = DetectorConfig::default();
        let samples = vec![0.0; 44100];
        let scanner = FrameScanner::new(&samples, &config);
        assert_eq!(scanner.hop(), 735);
        assert_eq!(scanner.frame_count(), 60);

        let frames: Vec<_> = FrameScanner::new(&samples, &config).collect();
        assert_eq!(frames.len(), 60);
        assert_eq!(frames[0].1.len(), 735);
        assert_eq!(frames[10].1.len(), 4096);
        assert!((frames[59].0.as_secs_f64() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_recording_aborts_learning() {
        let config = DetectorConfig::default();
        let samples = vec![0.0; 44100];
        let report = learn_from_samples(&samples, &config).unwrap();
        assert_eq!(
            report.status,
            LearningStatus::Failed(crate::core::LearningFailure::Aborted { collected: 0 })
        );
        assert!(report.signature.is_none());
    }

    #[test]
    fn test_silence_has_no_signal() {
        let config = DetectorConfig::default();
        let samples = vec![0.0; 22050];
        let report = detect_in_samples(&samples, &config, None, "silence").unwrap();
        assert_eq!(report.total_frames, 30);
        assert_eq!(report.weak_frames, 30);
        assert_eq!(report.verdict, crate::detection::DetectionVerdict::NoSignal);
    }
}
