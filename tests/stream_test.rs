// tests/stream_test.rs
//
// End-to-end: synthesize recordings, learn from one, scan the others

mod test_utils;

use std::sync::Arc;

use sirencheckr::config::{DetectorConfig, MatchMethod};
use sirencheckr::core::{LearningFailure, Signature, SirenAnalyzer};
use sirencheckr::detection::{DetectionVerdict, LearningStatus};
use test_utils::*;

fn learn_signature(dir: &TempDir, config: &DetectorConfig) -> Arc<Signature> {
    let path = dir.join("siren.wav");
    write_tone(&path, 1000.0, &SIREN_RATIOS[..4], 6.0, 44100);

    let report = SirenAnalyzer::new(&path, config).unwrap().learn().unwrap();
    assert!(report.status.is_success(), "{:?}", report.status);
    assert!(report.samples_accepted >= 10);
    Arc::new(report.signature.expect("signature after successful learning"))
}

#[test]
fn learned_tone_is_found_again() {
    let dir = TempDir::new();
    let config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);

    assert_eq!(signature.num_harmonics(), config.num_harmonics);
    assert_eq!(signature.harmonic_ratios[0], 1.0);
    // The dB mapping compresses amplitude ratios to roughly their square root
    assert!((signature.harmonic_ratios[1] - 0.5f32.sqrt()).abs() < 0.05);

    let report = SirenAnalyzer::new(&dir.join("siren.wav"), &config)
        .unwrap()
        .detect(Some(signature))
        .unwrap();
    assert_eq!(report.verdict, DetectionVerdict::Detected);
    assert!(report.best_similarity >= 90.0);
    assert!(report.match_ratio() > 0.9);
    assert!(!report.events.is_empty());
    assert!((report.events[0].mean_frequency_hz - 1000.0).abs() < 15.0);
}

#[test]
fn different_timbre_is_rejected() {
    let dir = TempDir::new();
    let config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);

    let horn = dir.join("horn.wav");
    write_tone(&horn, 1000.0, &[1.0, 0.05, 0.9, 0.6], 3.0, 44100);

    let report = SirenAnalyzer::new(&horn, &config)
        .unwrap()
        .detect(Some(signature))
        .unwrap();
    assert_eq!(report.verdict, DetectionVerdict::NotDetected);
    assert_eq!(report.matched_frames, 0);
    assert!(report.events.is_empty());
}

#[test]
fn silence_is_too_weak() {
    let dir = TempDir::new();
    let config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);

    let quiet = dir.join("quiet.wav");
    write_silence(&quiet, 2.0, 44100);

    let report = SirenAnalyzer::new(&quiet, &config)
        .unwrap()
        .detect(Some(signature))
        .unwrap();
    assert_eq!(report.verdict, DetectionVerdict::NoSignal);
    assert_eq!(report.weak_frames, report.total_frames);
}

#[test]
fn signature_survives_save_and_load() {
    let dir = TempDir::new();
    let config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);

    let path = dir.join("store/signature.json");
    signature.save(&path).unwrap();
    let loaded = Signature::load(&path).unwrap();

    assert_eq!(loaded.sample_count, signature.sample_count);
    assert_eq!(loaded.harmonic_ratios, signature.harmonic_ratios);
    assert!(loaded.is_compatible_with(&config));
}

#[test]
fn other_sample_rates_are_resampled() {
    let dir = TempDir::new();
    let config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);

    let path = dir.join("siren_48k.wav");
    write_tone(&path, 1000.0, &SIREN_RATIOS[..4], 3.0, 48000);

    let analyzer = SirenAnalyzer::new(&path, &config).unwrap();
    assert!((analyzer.duration_secs() - 3.0).abs() < 0.05);

    let report = analyzer.detect(Some(signature)).unwrap();
    assert_eq!(report.verdict, DetectionVerdict::Detected);
}

#[test]
fn correlation_method_detects_learned_tone() {
    let dir = TempDir::new();
    let mut config = DetectorConfig::default();
    let signature = learn_signature(&dir, &config);
    config.match_method = MatchMethod::Correlation;

    let report = SirenAnalyzer::new(&dir.join("siren.wav"), &config)
        .unwrap()
        .detect(Some(signature))
        .unwrap();
    assert_eq!(report.method, MatchMethod::Correlation);
    assert_eq!(report.verdict, DetectionVerdict::Detected);
}

#[test]
fn short_recording_aborts_learning() {
    let dir = TempDir::new();
    let path = dir.join("short.wav");
    write_tone(&path, 1000.0, &SIREN_RATIOS, 2.0, 44100);

    let report = SirenAnalyzer::new(&path, &DetectorConfig::default())
        .unwrap()
        .learn()
        .unwrap();
    assert!(matches!(
        report.status,
        LearningStatus::Failed(LearningFailure::Aborted { .. })
    ));
    assert!(report.signature.is_none());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new();
    assert!(SirenAnalyzer::new(&dir.join("nope.wav"), &DetectorConfig::default()).is_err());
}
