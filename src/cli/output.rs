//! Output formatting for CLI results

use std::path::Path;

use crate::core::{LearningReport, Signature};
use crate::detection::{DetectionReport, DetectionVerdict};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn verdict_color(verdict: DetectionVerdict) -> &'static str {
    match verdict {
        DetectionVerdict::Detected => "\x1b[32m",    // green
        DetectionVerdict::NotDetected => "\x1b[31m", // red
        DetectionVerdict::NoSignal => "\x1b[33m",    // yellow
        DetectionVerdict::Unknown => "\x1b[90m",     // gray
    }
}

/// Format a detection report for terminal output
pub fn format_detection(report: &DetectionReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}{} {}{}{}{} [{}, tolerance {:.0}%]{}\n",
        verdict_color(report.verdict),
        report.verdict.symbol(),
        BOLD,
        report.file_path,
        RESET,
        DIM,
        report.method.name(),
        report.tolerance,
        RESET,
    ));

    output.push_str(&format!(
        "  {} (best similarity: {:.0}%, matched {}/{} frames)\n",
        report.verdict.description(),
        report.best_similarity,
        report.matched_frames,
        report.total_frames
    ));

    if !report.events.is_empty() {
        output.push_str("\n  Events:\n");
        for event in &report.events {
            output.push_str(&format!(
                "    {:>7.2}s - {:>7.2}s  {:>5.0}%  ~{:.0} Hz\n",
                event.start_secs, event.end_secs, event.peak_similarity, event.mean_frequency_hz
            ));
        }
    }

    if verbose {
        output.push_str(&format!(
            "  {}Frames: {} scored | {} weak | {} unscored | mean similarity {:.1}% | min magnitude {:.0}{}\n",
            DIM,
            report.scored_frames,
            report.weak_frames,
            report.unscored_frames,
            report.mean_similarity,
            report.min_magnitude,
            RESET
        ));
    }

    output
}

/// Format detection reports as JSON
pub fn format_json(reports: &[DetectionReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

/// Format the outcome of a learning pass
pub fn format_learning(report: &LearningReport, saved_to: Option<&Path>) -> String {
    let mut output = String::new();

    if report.status.is_success() {
        output.push_str(&format!(
            "\x1b[32m✓ {}{}\n",
            report.status.description(),
            RESET
        ));
    } else {
        output.push_str(&format!(
            "\x1b[31m✗ {}{}\n",
            report.status.description(),
            RESET
        ));
    }

    output.push_str(&format!(
        "  {}{} frames observed, {} accepted{}\n",
        DIM, report.frames_observed, report.samples_accepted, RESET
    ));

    if let Some(signature) = &report.signature {
        output.push_str(&format_ratios(&signature.harmonic_ratios));
    }

    if let Some(path) = saved_to {
        output.push_str(&format!("  Saved to {}\n", path.display()));
    }

    output
}

/// Format a stored signature
pub fn format_signature(signature: &Signature, path: &Path) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}{}{}\n", BOLD, path.display(), RESET));
    output.push_str(&format!(
        "  Learned {} from {} samples\n",
        signature.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        signature.sample_count
    ));
    output.push_str(&format_ratios(&signature.harmonic_ratios));
    output.push_str(&format!(
        "  Band spectrum: {} bins\n",
        signature.band_spectrum.len()
    ));

    if let Some(context) = &signature.context {
        output.push_str(&format!(
            "  {}Captured at {} Hz, FFT {}, band {:.0}-{:.0} Hz{}\n",
            DIM,
            context.sample_rate,
            context.fft_size,
            context.min_frequency,
            context.max_frequency,
            RESET
        ));
    }

    output
}

fn format_ratios(ratios: &[f32]) -> String {
    let ratios: Vec<String> = ratios
        .iter()
        .enumerate()
        .map(|(i, r)| format!("H{}={:.3}", i + 1, r))
        .collect();
    format!("  Harmonic ratios: {}\n", ratios.join(" "))
}

/// Format a summary for multiple files
pub fn format_summary(reports: &[DetectionReport]) -> String {
    let mut output = String::new();

    let count = |verdict: DetectionVerdict| reports.iter().filter(|r| r.verdict == verdict).count();
    let detected = count(DetectionVerdict::Detected);
    let not_detected = count(DetectionVerdict::NotDetected);
    let no_signal = count(DetectionVerdict::NoSignal);
    let unknown = count(DetectionVerdict::Unknown);

    output.push_str(&format!("\n{}Summary:{}\n", BOLD, RESET));
    output.push_str(&format!("  {} files scanned\n", reports.len()));

    if detected > 0 {
        output.push_str(&format!("  \x1b[32m✓ {} with siren{}\n", detected, RESET));
    }
    if not_detected > 0 {
        output.push_str(&format!("  \x1b[31m✗ {} without siren{}\n", not_detected, RESET));
    }
    if no_signal > 0 {
        output.push_str(&format!("  \x1b[33m· {} too quiet{}\n", no_signal, RESET));
    }
    if unknown > 0 {
        output.push_str(&format!("  \x1b[90m— {} unscored{}\n", unknown, RESET));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;

    fn report(verdict: DetectionVerdict) -> DetectionReport {
        let mut report = DetectionReport::new("street.wav", &DetectorConfig::default());
        report.verdict = verdict;
        report.best_similarity = 87.0;
        report
    }

    #[test]
    fn test_format_detection() {
        let output = format_detection(&report(DetectionVerdict::Detected), false);
        assert!(output.contains("street.wav"));
        assert!(output.contains("Siren detected"));
        assert!(output.contains("87%"));
        assert!(!output.contains("Frames:"));

        let verbose = format_detection(&report(DetectionVerdict::Detected), true);
        assert!(verbose.contains("Frames:"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&[report(DetectionVerdict::NotDetected)]).unwrap();
        assert!(json.contains("\"file_path\": \"street.wav\""));
        assert!(json.contains("\"verdict\": \"not_detected\""));
        assert!(json.contains("\"method\": \"harmonic\""));
    }

    #[test]
    fn test_format_summary() {
        let reports = vec![
            report(DetectionVerdict::Detected),
            report(DetectionVerdict::Detected),
            report(DetectionVerdict::NoSignal),
        ];
        let output = format_summary(&reports);
        assert!(output.contains("3 files scanned"));
        assert!(output.contains("2 with siren"));
        assert!(output.contains("1 too quiet"));
        assert!(!output.contains("without siren"));
    }
}
