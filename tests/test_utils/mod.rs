#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

use sirencheckr::config::DetectorConfig;
use sirencheckr::testgen::{harmonic_tone, silence, write_wav, ToneSpec};

/// Siren-like timbre used across the integration tests
pub const SIREN_RATIOS: [f32; 5] = [1.0, 0.5, 0.3, 0.1, 0.05];

/// Linear spectrum length for the default 4096-point FFT
pub const BIN_COUNT: usize = 2048;

pub fn bin_width() -> f32 {
    DetectorConfig::default().bin_width()
}

/// Build a linear spectrum with harmonics of `fundamental` at `ratios * level`
pub fn synthetic_spectrum(fundamental: f32, ratios: &[f32], level: f32) -> Vec<f32> {
    let width = bin_width();
    let mut spectrum = vec![0.0; BIN_COUNT];
    for (k, ratio) in ratios.iter().enumerate() {
        let bin = (fundamental * (k + 1) as f32 / width).round() as usize;
        if bin < spectrum.len() {
            spectrum[bin] = level * ratio;
        }
    }
    spectrum
}

/// Scratch directory removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("sirencheckr-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).expect("Failed to create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn write_tone(path: &Path, fundamental: f32, ratios: &[f32], seconds: f32, sample_rate: u32) {
    let samples = harmonic_tone(&ToneSpec::new(fundamental, ratios), sample_rate, seconds);
    write_wav(path, &samples, sample_rate).expect("Failed to write tone");
}

pub fn write_silence(path: &Path, seconds: f32, sample_rate: u32) {
    write_wav(path, &silence(sample_rate, seconds), sample_rate).expect("Failed to write silence");
}

pub fn run_sirencheckr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sirencheckr"))
}
