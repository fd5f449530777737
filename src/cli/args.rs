//! CLI argument parsing with preset support

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DetectorConfig, MatchMethod, ProfilePreset};

#[derive(Parser, Debug)]
#[command(name = "sirencheckr")]
#[command(version, about = "Learn a siren's acoustic signature and find it in recordings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Detector configuration file (JSON)
    #[arg(long, global = true, env = "SIRENCHECKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Detection preset (standard, sensitive, strict)
    #[arg(long, global = true, default_value = "standard")]
    pub preset: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Learn a signature from the first seconds of a recording
    Learn {
        /// Recording that starts with the siren
        file: PathBuf,

        /// Where to store the signature
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan recordings for the learned siren
    Detect {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Signature file (defaults to the stored one)
        #[arg(short, long)]
        signature: Option<PathBuf>,

        /// Match tolerance in percent (10-90)
        #[arg(long)]
        tolerance: Option<f32>,

        /// Minimum peak magnitude on the linear scale (1-50)
        #[arg(long)]
        min_magnitude: Option<f32>,

        /// Scoring method
        #[arg(long, value_enum)]
        method: Option<MethodArg>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a stored signature
    Inspect {
        /// Signature file (defaults to the stored one)
        signature: Option<PathBuf>,
    },

    /// Write a synthetic harmonic tone as WAV
    Generate {
        /// Output WAV path
        output: PathBuf,

        /// Fundamental frequency in Hz
        #[arg(long, default_value_t = 1000.0)]
        fundamental: f32,

        /// Relative amplitude of each harmonic, comma separated
        #[arg(long, value_delimiter = ',', default_value = "1.0,0.5,0.3,0.1")]
        ratios: Vec<f32>,

        /// Alternate with this second pitch every half second (two-tone siren)
        #[arg(long)]
        alternate: Option<f32>,

        /// Length in seconds
        #[arg(long, default_value_t = 6.0)]
        seconds: f32,

        /// Sample rate of the written file
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
    },

    /// List available presets and exit
    Presets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Harmonic,
    Correlation,
}

impl From<MethodArg> for MatchMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Harmonic => MatchMethod::Harmonic,
            MethodArg::Correlation => MatchMethod::Correlation,
        }
    }
}

impl Cli {
    /// Resolve the base configuration: file first, otherwise the preset
    pub fn base_config(&self) -> Result<DetectorConfig> {
        if let Some(path) = &self.config {
            return Ok(DetectorConfig::load(path)?);
        }
        let preset = ProfilePreset::from_name(&self.preset)
            .ok_or_else(|| anyhow!("Unknown preset: {}", self.preset))?;
        Ok(DetectorConfig::from_preset(preset))
    }
}

/// Apply per-run overrides; knobs are clamped the same way as at runtime
pub fn apply_overrides(
    config: &mut DetectorConfig,
    tolerance: Option<f32>,
    min_magnitude: Option<f32>,
    method: Option<MethodArg>,
) {
    if let Some(tolerance) = tolerance {
        config.set_tolerance(tolerance);
    }
    if let Some(min_magnitude) = min_magnitude {
        config.set_min_magnitude(min_magnitude);
    }
    if let Some(method) = method {
        config.match_method = method.into();
    }
}

/// Print available presets
pub fn print_presets() {
    println!("Available detection presets:\n");

    for preset in ProfilePreset::all() {
        let config = DetectorConfig::from_preset(preset);
        println!("  {} - {}", preset.name(), preset.description());
        println!("    Tolerance: {:.0}%", config.tolerance);
        println!("    Min magnitude: {:.0}", config.min_magnitude);
        println!(
            "    Band: {:.0}-{:.0} Hz, {} harmonics",
            config.min_frequency, config.max_frequency, config.num_harmonics
        );
        println!();
    }
}
