// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{apply_overrides, print_presets, Cli, Command, MethodArg};
pub use output::{
    format_detection, format_json, format_learning, format_signature, format_summary,
};

use anyhow::{Context, Result};
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::DetectorConfig;
use crate::core::{default_signature_path, Signature, SirenAnalyzer};
use crate::detection::DetectionReport;
use crate::testgen::{harmonic_tone, two_tone_siren, write_wav, ToneSpec};

const AUDIO_EXTENSIONS: [&str; 6] = ["flac", "wav", "mp3", "ogg", "m4a", "aac"];

/// Configure `env_logger` from the `-v` count; `RUST_LOG` still wins
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let mut config = cli.base_config()?;

    match cli.command {
        Command::Learn { file, output } => learn(&file, output, &config),
        Command::Detect {
            paths,
            signature,
            tolerance,
            min_magnitude,
            method,
            json,
        } => {
            apply_overrides(&mut config, tolerance, min_magnitude, method);
            detect(&paths, signature, &config, json, cli.verbose > 0)
        }
        Command::Inspect { signature } => inspect(signature),
        Command::Generate {
            output,
            fundamental,
            ratios,
            alternate,
            seconds,
            sample_rate,
        } => {
            let samples = match alternate {
                Some(high) => two_tone_siren(fundamental, high, &ratios, 1.0, sample_rate, seconds),
                None => harmonic_tone(&ToneSpec::new(fundamental, &ratios), sample_rate, seconds),
            };
            write_wav(&output, &samples, sample_rate)?;
            println!(
                "Wrote {:.1}s tone at {:.0} Hz to {}",
                seconds,
                fundamental,
                output.display()
            );
            Ok(())
        }
        Command::Presets => {
            print_presets();
            Ok(())
        }
    }
}

fn learn(file: &Path, output: Option<PathBuf>, config: &DetectorConfig) -> Result<()> {
    println!("Learning from: {}", file.display().to_string().cyan());

    let analyzer = SirenAnalyzer::new(file, config)?;
    let report = analyzer.learn()?;

    let saved_to = match &report.signature {
        Some(signature) => {
            let path = output.unwrap_or_else(default_signature_path);
            signature.save(&path)?;
            info!("Signature written to {}", path.display());
            Some(path)
        }
        None => None,
    };

    print!("{}", format_learning(&report, saved_to.as_deref()));

    if !report.status.is_success() {
        anyhow::bail!("No signature learned");
    }
    Ok(())
}

fn detect(
    paths: &[PathBuf],
    signature_path: Option<PathBuf>,
    config: &DetectorConfig,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let signature_path = signature_path.unwrap_or_else(default_signature_path);
    let signature = Signature::load(&signature_path)
        .with_context(|| format!("Run `sirencheckr learn` first ({})", signature_path.display()))?;
    if !signature.is_compatible_with(config) {
        eprintln!(
            "{} {} was learned with different analysis settings",
            "warning:".yellow(),
            signature_path.display()
        );
    }
    let signature = Arc::new(signature);

    let files = collect_audio_files(paths);
    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }

    if !json {
        println!("Found {} audio file(s)\n", files.len());
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    if json {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let results: Vec<(PathBuf, Result<DetectionReport>)> = files
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| {
            let report = SirenAnalyzer::new(path, config)
                .and_then(|analyzer| analyzer.detect(Some(Arc::clone(&signature))));
            (path.clone(), report)
        })
        .collect();
    progress.finish_and_clear();

    let mut reports = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                if !json {
                    println!("{} {}: {:#}", "✗".red(), path.display(), e);
                }
            }
        }
    }

    if json {
        println!("{}", format_json(&reports)?);
    } else {
        for report in &reports {
            println!("{}", format_detection(report, verbose));
        }
        if reports.len() > 1 {
            print!("{}", format_summary(&reports));
        }
    }

    Ok(())
}

fn inspect(signature_path: Option<PathBuf>) -> Result<()> {
    let path = signature_path.unwrap_or_else(default_signature_path);
    let signature = Signature::load(&path)?;
    print!("{}", format_signature(&signature, &path));
    Ok(())
}

/// Expand files and directories into the audio files they contain
pub fn collect_audio_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            } else {
                warn!("Not an audio file: {}", path.display());
            }
        } else if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
                    .map(|e| e.into_path()),
            );
        } else {
            warn!("No such file or directory: {}", path.display());
        }
    }

    files.sort();
    files
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
