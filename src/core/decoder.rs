// src/core/decoder.rs
//
// Audio decoding and sample-rate conversion.
// Uses Symphonia for format-agnostic decoding and rubato for resampling.

use anyhow::{bail, Context, Result};
use log::debug;
use rubato::{FftFixedIn, Resampler};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Container for decoded audio data
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: usize,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Original codec name
    pub codec_name: String,
}

/// Mono signal at a known sample rate, ready for framing
#[derive(Debug, Clone)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode audio file to floating-point samples
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe file format - may be corrupted or unsupported")?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No supported audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("File does not specify sample rate")?;

    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    if channels == 0 {
        bail!("File reports 0 audio channels");
    }

    let codec_name = format!("{:?}", track.codec_params.codec);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder for audio codec")?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(symphonia::core::errors::Error::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        bail!("No audio samples decoded from file");
    }

    let duration_secs = samples.len() as f64 / (sample_rate as f64 * channels as f64);
    debug!(
        "Decoded {}: {} Hz, {} ch, {:.2}s, {}",
        path.display(),
        sample_rate,
        channels,
        duration_secs,
        codec_name
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        duration_secs,
        codec_name,
    })
}

/// Extract mono samples from potentially multi-channel audio
pub fn extract_mono(audio: &AudioData) -> Vec<f32> {
    if audio.channels == 1 {
        return audio.samples.clone();
    }

    audio
        .samples
        .chunks_exact(audio.channels)
        .map(|frame| frame.iter().sum::<f32>() / audio.channels as f32)
        .collect()
}

/// Convert a mono signal to `target_rate`
pub fn resample_mono(samples: &[f32], from_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if from_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    const CHUNK_SIZE: usize = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, target_rate as usize, CHUNK_SIZE, 2, 1)
            .context("Failed to create resampler")?;

    let expected_len =
        (samples.len() as f64 * target_rate as f64 / from_rate as f64).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + CHUNK_SIZE);

    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let block = [&samples[pos..pos + n]];
        let out = resampler.process(&block[..], None)?;
        output.extend_from_slice(&out[0]);
        pos += n;
    }

    if pos < samples.len() {
        let tail = [&samples[pos..]];
        let out = resampler.process_partial(Some(&tail[..]), None)?;
        output.extend_from_slice(&out[0]);
    }

    // Flush the filter tail until the delayed signal is out
    while output.len() < expected_len + delay {
        let out = resampler.process_partial::<&[f32]>(None, None)?;
        if out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&out[0]);
    }

    debug!(
        "Resampled {} -> {} Hz ({} -> {} samples)",
        from_rate,
        target_rate,
        samples.len(),
        expected_len
    );

    Ok(output
        .into_iter()
        .skip(delay)
        .take(expected_len)
        .collect())
}

/// Decode, downmix and resample a file for analysis
pub fn load_mono(path: &Path, target_rate: u32) -> Result<MonoAudio> {
    let audio = decode_audio(path)?;
    let mono = extract_mono(&audio);
    let samples = resample_mono(&mono, audio.sample_rate, target_rate)
        .with_context(|| format!("Failed to resample {}", path.display()))?;
    Ok(MonoAudio {
        samples,
        sample_rate: target_rate,
    })
}
