//! FFT processing with windowing and temporal smoothing
//!
//! Produces the dB-scale frames the detection engine consumes, the same way a
//! browser analyser node does: window, FFT, normalize by the FFT length,
//! smooth against the previous frame, convert to dB.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::windows::blackman_window;

/// dB value reported for bins with no energy
pub const DB_FLOOR: f32 = -200.0;

/// Stateful analyser turning PCM blocks into smoothed dB magnitude frames
pub struct SpectrumAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_size: usize,
    smoothing: f32,
    smoothed: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            fft,
            window: blackman_window(fft_size),
            fft_size,
            smoothing: smoothing.clamp(0.0, 0.999),
            smoothed: vec![0.0; fft_size / 2],
            buffer: Vec::with_capacity(fft_size),
        }
    }

    /// Analyse the most recent `fft_size` samples
    ///
    /// Shorter input is treated as preceded by silence. Returns
    /// `fft_size / 2` dB values.
    pub fn process(&mut self, samples: &[f32]) -> Vec<f32> {
        let start = samples.len().saturating_sub(self.fft_size);
        let recent = &samples[start..];
        let pad = self.fft_size - recent.len();

        self.buffer.clear();
        self.buffer
            .extend(std::iter::repeat(Complex::new(0.0, 0.0)).take(pad));
        self.buffer.extend(
            recent
                .iter()
                .zip(self.window[pad..].iter())
                .map(|(&s, &w)| Complex::new(s * w, 0.0)),
        );

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        for (state, bin) in self.smoothed.iter_mut().zip(self.buffer.iter()) {
            let magnitude = bin.norm() * scale;
            *state = tau * *state + (1.0 - tau) * magnitude;
            // Flush denormals so silence decays to the floor
            if !state.is_normal() {
                *state = 0.0;
            }
        }

        self.smoothed
            .iter()
            .map(|&m| if m > 0.0 { (20.0 * m.log10()).max(DB_FLOOR) } else { DB_FLOOR })
            .collect()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}
