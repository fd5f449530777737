//! Window function for the spectrum analyser

use std::f32::consts::PI;

/// Classic Blackman window (alpha = 0.16), what browser analysers apply
///
/// Periodic form: the first coefficient is 0 and the peak sits at `size / 2`.
pub fn blackman_window(size: usize) -> Vec<f32> {
    const ALPHA: f32 = 0.16;
    let a0 = (1.0 - ALPHA) / 2.0;
    let a1 = 0.5;
    let a2 = ALPHA / 2.0;

    let n = size as f32;
    (0..size)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / n;
            a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
        })
        .collect()
}
