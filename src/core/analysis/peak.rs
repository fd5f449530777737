// src/core/analysis/peak.rs
//
// Dominant-frequency estimation inside the analysis band

use serde::Serialize;

use crate::core::dsp::FrequencyBand;

/// Strongest spectral peak in the band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakEstimate {
    /// Interpolated frequency in Hz, never negative
    pub frequency_hz: f32,
    /// Linear magnitude of the winning bin
    pub magnitude: f32,
    /// Winning bin
    pub bin_index: usize,
}

/// Locates the strongest emission between the band edges
#[derive(Debug, Clone, Copy)]
pub struct PeakLocator {
    band: FrequencyBand,
}

impl PeakLocator {
    pub fn new(band: FrequencyBand) -> Self {
        Self { band }
    }

    pub fn band(&self) -> &FrequencyBand {
        &self.band
    }

    /// Find the band maximum and refine it with parabolic interpolation
    ///
    /// Ties resolve to the lowest bin. A silent band still yields an estimate
    /// at `min_bin` with magnitude 0; callers judge significance.
    pub fn locate(&self, spectrum: &[f32]) -> PeakEstimate {
        let min_bin = self.band.min_bin;
        let last_bin = self.band.max_bin.min(spectrum.len().saturating_sub(1));

        let mut best_bin = min_bin;
        let mut best_magnitude = 0.0f32;
        if min_bin < spectrum.len() {
            for (bin, &magnitude) in spectrum[min_bin..=last_bin].iter().enumerate() {
                if magnitude > best_magnitude {
                    best_magnitude = magnitude;
                    best_bin = min_bin + bin;
                }
            }
        }

        let mut frequency = self.band.bin_to_frequency(best_bin as f32);
        let at_edge = best_bin <= min_bin || best_bin >= last_bin;
        if !at_edge {
            if let Some(delta) = parabolic_offset(
                spectrum[best_bin - 1],
                spectrum[best_bin],
                spectrum[best_bin + 1],
            ) {
                frequency = self.band.bin_to_frequency(best_bin as f32 + delta);
            }
        }

        PeakEstimate {
            frequency_hz: frequency.max(0.0),
            magnitude: best_magnitude,
            bin_index: best_bin,
        }
    }
}

/// Sub-bin offset of a parabola's vertex through three equally spaced points
///
/// `None` when the points are collinear.
pub fn parabolic_offset(y0: f32, y1: f32, y2: f32) -> Option<f32> {
    let denominator = y0 - 2.0 * y1 + y2;
    if denominator == 0.0 {
        return None;
    }
    Some(0.5 * (y0 - y2) / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIN_WIDTH: f32 = 44100.0 / 4096.0;

    fn locator() -> PeakLocator {
        PeakLocator::new(FrequencyBand::new(300.0, 3000.0, BIN_WIDTH))
    }

    #[test]
    fn test_symmetric_peak_is_not_shifted() {
        let mut spectrum = vec![0.0; 2048];
        spectrum[92] = 20.0;
        spectrum[93] = 40.0;
        spectrum[94] = 20.0;

        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 93);
        assert_eq!(peak.magnitude, 40.0);
        assert!((peak.frequency_hz - 93.0 * BIN_WIDTH).abs() < 1e-3);
    }

    #[test]
    fn test_asymmetric_peak_is_refined_towards_neighbor() {
        let mut spectrum = vec![0.0; 2048];
        spectrum[92] = 10.0;
        spectrum[93] = 40.0;
        spectrum[94] = 30.0;

        let peak = locator().locate(&spectrum);
        // delta = 0.5 * (10 - 30) / (10 - 80 + 30) = 0.25
        assert!((peak.frequency_hz - 93.25 * BIN_WIDTH).abs() < 1e-3);
    }

    #[test]
    fn test_silent_band_reports_min_bin() {
        let spectrum = vec![0.0; 2048];
        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 27);
        assert_eq!(peak.magnitude, 0.0);
        assert!((peak.frequency_hz - 27.0 * BIN_WIDTH).abs() < 1e-3);
    }

    #[test]
    fn test_ties_keep_lowest_bin() {
        let mut spectrum = vec![0.0; 2048];
        spectrum[50] = 15.0;
        spectrum[120] = 15.0;
        assert_eq!(locator().locate(&spectrum).bin_index, 50);
    }

    #[test]
    fn test_out_of_band_energy_is_ignored() {
        let mut spectrum = vec![0.0; 2048];
        spectrum[10] = 100.0;
        spectrum[400] = 100.0;
        spectrum[150] = 5.0;
        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 150);
    }

    #[test]
    fn test_edge_bins_skip_refinement() {
        let mut spectrum = vec![0.0; 2048];
        spectrum[27] = 30.0;
        spectrum[28] = 29.0;
        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 27);
        assert!((peak.frequency_hz - 27.0 * BIN_WIDTH).abs() < 1e-3);

        let mut spectrum = vec![0.0; 2048];
        spectrum[278] = 29.0;
        spectrum[279] = 30.0;
        spectrum[280] = 10.0;
        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 279);
        assert!((peak.frequency_hz - 279.0 * BIN_WIDTH).abs() < 1e-3);
    }

    #[test]
    fn test_short_frame_is_clipped() {
        let mut spectrum = vec![0.0; 100];
        spectrum[99] = 12.0;
        let peak = locator().locate(&spectrum);
        assert_eq!(peak.bin_index, 99);

        let peak = locator().locate(&[1.0; 10]);
        assert_eq!(peak.bin_index, 27);
        assert_eq!(peak.magnitude, 0.0);
    }

    #[test]
    fn test_frequency_stays_near_band() {
        let band = FrequencyBand::new(300.0, 3000.0, BIN_WIDTH);
        for center in band.min_bin..=band.max_bin {
            let mut spectrum = vec![1.0; 2048];
            spectrum[center] = 50.0;
            spectrum[center + 1] = 49.0;
            let peak = locator().locate(&spectrum);
            assert!(peak.frequency_hz >= band.min_bin as f32 * BIN_WIDTH - BIN_WIDTH);
            assert!(peak.frequency_hz <= band.max_bin as f32 * BIN_WIDTH + BIN_WIDTH);
        }
    }
}
