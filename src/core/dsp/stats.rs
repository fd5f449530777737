//! Statistical helpers for spectrum comparison

/// Arithmetic mean, 0 for an empty slice
pub fn mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f32>() / data.len() as f32
}

/// Scale a vector so its maximum becomes 1.0
///
/// Returns `None` when the maximum is not positive.
pub fn normalize_to_peak(data: &[f32]) -> Option<Vec<f32>> {
    let max = data.iter().copied().fold(f32::MIN, f32::max);
    if !(max > 0.0) {
        return None;
    }
    Some(data.iter().map(|v| v / max).collect())
}

/// Pearson correlation over the common prefix of two vectors, clamped at 0
///
/// Zero-variance input (or no overlap) yields 0.
pub fn pearson_correlation(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);

    // f64 accumulators: band slices run to a few hundred bins
    let (mut sum_a, mut sum_b, mut sum_ab, mut sum_a2, mut sum_b2) = (0.0f64, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        sum_a += x;
        sum_b += y;
        sum_ab += x * y;
        sum_a2 += x * x;
        sum_b2 += y * y;
    }

    let n = n as f64;
    let numerator = n * sum_ab - sum_a * sum_b;
    let denominator = ((n * sum_a2 - sum_a * sum_a) * (n * sum_b2 - sum_b * sum_b)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (numerator / denominator).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_to_peak() {
        let normalized = normalize_to_peak(&[1.0, 4.0, 2.0]).unwrap();
        assert_eq!(normalized, vec![0.25, 1.0, 0.5]);
        assert!(normalize_to_peak(&[0.0, 0.0]).is_none());
        assert!(normalize_to_peak(&[]).is_none());
    }

    #[test]
    fn test_correlation_identical_and_scaled() {
        let a = [0.1, 0.5, 1.0, 0.3, 0.0];
        let scaled: Vec<f32> = a.iter().map(|v| v * 3.0).collect();
        assert!((pearson_correlation(&a, &a) - 1.0).abs() < 1e-6);
        assert!((pearson_correlation(&a, &scaled) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_correlation_negative_is_clamped() {
        let a = [0.0, 0.5, 1.0];
        let b = [1.0, 0.5, 0.0];
        assert_eq!(pearson_correlation(&a, &b), 0.0);
    }

    #[test]
    fn test_correlation_degenerate() {
        assert_eq!(pearson_correlation(&[1.0, 1.0, 1.0], &[0.2, 0.4, 0.9]), 0.0);
        assert_eq!(pearson_correlation(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_correlation_uses_shorter_length() {
        let a = [0.0, 0.5, 1.0, 9.0, -4.0];
        let b = [0.0, 0.5, 1.0];
        assert!((pearson_correlation(&a, &b) - 1.0).abs() < 1e-6);
    }
}
