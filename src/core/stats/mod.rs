//! # Statistics Kit
//!
//! Stateless numeric functions over slices, used by the fingerprint engine
//! and available for downstream similarity scoring.
//!
//! Every function checks its preconditions (non-empty input, equal lengths)
//! and reports violations as [`StatsError`] instead of returning a silently
//! wrong answer.

use crate::error::StatsError;

/// Checks that two sequences have equal, non-zero length.
fn check_pair(left: usize, right: usize) -> Result<(), StatsError> {
    if left == 0 || right == 0 {
        return Err(StatsError::EmptyInput);
    }
    if left != right {
        return Err(StatsError::LengthMismatch { left, right });
    }
    Ok(())
}

/// Arithmetic mean of a sequence.
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sum: f64 = values.iter().sum();
    Ok(sum / values.len() as f64)
}

/// Population variance of a sequence.
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    let mean = mean(values)?;
    let sum: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(sum / values.len() as f64)
}

/// Sample covariance of two sequences.
///
/// Uses a Welford-style running update rather than a two-pass sum, then
/// rescales the population estimate by `n / (n - 1)`. Requires at least two
/// samples.
pub fn covariance(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    check_pair(a.len(), b.len())?;
    if a.len() < 2 {
        return Err(StatsError::TooFewSamples {
            required: 2,
            actual: a.len(),
        });
    }
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let mut covariance = 0.0;
    for (i, (&va, &vb)) in a.iter().zip(b.iter()).enumerate() {
        let da = va - mean_a;
        let db = vb - mean_b;
        covariance += (da * db - covariance) / (i + 1) as f64;
    }
    let n = a.len() as f64;
    Ok(covariance * n / (n - 1.0))
}

/// Dot product of two equal-length integer sequences.
pub fn integer_dot(a: &[i64], b: &[i64]) -> Result<i64, StatsError> {
    check_pair(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Manhattan (L1) distance between two sequences.
pub fn manhattan(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    check_pair(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum())
}

/// Mean squared error between two sequences.
pub fn mean_squared_error(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    check_pair(a.len(), b.len())?;
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    Ok(sum / a.len() as f64)
}

/// Root mean squared value of a sequence.
pub fn rms(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sum: f64 = values.iter().map(|v| v * v).sum();
    Ok((sum / values.len() as f64).sqrt())
}

/// Root mean squared value over three parallel channel sequences.
pub fn rgb_rms(r: &[f64], g: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    check_pair(r.len(), g.len())?;
    check_pair(r.len(), b.len())?;
    let mut sum = 0.0;
    for i in 0..r.len() {
        sum += r[i] * r[i] + g[i] * g[i] + b[i] * b[i];
    }
    Ok((sum / r.len() as f64).sqrt())
}

// Stabilizing constants assume an 8-bit dynamic range.
const SSIM_DYNAMIC_RANGE: f64 = 255.0;
const SSIM_K1: f64 = 0.01;
const SSIM_K2: f64 = 0.03;

fn ssim_luminance(x: &[f64], y: &[f64], c: f64) -> Result<f64, StatsError> {
    let ux = mean(x)?;
    let uy = mean(y)?;
    Ok((2.0 * ux * uy + c) / (ux * ux + uy * uy + c))
}

fn ssim_contrast(x: &[f64], y: &[f64], c: f64) -> Result<f64, StatsError> {
    let sx2 = variance(x)?;
    let sy2 = variance(y)?;
    let sx = sx2.sqrt();
    let sy = sy2.sqrt();
    Ok((2.0 * sx * sy + c) / (sx2 + sy2 + c))
}

fn ssim_structure(x: &[f64], y: &[f64], c: f64) -> Result<f64, StatsError> {
    let sx = variance(x)?.sqrt();
    let sy = variance(y)?.sqrt();
    let sxy = covariance(x, y)?;
    Ok((sxy + c) / (sx * sy + c))
}

/// Structural similarity score between two equal-length sequences.
///
/// Composed from luminance, contrast and structure sub-terms. Requires at
/// least two samples because the structure term builds on [`covariance`].
pub fn ssim(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    check_pair(a.len(), b.len())?;
    let c1 = (SSIM_K1 * SSIM_DYNAMIC_RANGE).powi(2);
    let c2 = (SSIM_K2 * SSIM_DYNAMIC_RANGE).powi(2);
    let c3 = c2 / 2.0;

    let luminance = ssim_luminance(a, b, c1)?;
    let contrast = ssim_contrast(a, b, c2)?;
    let structure = ssim_structure(a, b, c3)?;
    Ok(luminance * contrast * structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_small_sequence() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn mean_of_empty_sequence_is_an_error() {
        assert_eq!(mean(&[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn variance_of_constant_sequence_is_zero() {
        assert_eq!(variance(&[2.0, 2.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn integer_dot_of_small_sequences() {
        assert_eq!(integer_dot(&[1, 3, 9], &[2, 0, 1]).unwrap(), 11);
    }

    #[test]
    fn integer_dot_rejects_mismatched_lengths() {
        assert_eq!(
            integer_dot(&[1, 2], &[1, 2, 3]),
            Err(StatsError::LengthMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn covariance_requires_two_samples() {
        assert_eq!(
            covariance(&[1.0], &[2.0]),
            Err(StatsError::TooFewSamples {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn covariance_of_identical_sequences_matches_sample_variance() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let cov = covariance(&values, &values).unwrap();
        // Sample variance of 1..4 is 5/3.
        assert!((cov - 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn covariance_sign_follows_direction() {
        let up = [1.0, 2.0, 3.0];
        let down = [3.0, 2.0, 1.0];
        assert!(covariance(&up, &up).unwrap() > 0.0);
        assert!(covariance(&up, &down).unwrap() < 0.0);
    }

    #[test]
    fn manhattan_distance_to_self_is_zero() {
        let values = [1.0, -4.0, 7.5];
        assert_eq!(manhattan(&values, &values).unwrap(), 0.0);
    }

    #[test]
    fn manhattan_sums_absolute_differences() {
        assert_eq!(manhattan(&[0.0, 0.0], &[3.0, -4.0]).unwrap(), 7.0);
    }

    #[test]
    fn mse_of_offset_sequence() {
        assert_eq!(
            mean_squared_error(&[0.0, 0.0], &[2.0, 4.0]).unwrap(),
            10.0
        );
    }

    #[test]
    fn rms_of_pythagorean_pair() {
        let value = rms(&[3.0, 4.0]).unwrap();
        assert!((value - (12.5f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn ssim_of_identical_sequences_is_one() {
        let values = [10.0, 40.0, 90.0, 160.0];
        let score = ssim(&values, &values).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ssim_drops_for_different_sequences() {
        let a = [10.0, 40.0, 90.0, 160.0];
        let b = [200.0, 10.0, 250.0, 30.0];
        let score = ssim(&a, &b).unwrap();
        assert!(score < 0.9);
    }

    #[test]
    fn ssim_rejects_mismatched_lengths() {
        assert!(matches!(
            ssim(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch { .. })
        ));
    }
}
