use nalgebra::{DMatrix, DVector};
use crate::config::validate_window;
use crate::error::{DenoiseError, Result};

/// Computes the symmetric Savitzky-Golay smoothing kernel.
///
/// The kernel holds the weights `c` such that `sum(c[j] * y[i - h + j])` is the
/// value at `i` of the degree-`poly_order` least-squares polynomial fitted to
/// the `window_length` samples centered at `i` (`h = (window_length - 1) / 2`).
///
/// # Arguments
///
/// * `window_length` - Size of the moving window (odd, at least 3)
/// * `poly_order` - Degree of the fitted polynomial (1 ≤ poly_order < window_length)
///
/// # Returns
///
/// A vector of `window_length` weights that can be convolved with the signal
pub fn compute_coefficients(window_length: usize, poly_order: usize) -> Result<Vec<f64>> {
    validate_window(window_length, poly_order)?;

    let half_window = (window_length / 2) as isize;
    let offsets: Vec<isize> = (-half_window..=half_window).collect();

    compute_coefficients_for_offsets(&offsets, poly_order)
}

/// Computes smoothing weights for an arbitrary set of sample offsets.
///
/// `offsets[j]` is the position of the `j`-th window sample relative to the
/// output position. The returned weights evaluate the least-squares polynomial
/// at offset 0, which need not be the middle of the window: this is how the
/// asymmetric kernels used near the signal edges are built.
///
/// Offsets are centered and scaled into [-1, 1] before the normal equations
/// are formed, so long windows stay well conditioned.
pub fn compute_coefficients_for_offsets(offsets: &[isize], poly_order: usize) -> Result<Vec<f64>> {
    let num_points = offsets.len();
    if num_points == 0 {
        return Err(DenoiseError::InvalidWindowSize(0));
    }

    if poly_order >= num_points {
        return Err(DenoiseError::InvalidPolynomialOrder(poly_order, num_points));
    }

    let center = offsets.iter().sum::<isize>() as f64 / num_points as f64;
    let scale = offsets
        .iter()
        .map(|&off| (off as f64 - center).abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let xs: Vec<f64> = offsets.iter().map(|&off| (off as f64 - center) / scale).collect();
    let eval_at = -center / scale;

    // Vandermonde matrix: one row per window sample, one column per power
    let mut vandermonde = DMatrix::<f64>::zeros(num_points, poly_order + 1);
    for (i, &x) in xs.iter().enumerate() {
        for j in 0..=poly_order {
            vandermonde[(i, j)] = x.powi(j as i32);
        }
    }

    // Solve A^T A z = p(x0); the weights are then A z
    let ata = vandermonde.transpose() * &vandermonde;
    let rhs = DVector::<f64>::from_iterator(
        poly_order + 1,
        (0..=poly_order).map(|j| eval_at.powi(j as i32)),
    );

    let solution = ata.lu().solve(&rhs).ok_or_else(|| {
        DenoiseError::ComputationError("Failed to solve least squares system".to_string())
    })?;

    let filter_coeffs = (&vandermonde * solution).iter().copied().collect();
    Ok(filter_coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_5_point_quadratic_smoothing() {
        let coeffs = compute_coefficients(5, 2).unwrap();
        // Known coefficients for 5-point quadratic smoothing
        let expected = vec![-3.0 / 35.0, 12.0 / 35.0, 17.0 / 35.0, 12.0 / 35.0, -3.0 / 35.0];

        for (actual, expected) in coeffs.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_7_point_cubic_smoothing() {
        // Cubic and quadratic kernels coincide for smoothing
        let coeffs = compute_coefficients(7, 3).unwrap();
        let expected = [-2.0, 3.0, 6.0, 7.0, 6.0, 3.0, -2.0].map(|c| c / 21.0);

        for (actual, expected) in coeffs.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &(w, p) in &[(5, 1), (11, 3), (31, 3), (31, 5), (51, 5)] {
            let coeffs = compute_coefficients(w, p).unwrap();
            assert_abs_diff_eq!(coeffs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(compute_coefficients(4, 2).is_err()); // Even window length
        assert!(compute_coefficients(1, 0).is_err()); // Window too short
        assert!(compute_coefficients(5, 5).is_err()); // Poly order >= window length
        assert!(compute_coefficients(5, 0).is_err()); // Poly order below 1
        assert!(compute_coefficients_for_offsets(&[], 1).is_err());
        assert!(compute_coefficients_for_offsets(&[0, 1], 2).is_err());
    }

    #[test]
    fn test_asymmetric_offsets_reproduce_polynomial() {
        // Fit on samples 0..7, evaluate at the first sample
        let offsets: Vec<isize> = (0..7).collect();
        let coeffs = compute_coefficients_for_offsets(&offsets, 2).unwrap();
        let samples: Vec<f64> = offsets.iter().map(|&o| 1.0 + 2.0 * o as f64 - 0.5 * (o as f64).powi(2)).collect();

        let estimate: f64 = coeffs.iter().zip(samples.iter()).map(|(c, y)| c * y).sum();
        assert_abs_diff_eq!(estimate, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mirrored_offsets_reverse_kernel() {
        let left: Vec<isize> = (-1..6).collect();
        let right: Vec<isize> = (-5..2).collect();
        let a = compute_coefficients_for_offsets(&left, 3).unwrap();
        let b = compute_coefficients_for_offsets(&right, 3).unwrap();

        for (x, y) in a.iter().zip(b.iter().rev()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-10);
        }
    }
}
