//! Robust location and scale estimates.
//!
//! Both estimators use selection (`select_nth_unstable_by`) on a scratch
//! copy, so the caller's slice is never reordered and the average cost is
//! O(n). Even-length inputs average the two middle order statistics.
//!
//! The MAD is the population definition, `median(|x_i - median(x)|)`, with no
//! normal-consistency factor: spike thresholds are expressed in raw MAD units.

/// Median of `values`, or `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut scratch = values.to_vec();
    Some(median_inplace(&mut scratch))
}

/// Median absolute deviation of `values`, or `None` when empty.
pub fn median_abs_deviation(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    Some(mad_about(values, center))
}

/// MAD of `values` around a precomputed `center`.
pub(crate) fn mad_about(values: &[f64], center: f64) -> f64 {
    let mut deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median_inplace(&mut deviations)
}

/// Median by quickselect; reorders `vals`. `vals` must not be empty.
fn median_inplace(vals: &mut [f64]) -> f64 {
    let n = vals.len();
    let mid = n / 2;

    vals.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = vals[mid];

    if n % 2 == 0 {
        // Largest value of the lower half
        let lower = vals[..mid].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) / 2.0
    } else {
        upper
    }
}
