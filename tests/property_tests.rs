//! Property tests for the smoothing and spike-repair stages.
//!
//! Uses proptest to verify:
//! 1. Shape preservation — both stages return one value per input sample
//! 2. Polynomial reproduction — polynomials of degree ≤ order pass through
//! 3. Monotone threshold — raising the threshold never flags more samples
//! 4. Repair locality — repaired values are exact four-neighbour means and
//!    unflagged or edge samples are untouched

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rheed_denoise::{smooth, BoundaryMode, SmoothingFilter, SpikeRepair};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_signal(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0..1000.0_f64, min_len..200)
}

fn arb_window() -> impl Strategy<Value = (usize, usize)> {
    (1usize..8).prop_flat_map(|half| {
        let window = 2 * half + 1;
        (Just(window), 1..window.min(6))
    })
}

fn arb_boundary() -> impl Strategy<Value = BoundaryMode> {
    prop_oneof![Just(BoundaryMode::Shifted), Just(BoundaryMode::Truncated)]
}

// ── 1. Shape preservation ────────────────────────────────────────────

proptest! {
    #[test]
    fn smoothing_preserves_length(
        signal in arb_signal(15),
        (window, order) in arb_window(),
        mode in arb_boundary(),
    ) {
        let filter = SmoothingFilter::with_boundary_mode(window, order, mode).unwrap();
        let smoothed = filter.apply(&signal).unwrap();
        prop_assert_eq!(smoothed.len(), signal.len());
        prop_assert!(smoothed.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn repair_preserves_length(signal in arb_signal(1), threshold in 0.5..10.0_f64) {
        let outcome = SpikeRepair::new(threshold).unwrap().apply(&signal).unwrap();
        prop_assert_eq!(outcome.denoised.len(), signal.len());
        prop_assert_eq!(outcome.mask.len(), signal.len());
    }
}

// ── 2. Polynomial reproduction ───────────────────────────────────────

proptest! {
    #[test]
    fn polynomials_pass_through(
        coeffs in prop::collection::vec(-2.0..2.0_f64, 1..4),
        (window, order) in arb_window(),
    ) {
        prop_assume!(coeffs.len() - 1 <= order);

        let n = window + 20;
        let signal: Vec<f64> = (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
            })
            .collect();

        let smoothed = smooth(&signal, window, order).unwrap();
        for (expected, actual) in signal.iter().zip(&smoothed) {
            assert_abs_diff_eq!(expected, actual, epsilon = 1e-8);
        }
    }
}

// ── 3. Monotone threshold ────────────────────────────────────────────

proptest! {
    #[test]
    fn raising_threshold_never_flags_more(
        signal in arb_signal(5),
        low in 0.5..5.0_f64,
        step in 0.0..5.0_f64,
    ) {
        let loose = SpikeRepair::new(low).unwrap().apply(&signal).unwrap();
        let strict = SpikeRepair::new(low + step).unwrap().apply(&signal).unwrap();

        prop_assert!(strict.outlier_count() <= loose.outlier_count());
        for (s, l) in strict.mask.iter().zip(&loose.mask) {
            prop_assert!(!s || *l);
        }
    }
}

// ── 4. Repair locality ───────────────────────────────────────────────

proptest! {
    #[test]
    fn repairs_are_local_means(signal in arb_signal(5), threshold in 0.5..4.0_f64) {
        let n = signal.len();
        let outcome = SpikeRepair::new(threshold).unwrap().apply(&signal).unwrap();

        for i in 0..n {
            let interior = i >= 2 && i + 2 < n;
            if outcome.mask[i] && interior {
                let mean = (signal[i - 2] + signal[i - 1] + signal[i + 1] + signal[i + 2]) / 4.0;
                prop_assert_eq!(outcome.denoised[i], mean);
            } else {
                prop_assert_eq!(outcome.denoised[i], signal[i]);
            }
        }
    }

    #[test]
    fn constant_signal_is_never_flagged(value in -1e6..1e6_f64, len in 1usize..100, threshold in 0.1..10.0_f64) {
        let signal = vec![value; len];
        let outcome = SpikeRepair::new(threshold).unwrap().apply(&signal).unwrap();

        prop_assert!(outcome.is_degenerate());
        prop_assert!(outcome.mask.iter().all(|&m| !m));
        prop_assert_eq!(outcome.denoised, signal);
    }
}
