//! # RHEED Denoise
//!
//! Two-stage cleaning of noisy, regularly sampled intensity traces such as
//! RHEED oscillation recordings.
//!
//! 1. A Savitzky-Golay filter removes broadband noise by fitting a low-order
//!    polynomial over a sliding window.
//! 2. A median / MAD detector flags the narrow, high-amplitude spikes the
//!    smoothing stage averages through, and replaces each flagged interior
//!    sample with the mean of its four nearest neighbours.
//!
//! ## Features
//!
//! - Kernels derived once per (window length, order) by least squares
//! - Asymmetric edge kernels, so every output position is a real fit
//! - Robust statistics by selection rather than sorting
//! - Parallel batch processing of independent traces
//! - TOML configuration, trace file I/O and synthetic test traces
//!
//! ## Example
//!
//! ```rust
//! use rheed_denoise::{Denoiser, FilterConfig};
//!
//! let mut raw: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin() * 50.0 + 300.0).collect();
//! raw[100] += 80.0;
//!
//! let denoiser = Denoiser::new(FilterConfig::new(11, 3, 5.0).expect("Valid parameters"))
//!     .expect("Valid parameters");
//! let result = denoiser.denoise(&raw).expect("Signal is long enough");
//! assert_eq!(result.denoised().len(), raw.len());
//! ```

mod coefficients;
mod config;
pub mod csv_utils;
mod despike;
mod error;
mod filter;
mod pipeline;
pub mod stats;
pub mod synthetic;

pub use coefficients::{compute_coefficients, compute_coefficients_for_offsets};
pub use config::{FilterConfig, DEFAULT_MAD_THRESHOLD, DEFAULT_POLY_ORDER, DEFAULT_WINDOW_LENGTH};
pub use despike::{repair, EdgeRepair, RepairOutcome, SpikeRepair};
pub use error::{DenoiseError, Result};
pub use filter::{BoundaryMode, SmoothingFilter};
pub use pipeline::{time_axis, Denoised, Denoiser};

/// Smooths `data` with a Savitzky-Golay filter using the default boundary mode.
///
/// # Arguments
///
/// * `data` - The input signal data
/// * `window_length` - The size of the filter window (odd, at least 3, at most `data.len()`)
/// * `poly_order` - The order of the polynomial (1 ≤ poly_order < window_length)
///
/// # Example
///
/// ```rust
/// use rheed_denoise::smooth;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
/// let smoothed = smooth(&data, 5, 2).unwrap();
/// assert_eq!(smoothed.len(), data.len());
/// ```
pub fn smooth(data: &[f64], window_length: usize, poly_order: usize) -> Result<Vec<f64>> {
    SmoothingFilter::new(window_length, poly_order)?.apply(data)
}

/// Runs the full smooth → repair pipeline on one signal.
pub fn denoise(raw: &[f64], config: &FilterConfig) -> Result<Denoised> {
    Denoiser::new(*config)?.denoise(raw)
}
