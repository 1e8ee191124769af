use rayon::prelude::*;

use crate::config::{validate_signal, FilterConfig};
use crate::despike::{RepairOutcome, SpikeRepair};
use crate::error::{DenoiseError, Result};
use crate::filter::SmoothingFilter;

/// Output of the smooth → repair pipeline for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Denoised {
    /// Output of the smoothing stage
    pub smoothed: Vec<f64>,
    /// Output of the spike-repair stage, computed from `smoothed`
    pub repair: RepairOutcome,
}

impl Denoised {
    /// The cleaned signal
    pub fn denoised(&self) -> &[f64] {
        &self.repair.denoised
    }

    /// The outlier mask
    pub fn mask(&self) -> &[bool] {
        &self.repair.mask
    }
}

/// Two-stage denoiser: Savitzky-Golay smoothing followed by MAD spike repair.
///
/// Holds the kernels derived from its `FilterConfig`, so repeated calls and
/// batch runs reuse them.
#[derive(Debug, Clone)]
pub struct Denoiser {
    config: FilterConfig,
    filter: SmoothingFilter,
    repairer: SpikeRepair,
}

impl Denoiser {
    /// Creates a denoiser, deriving the smoothing kernels up front.
    pub fn new(config: FilterConfig) -> Result<Self> {
        let filter = SmoothingFilter::with_boundary_mode(
            config.window_length(),
            config.poly_order(),
            config.boundary_mode(),
        )?;
        let repairer = SpikeRepair::new(config.mad_threshold())?.with_edge_repair(config.edge_repair());

        Ok(Self {
            config,
            filter,
            repairer,
        })
    }

    /// Returns the configuration
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Smooths `raw` and repairs spikes in the smoothed signal.
    ///
    /// All validation happens before either stage runs.
    pub fn denoise(&self, raw: &[f64]) -> Result<Denoised> {
        let span = tracing::debug_span!("denoise", samples = raw.len());
        let _guard = span.enter();

        validate_signal(raw)?;
        if raw.len() < self.config.window_length() {
            return Err(DenoiseError::InsufficientData(raw.len(), self.config.window_length()));
        }

        let smoothed = self.filter.apply_unchecked(raw);
        let repair = self.repairer.apply_unchecked(&smoothed);

        tracing::info!(
            samples = raw.len(),
            outliers = repair.outlier_count(),
            repaired = repair.repaired.len(),
            "signal denoised"
        );

        Ok(Denoised { smoothed, repair })
    }

    /// Denoises independent signals in parallel.
    ///
    /// Results are returned in input order; a failing signal does not affect
    /// the others.
    pub fn denoise_batch<S>(&self, signals: &[S]) -> Vec<Result<Denoised>>
    where
        S: AsRef<[f64]> + Sync,
    {
        signals
            .par_iter()
            .map(|signal| self.denoise(signal.as_ref()))
            .collect()
    }
}

impl Default for Denoiser {
    fn default() -> Self {
        Self::new(FilterConfig::default()).expect("Default parameters should be valid")
    }
}

/// Evenly spaced time axis for a signal of `n` samples spanning `total_time`.
///
/// `time[i] = total_time * i / (n - 1)`; a single sample maps to `[0.0]`.
///
/// ```rust
/// use rheed_denoise::time_axis;
///
/// assert_eq!(time_axis(10.0, 3), vec![0.0, 5.0, 10.0]);
/// ```
pub fn time_axis(total_time: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| total_time * i as f64 / last).collect()
        }
    }
}
