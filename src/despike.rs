use serde::{Deserialize, Serialize};

use crate::config::{validate_signal, validate_threshold};
use crate::error::Result;
use crate::stats;

/// Number of neighbours required on each side for a repair.
const NEIGHBOUR_REACH: usize = 2;

/// Treatment of flagged samples that lack two neighbours on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRepair {
    /// Leave flagged samples at indices `< 2` or `> n - 3` unmodified
    #[default]
    Skip,
    /// Replace flagged edge samples with the mean of whichever of the four
    /// nearest neighbours exist
    AvailableNeighbors,
}

/// Result of a spike-repair pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Repaired signal, same length as the input
    pub denoised: Vec<f64>,
    /// `true` where the input deviated from the median by more than the threshold
    pub mask: Vec<bool>,
    /// Median of the input
    pub center: f64,
    /// Median absolute deviation of the input
    pub spread: f64,
    /// Flagged positions whose value was replaced, in index order
    pub repaired: Vec<usize>,
}

impl RepairOutcome {
    /// True when the spread was exactly zero and flagging was suppressed.
    ///
    /// A smoothed trace that is constant only up to rounding (a flat raw
    /// trace whose edge samples went through the asymmetric kernels, for
    /// instance) can have a spread of order 1e-14. That is not degenerate;
    /// any samples it flags are repaired with values equal to the rest up to
    /// the same rounding.
    pub fn is_degenerate(&self) -> bool {
        self.spread == 0.0
    }

    /// Number of flagged positions
    pub fn outlier_count(&self) -> usize {
        self.mask.iter().filter(|&&flagged| flagged).count()
    }

    /// Flagged positions, in index order
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &flagged)| flagged.then_some(i))
            .collect()
    }

    /// Flagged positions left at their input value
    pub fn unrepaired_indices(&self) -> Vec<usize> {
        self.outlier_indices()
            .into_iter()
            .filter(|i| self.repaired.binary_search(i).is_err())
            .collect()
    }
}

/// MAD-based spike detector and repairer.
///
/// Flags every sample whose distance from the median exceeds
/// `mad_threshold` times the median absolute deviation, then replaces each
/// flagged interior sample with the mean of `x[i-2], x[i-1], x[i+1], x[i+2]`.
/// Repairs read only the input, never each other's results, so the outcome
/// does not depend on the order in which flagged positions are visited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeRepair {
    mad_threshold: f64,
    edge_repair: EdgeRepair,
}

impl SpikeRepair {
    /// Creates a repairer with the default edge policy.
    pub fn new(mad_threshold: f64) -> Result<Self> {
        validate_threshold(mad_threshold)?;
        Ok(Self {
            mad_threshold,
            edge_repair: EdgeRepair::default(),
        })
    }

    /// Sets how flagged edge samples are treated
    pub fn with_edge_repair(mut self, edge_repair: EdgeRepair) -> Self {
        self.edge_repair = edge_repair;
        self
    }

    /// Returns the spike threshold, in multiples of the MAD
    pub fn mad_threshold(&self) -> f64 {
        self.mad_threshold
    }

    /// Returns the edge repair policy
    pub fn edge_repair(&self) -> EdgeRepair {
        self.edge_repair
    }

    /// Flags and repairs spikes in an already smoothed signal.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rheed_denoise::SpikeRepair;
    ///
    /// let smoothed = [10.0, 11.0, 9.0, 10.0, 90.0, 11.0, 9.0, 10.0, 10.0];
    /// let outcome = SpikeRepair::new(5.0).unwrap().apply(&smoothed).unwrap();
    /// assert!(outcome.mask[4]);
    /// assert_eq!(outcome.denoised[4], 9.5);
    /// ```
    pub fn apply(&self, smoothed: &[f64]) -> Result<RepairOutcome> {
        validate_signal(smoothed)?;
        Ok(self.apply_unchecked(smoothed))
    }

    /// Repairs without validating; `smoothed` must be non-empty and finite.
    pub(crate) fn apply_unchecked(&self, smoothed: &[f64]) -> RepairOutcome {
        let (mask, center, spread) = self.flag(smoothed);

        // Every replacement is computed from the unmodified input
        let replacements: Vec<(usize, f64)> = mask
            .iter()
            .enumerate()
            .filter(|&(_, &flagged)| flagged)
            .filter_map(|(i, _)| self.repaired_value(smoothed, i).map(|value| (i, value)))
            .collect();

        let mut denoised = smoothed.to_vec();
        for &(i, value) in &replacements {
            denoised[i] = value;
        }

        tracing::debug!(
            samples = smoothed.len(),
            center,
            spread,
            flagged = mask.iter().filter(|&&flagged| flagged).count(),
            repaired = replacements.len(),
            "spike repair pass complete"
        );

        RepairOutcome {
            denoised,
            mask,
            center,
            spread,
            repaired: replacements.into_iter().map(|(i, _)| i).collect(),
        }
    }

    /// Computes the outlier mask along with the median and MAD it was based on.
    fn flag(&self, smoothed: &[f64]) -> (Vec<bool>, f64, f64) {
        let center = stats::median(smoothed).unwrap_or(0.0);
        let spread = stats::mad_about(smoothed, center);

        if spread == 0.0 {
            tracing::warn!(
                samples = smoothed.len(),
                center,
                "zero MAD spread, spike detection suppressed"
            );
            return (vec![false; smoothed.len()], center, spread);
        }

        let limit = self.mad_threshold * spread;
        let mask = smoothed.iter().map(|v| (v - center).abs() > limit).collect();
        (mask, center, spread)
    }

    /// Replacement for flagged position `i`, or `None` when it stays as is.
    fn repaired_value(&self, smoothed: &[f64], i: usize) -> Option<f64> {
        let n = smoothed.len();
        if is_repairable(i, n) {
            let sum = smoothed[i - 2] + smoothed[i - 1] + smoothed[i + 1] + smoothed[i + 2];
            return Some(sum / 4.0);
        }

        match self.edge_repair {
            EdgeRepair::Skip => None,
            EdgeRepair::AvailableNeighbors => {
                let lo = i.saturating_sub(NEIGHBOUR_REACH);
                let hi = (i + NEIGHBOUR_REACH).min(n - 1);
                let neighbours: Vec<f64> = (lo..=hi).filter(|&j| j != i).map(|j| smoothed[j]).collect();
                if neighbours.is_empty() {
                    None
                } else {
                    Some(neighbours.iter().sum::<f64>() / neighbours.len() as f64)
                }
            }
        }
    }
}

/// Flags and repairs spikes with the default edge policy.
///
/// Returns the denoised signal and the outlier mask.
pub fn repair(smoothed: &[f64], mad_threshold: f64) -> Result<(Vec<f64>, Vec<bool>)> {
    let outcome = SpikeRepair::new(mad_threshold)?.apply(smoothed)?;
    Ok((outcome.denoised, outcome.mask))
}

/// True when `i` has two neighbours on each side in a signal of length `n`.
#[inline]
fn is_repairable(i: usize, n: usize) -> bool {
    i >= NEIGHBOUR_REACH && i + NEIGHBOUR_REACH < n
}
