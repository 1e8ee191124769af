//! Synthetic RHEED-like traces for demos and tests.
//!
//! The waveform is a damped oscillation on a constant baseline,
//! `baseline + amplitude * exp(-t / decay) * sin(2πt / period)`, plus
//! Gaussian noise and a handful of ±`spike_height` spikes at distinct
//! random positions. A fixed seed reproduces the same trace.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{DenoiseError, Result};

/// Parameters of a synthetic trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticTrace {
    /// Number of samples
    pub points: usize,
    /// Time spanned by the trace, in seconds
    pub duration: f64,
    pub baseline: f64,
    pub amplitude: f64,
    /// Exponential decay constant of the oscillation, in seconds
    pub decay: f64,
    /// Oscillation period, in seconds
    pub period: f64,
    /// Standard deviation of the additive Gaussian noise
    pub noise_sigma: f64,
    pub spike_count: usize,
    pub spike_height: f64,
    pub seed: u64,
}

impl Default for SyntheticTrace {
    fn default() -> Self {
        Self {
            points: 1000,
            duration: 100.0,
            baseline: 300.0,
            amplitude: 50.0,
            decay: 50.0,
            period: 10.0,
            noise_sigma: 5.0,
            spike_count: 10,
            spike_height: 80.0,
            seed: 42,
        }
    }
}

/// A generated trace with its ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTrace {
    /// Noise-free waveform
    pub clean: Vec<f64>,
    /// Waveform with noise and spikes
    pub noisy: Vec<f64>,
    /// Sorted positions of the inserted spikes
    pub spike_indices: Vec<usize>,
}

impl SyntheticTrace {
    /// Generates the trace.
    ///
    /// Fails when `points` is zero, `spike_count` exceeds `points`, or the
    /// noise level is negative or not finite.
    pub fn generate(&self) -> Result<GeneratedTrace> {
        if self.points == 0 {
            return Err(DenoiseError::EmptySignal);
        }
        if self.spike_count > self.points {
            return Err(DenoiseError::InvalidNumericValue(format!(
                "spike_count={} exceeds points={}",
                self.spike_count, self.points
            )));
        }
        let noise = Normal::new(0.0, self.noise_sigma)
            .map_err(|e| DenoiseError::InvalidNumericValue(format!("noise_sigma={}: {}", self.noise_sigma, e)))?;

        let mut rng = StdRng::seed_from_u64(self.seed);

        let clean: Vec<f64> = crate::time_axis(self.duration, self.points)
            .into_iter()
            .map(|t| self.baseline + self.amplitude * (-t / self.decay).exp() * (2.0 * PI * t / self.period).sin())
            .collect();

        let mut noisy: Vec<f64> = clean.iter().map(|v| v + noise.sample(&mut rng)).collect();

        let mut spike_indices = index::sample(&mut rng, self.points, self.spike_count).into_vec();
        spike_indices.sort_unstable();
        for &i in &spike_indices {
            noisy[i] += if rng.gen_bool(0.5) { self.spike_height } else { -self.spike_height };
        }

        tracing::debug!(
            points = self.points,
            spikes = spike_indices.len(),
            seed = self.seed,
            "generated synthetic trace"
        );

        Ok(GeneratedTrace {
            clean,
            noisy,
            spike_indices,
        })
    }
}
