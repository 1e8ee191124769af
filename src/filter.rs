use serde::{Deserialize, Serialize};

use crate::coefficients::{compute_coefficients, compute_coefficients_for_offsets};
use crate::error::{DenoiseError, Result};

/// Boundary handling strategies for the smoothing filter.
///
/// Positions closer than half a window to either edge cannot use the
/// symmetric kernel. Both strategies still produce a finite value at every
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Fit a full-length window shifted toward the interior and evaluate the
    /// polynomial at the edge position
    #[default]
    Shifted,
    /// Fit only the samples of the symmetric window that exist, lowering the
    /// polynomial order when too few remain
    Truncated,
}

/// A Savitzky-Golay smoothing filter with precomputed kernels.
///
/// Kernel derivation happens once in the constructor; `apply` only
/// convolves, so one filter can be shared across threads and signals.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    window_length: usize,
    poly_order: usize,
    boundary_mode: BoundaryMode,
    kernel: Vec<f64>,
    // edge_kernels[i] serves left position i; reversed, it serves position n-1-i
    edge_kernels: Vec<Vec<f64>>,
}

impl SmoothingFilter {
    /// Creates a new smoothing filter with the default boundary mode.
    ///
    /// # Arguments
    ///
    /// * `window_length` - Size of the filter window (odd, at least 3)
    /// * `poly_order` - Order of the polynomial to fit (1 ≤ poly_order < window_length)
    ///
    /// # Example
    ///
    /// ```rust
    /// use rheed_denoise::SmoothingFilter;
    ///
    /// let filter = SmoothingFilter::new(5, 2).expect("Valid parameters");
    /// ```
    pub fn new(window_length: usize, poly_order: usize) -> Result<Self> {
        Self::with_boundary_mode(window_length, poly_order, BoundaryMode::default())
    }

    /// Creates a filter using the given boundary handling strategy.
    pub fn with_boundary_mode(
        window_length: usize,
        poly_order: usize,
        boundary_mode: BoundaryMode,
    ) -> Result<Self> {
        let kernel = compute_coefficients(window_length, poly_order)?;
        let half_window = window_length / 2;

        let edge_kernels = (0..half_window)
            .map(|position| {
                let offsets: Vec<isize> = match boundary_mode {
                    BoundaryMode::Shifted => (0..window_length)
                        .map(|j| j as isize - position as isize)
                        .collect(),
                    BoundaryMode::Truncated => (0..=position + half_window)
                        .map(|j| j as isize - position as isize)
                        .collect(),
                };
                let order = poly_order.min(offsets.len() - 1);
                compute_coefficients_for_offsets(&offsets, order)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            window_length,
            poly_order,
            ?boundary_mode,
            "derived smoothing kernels"
        );

        Ok(Self {
            window_length,
            poly_order,
            boundary_mode,
            kernel,
            edge_kernels,
        })
    }

    /// Applies the filter to smooth the input data.
    ///
    /// The output has the same length as the input. Fails with
    /// `InsufficientData` when the signal is shorter than the window.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rheed_denoise::SmoothingFilter;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
    /// let filter = SmoothingFilter::new(5, 2).expect("Valid parameters");
    /// let smoothed = filter.apply(&data).expect("Signal is long enough");
    /// assert_eq!(smoothed.len(), data.len());
    /// ```
    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        crate::config::validate_signal(data)?;
        if data.len() < self.window_length {
            return Err(DenoiseError::InsufficientData(data.len(), self.window_length));
        }

        Ok(self.apply_unchecked(data))
    }

    /// Convolves without validating; `data` must be finite and at least one
    /// window long.
    pub(crate) fn apply_unchecked(&self, data: &[f64]) -> Vec<f64> {
        let n = data.len();
        let half_window = self.window_length / 2;
        let mut result = vec![0.0; n];

        for (out, window) in result[half_window..n - half_window]
            .iter_mut()
            .zip(data.windows(self.window_length))
        {
            *out = dot(&self.kernel, window);
        }

        for (i, kernel) in self.edge_kernels.iter().enumerate() {
            let width = kernel.len();
            result[i] = dot(kernel, &data[..width]);
            result[n - 1 - i] = kernel
                .iter()
                .zip(data[n - width..].iter().rev())
                .map(|(c, y)| c * y)
                .sum();
        }

        result
    }

    /// Returns the window length
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Returns the polynomial order
    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Returns the boundary handling strategy
    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    /// Returns the symmetric interior kernel
    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }
}

#[inline]
fn dot(kernel: &[f64], window: &[f64]) -> f64 {
    kernel.iter().zip(window).map(|(c, y)| c * y).sum()
}
