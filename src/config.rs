//! Filter parameters and input validation.
//!
//! `FilterConfig` is the one value both pipeline stages read their
//! parameters from. Every bound that does not depend on the signal is
//! checked when the config is built or deserialized; the `window_length <= n`
//! bound is checked by the stage that receives the signal.

use serde::{Deserialize, Serialize};

use crate::despike::EdgeRepair;
use crate::error::{DenoiseError, Result};
use crate::filter::BoundaryMode;

/// Default smoothing window length
pub const DEFAULT_WINDOW_LENGTH: usize = 31;
/// Default polynomial order
pub const DEFAULT_POLY_ORDER: usize = 3;
/// Default spike threshold, in multiples of the MAD
pub const DEFAULT_MAD_THRESHOLD: f64 = 5.0;

/// Validated parameters for the smoothing and spike-repair stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterConfig", into = "RawFilterConfig")]
pub struct FilterConfig {
    window_length: usize,
    poly_order: usize,
    mad_threshold: f64,
    boundary_mode: BoundaryMode,
    edge_repair: EdgeRepair,
}

impl FilterConfig {
    /// Creates a configuration with validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rheed_denoise::FilterConfig;
    ///
    /// let config = FilterConfig::new(31, 3, 5.0).expect("Valid parameters");
    /// assert!(FilterConfig::new(30, 3, 5.0).is_err());
    /// ```
    pub fn new(window_length: usize, poly_order: usize, mad_threshold: f64) -> Result<Self> {
        validate_window(window_length, poly_order)?;
        validate_threshold(mad_threshold)?;

        Ok(Self {
            window_length,
            poly_order,
            mad_threshold,
            boundary_mode: BoundaryMode::default(),
            edge_repair: EdgeRepair::default(),
        })
    }

    /// Sets the smoothing boundary strategy
    pub fn with_boundary_mode(mut self, mode: BoundaryMode) -> Self {
        self.boundary_mode = mode;
        self
    }

    /// Sets how flagged samples near the edges are treated
    pub fn with_edge_repair(mut self, edge_repair: EdgeRepair) -> Self {
        self.edge_repair = edge_repair;
        self
    }

    /// Returns the smoothing window length
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Returns the polynomial order
    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Returns the spike threshold, in multiples of the MAD
    pub fn mad_threshold(&self) -> f64 {
        self.mad_threshold
    }

    /// Returns the smoothing boundary strategy
    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    /// Returns the edge repair policy
    pub fn edge_repair(&self) -> EdgeRepair {
        self.edge_repair
    }

    /// Parses and validates a TOML document.
    ///
    /// Missing keys take their default values.
    ///
    /// ```rust
    /// use rheed_denoise::FilterConfig;
    ///
    /// let config = FilterConfig::from_toml_str("window_length = 11\n").unwrap();
    /// assert_eq!(config.window_length(), 11);
    /// assert_eq!(config.poly_order(), 3);
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self> {
        toml::from_str(document).map_err(|e| DenoiseError::Config(e.to_string()))
    }

    /// Serializes the configuration as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| DenoiseError::Config(e.to_string()))
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            poly_order: DEFAULT_POLY_ORDER,
            mad_threshold: DEFAULT_MAD_THRESHOLD,
            boundary_mode: BoundaryMode::default(),
            edge_repair: EdgeRepair::default(),
        }
    }
}

/// Unvalidated mirror of `FilterConfig` used for (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawFilterConfig {
    window_length: usize,
    poly_order: usize,
    mad_threshold: f64,
    boundary_mode: BoundaryMode,
    edge_repair: EdgeRepair,
}

impl Default for RawFilterConfig {
    fn default() -> Self {
        FilterConfig::default().into()
    }
}

impl TryFrom<RawFilterConfig> for FilterConfig {
    type Error = DenoiseError;

    fn try_from(raw: RawFilterConfig) -> Result<Self> {
        Ok(FilterConfig::new(raw.window_length, raw.poly_order, raw.mad_threshold)?
            .with_boundary_mode(raw.boundary_mode)
            .with_edge_repair(raw.edge_repair))
    }
}

impl From<FilterConfig> for RawFilterConfig {
    fn from(config: FilterConfig) -> Self {
        Self {
            window_length: config.window_length,
            poly_order: config.poly_order,
            mad_threshold: config.mad_threshold,
            boundary_mode: config.boundary_mode,
            edge_repair: config.edge_repair,
        }
    }
}

pub(crate) fn validate_window(window_length: usize, poly_order: usize) -> Result<()> {
    if window_length % 2 == 0 || window_length < 3 {
        return Err(DenoiseError::InvalidWindowSize(window_length));
    }
    if poly_order == 0 || poly_order >= window_length {
        return Err(DenoiseError::InvalidPolynomialOrder(poly_order, window_length));
    }
    Ok(())
}

pub(crate) fn validate_threshold(mad_threshold: f64) -> Result<()> {
    if !mad_threshold.is_finite() || mad_threshold <= 0.0 {
        return Err(DenoiseError::InvalidThreshold(mad_threshold));
    }
    Ok(())
}

/// Rejects empty signals and signals holding NaN or infinite samples.
pub(crate) fn validate_signal(signal: &[f64]) -> Result<()> {
    if signal.is_empty() {
        return Err(DenoiseError::EmptySignal);
    }
    if let Some((i, value)) = signal.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DenoiseError::InvalidNumericValue(format!("signal[{}]={}", i, value)));
    }
    Ok(())
}
