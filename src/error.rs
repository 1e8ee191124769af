use std::fmt;

/// Error types for smoothing and spike-repair operations
#[derive(Debug, Clone, PartialEq)]
pub enum DenoiseError {
    /// Window length must be odd and at least 3
    InvalidWindowSize(usize),
    /// Polynomial order must be at least 1 and less than the window length
    InvalidPolynomialOrder(usize, usize),
    /// Input signal is shorter than the window length
    InsufficientData(usize, usize),
    /// MAD threshold must be finite and strictly positive
    InvalidThreshold(f64),
    /// Input signal has no samples
    EmptySignal,
    /// Input contains NaN or infinite samples
    InvalidNumericValue(String),
    /// Mathematical computation error (e.g., singular matrix)
    ComputationError(String),
    /// A configuration document could not be parsed
    Config(String),
}

impl DenoiseError {
    /// True for errors caused by an invalid parameter combination.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DenoiseError::InvalidWindowSize(_)
                | DenoiseError::InvalidPolynomialOrder(..)
                | DenoiseError::InsufficientData(..)
                | DenoiseError::InvalidThreshold(_)
                | DenoiseError::Config(_)
        )
    }
}

impl fmt::Display for DenoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenoiseError::InvalidWindowSize(size) => {
                write!(f, "Invalid window length: {}. Window length must be odd and at least 3", size)
            }
            DenoiseError::InvalidPolynomialOrder(poly_order, window_size) => {
                write!(
                    f,
                    "Invalid polynomial order: {}. Must be at least 1 and less than window length ({})",
                    poly_order, window_size
                )
            }
            DenoiseError::InsufficientData(data_len, window_size) => {
                write!(
                    f,
                    "Insufficient data: {} points. Need at least {} points for window length {}",
                    data_len, window_size, window_size
                )
            }
            DenoiseError::InvalidThreshold(threshold) => {
                write!(f, "Invalid MAD threshold: {}. Must be finite and greater than zero", threshold)
            }
            DenoiseError::EmptySignal => write!(f, "Input signal is empty"),
            DenoiseError::InvalidNumericValue(msg) => {
                write!(f, "Invalid numeric value: {}", msg)
            }
            DenoiseError::ComputationError(msg) => {
                write!(f, "Computation error: {}", msg)
            }
            DenoiseError::Config(msg) => write!(f, "Invalid configuration document: {}", msg),
        }
    }
}

impl std::error::Error for DenoiseError {}

/// Result type for denoising operations
pub type Result<T> = std::result::Result<T, DenoiseError>;
