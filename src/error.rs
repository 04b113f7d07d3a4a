//! Error types for mask computation and compositing.
//!
//! Boundary violations (dimension mismatch, seeds outside the image, wrong
//! channel layout) are reported at the call that introduced them. An empty
//! selection is a normal result and never surfaces here.

use thiserror::Error;

/// Errors returned by the repaint engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepaintError {
    /// A mask or image does not match the working image size.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    InvalidDimensions {
        /// (width, height) required
        expected: (usize, usize),
        /// (width, height) supplied
        actual: (usize, usize),
    },

    /// A seed location falls outside the image extent.
    #[error("seed ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },

    /// The buffer lacks the channel layout the operation needs.
    #[error("unsupported channel count: expected {expected}, got {actual}")]
    InvalidChannel {
        expected: &'static str,
        actual: usize,
    },

    /// Indexed access into a seed collection past its end.
    #[error("index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A sub-range removal with inverted or overflowing bounds.
    #[error("invalid range {start}..{end} for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A cancellable fill observed its cancel flag between seeds.
    #[error("mask computation cancelled")]
    Cancelled,
}

/// Result type for repaint operations.
pub type Result<T> = std::result::Result<T, RepaintError>;

#[cfg(feature = "python")]
impl From<RepaintError> for pyo3::PyErr {
    fn from(err: RepaintError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "wasm")]
impl From<RepaintError> for wasm_bindgen::JsValue {
    fn from(err: RepaintError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
