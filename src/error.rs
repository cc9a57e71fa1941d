//! Error types for the rectifier solver.
//!
//! This module provides a unified error type [`RectifierError`] that covers
//! every way a solve can fail: rejected input, a current expression with no
//! extinction point, metrics that would divide by zero, and the I/O done by
//! the command-line frontend.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`RectifierError`].
pub type Result<T> = std::result::Result<T, RectifierError>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Parameter validation, before any numerical work
    Validation,
    /// Firing/extinction angle and integration constant solve
    AngleSolve,
    /// Numerical integration of discontinuous waveforms
    Quadrature,
    /// Harmonic synthesis for continuous conduction
    FourierSynthesis,
    /// Final performance figure assembly
    Performance,
    /// Reading parameters or writing results
    Io,
}

impl Stage {
    /// Short machine-friendly name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::AngleSolve => "angle_solve",
            Stage::Quadrature => "quadrature",
            Stage::FourierSynthesis => "fourier_synthesis",
            Stage::Performance => "performance",
            Stage::Io => "io",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum RectifierError {
    // ============ Input Errors ============
    /// Parameter out of range or unsupported circuit combination
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // ============ Numerical Errors ============
    /// The load current never returns to zero inside the search bracket
    #[error(
        "No extinction angle found: current stays positive from alpha = {alpha:.4} rad \
         to {search_end:.4} rad ({subdivisions} scan steps)"
    )]
    NoExtinctionFound {
        alpha: f64,
        search_end: f64,
        subdivisions: usize,
    },

    /// A performance figure would divide by a (near) zero quantity
    #[error("Degenerate metric '{metric}': divisor is {value:.3e}")]
    DegenerateMetric { metric: &'static str, value: f64 },

    /// Integration or synthesis produced NaN/Infinity
    #[error("Non-finite {quantity} during {stage}")]
    NonFinite { stage: Stage, quantity: &'static str },

    /// Boundary-value system for the freewheeling load is singular
    #[error("Singular boundary system (determinant: {determinant:.3e}) - time constant too large")]
    SingularSystem { determinant: f64 },

    // ============ I/O Errors ============
    /// Error reading a parameter file
    #[error("Failed to read parameter file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON parameters or unserializable result
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing results
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl RectifierError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a degenerate metric error
    pub fn degenerate(metric: &'static str, value: f64) -> Self {
        Self::DegenerateMetric { metric, value }
    }

    /// Pipeline stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfiguration { .. } => Stage::Validation,
            Self::NoExtinctionFound { .. } | Self::SingularSystem { .. } => Stage::AngleSolve,
            Self::DegenerateMetric { .. } => Stage::Performance,
            Self::NonFinite { stage, .. } => *stage,
            Self::FileReadError { .. } | Self::Json(_) | Self::OutputError { .. } => Stage::Io,
        }
    }
}
