//! Circuit model: configuration selectors, component values and validation.
//!
//! A [`CircuitParams`] is what a caller hands in; [`CircuitParams::validate`]
//! turns it into an immutable [`CircuitConfig`], from which the
//! [`DerivedConstants`] (ω, Z, θ, ωτ) are computed.

mod config;
mod types;
mod validate;

pub use config::{CircuitConfig, CircuitParams, DerivedConstants};
pub use types::*;
pub use validate::validate_params;
