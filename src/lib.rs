//! # Rectifier Core
//!
//! A steady-state solver for single-phase rectifier circuits.
//!
//! This library provides:
//! - Half-wave and full-wave (bridge) rectifiers, diode or thyristor
//! - RLE loads (resistor, inductor, back-EMF) and RL loads with a freewheeling diode
//! - Conduction angles, conduction mode and performance figures
//! - Sampled time-domain waveforms for every circuit voltage and current
//!
//! ## Architecture
//!
//! - [`circuit`] - Configuration selectors, component values and validation
//! - [`solver`] - Firing/extinction angles, current models and the [`Solver`]
//! - [`analysis`] - Quadrature, harmonic synthesis and performance metrics
//! - [`waveform`] - Waveform sampling
//! - [`output`] - JSON rendering of results and errors
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! rectify --wave half --control uncontrolled --vm 100 --frequency 50 \
//!     --resistance 10 --inductance 0.01 --vdc 20 --pretty
//! ```
//!
//! ### Library
//!
//! ```
//! use rectifier_core::{CircuitParams, ControlType, Solver, WaveType};
//!
//! let params = CircuitParams::rle(WaveType::Half, ControlType::Uncontrolled, 100.0, 50.0, 10.0, 0.01, 20.0);
//! let result = Solver::new().solve_params(&params)?;
//! assert!(result.parameters.beta > result.parameters.alpha);
//! # Ok::<(), rectifier_core::RectifierError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmRectifierSolver } from 'rectifier_core';
//!
//! const solver = new WasmRectifierSolver();
//! const result = JSON.parse(solver.solve(JSON.stringify(params)));
//! ```
//!
//! ## Solution Method
//!
//! For each circuit:
//!
//! 1. Find the firing angle α in closed form
//! 2. Bracket and bisect the first zero β of the load current after α
//! 3. Classify the conduction mode from (α, β)
//! 4. Integrate the closed-form current (discontinuous) or superpose
//!    harmonics (continuous) to get averages and RMS values
//!
//! The freewheeling load replaces steps 2-3 with a 2×2 linear solve.

pub mod analysis;
pub mod circuit;
pub mod error;
pub mod output;
pub mod solver;
pub mod waveform;

// Re-export main types for convenience
pub use circuit::{CircuitConfig, CircuitParams, ControlType, LoadType, WaveType};
pub use error::{RectifierError, Result, Stage};
pub use solver::{ConductionMode, SolveResult, Solver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmRectifierSolver;

/// Samples per waveform over one source cycle.
pub const WAVEFORM_POINTS: usize = 1000;

/// Solve a validated circuit with the default solver configuration.
pub fn solve(config: &CircuitConfig) -> Result<SolveResult> {
    Solver::new().solve(config)
}
