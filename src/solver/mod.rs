//! Steady-state rectifier solver.
//!
//! This module turns a validated circuit into conduction angles, a load
//! current model and, through [`crate::analysis`], performance figures.
//!
//! ## Conduction interval (RLE load)
//!
//! While the switch conducts, the load obeys
//! ```text
//! Vm·sin(ωt) = R·i + L·di/dt + Vdc
//! ```
//! whose solution starting from i(α) = 0 is a forced sinusoid, a DC offset
//! and a decaying transient:
//! ```text
//! i(ωt) = (Vm/Z)·sin(ωt − θ) − Vdc/R + A·e^(−ωt/ωτ)
//! ```
//! Given α, the constant A follows in closed form, so the coupled (A, β)
//! problem reduces to a one-dimensional search for the first zero β of i
//! after α.
//!
//! ## Freewheeling load
//!
//! The RL + FWD boundary-value problem is linear in (A, B) and is solved
//! directly as a 2×2 system.
//!
//! ## Mode
//!
//! Full-wave bridges whose pulses overlap the next firing are continuous;
//! their averages come from harmonic synthesis instead of quadrature.

mod angles;
mod conduction;
mod current;
mod rectifier;
mod result;
mod roots;

pub use angles::{can_conduct, extinction_angle, firing_angle, minimum_firing_angle, SolvedAngles};
pub use conduction::{classify, Classification, ConductionMode};
pub use current::{CurrentModel, FreewheelingCurrent, PulseCurrent};
pub use rectifier::{Solver, SolverConfig};
pub use result::SolveResult;
pub use roots::{ExtinctionSearch, Root};

/// Default number of even harmonics in the Fourier path (n = 2, 4, ..., 20).
pub const DEFAULT_HARMONICS: usize = 10;

/// Bracket width at which extinction-angle bisection stops (rad).
pub const ROOT_TOLERANCE: f64 = 1e-12;

/// Maximum bisection iterations per extinction angle.
pub const MAX_ITERATIONS: usize = 200;

/// Uniform scan steps across (α, α + 2π] when bracketing β.
pub const SCAN_SUBDIVISIONS: usize = 3600;

/// Relative error target of the adaptive quadrature.
pub const QUADRATURE_TOLERANCE: f64 = 1e-10;

/// Maximum bisection depth per quadrature panel.
pub const QUADRATURE_MAX_DEPTH: u32 = 20;

/// Distance from the continuous/discontinuous boundary that raises a flag (rad).
pub const BOUNDARY_TOLERANCE: f64 = 1e-6;
