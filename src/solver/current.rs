//! Closed-form load current expressions.
//!
//! RLE pulse (one conduction interval starting at α):
//! ```text
//! i(ωt) = (Vm/Z)·sin(ωt − θ) − Vdc/R + A·e^(−ωt/ωτ)
//! ```
//! The transient term is stored anchored at α, `A·e^(−ωt/ωτ) = A'·e^(−(ωt−α)/ωτ)`,
//! so evaluation never overflows for short time constants.
//!
//! RL load with freewheeling diode (steady state over one cycle):
//! ```text
//! i₊(ωt) = (Vm/Z)·sin(ωt − θ) + A·e^(−ωt/ωτ)      0 ≤ ωt < π
//! i₋(ωt) = B·e^(−(ωt−π)/ωτ)                        π ≤ ωt < 2π
//! ```

use std::f64::consts::{PI, TAU};

use crate::analysis::FourierSeries;
use crate::circuit::{CircuitConfig, DerivedConstants};
use crate::error::{RectifierError, Result, Stage};

/// `e^(−dx/ωτ)`, with the ωτ = 0 (purely resistive) limit taken explicitly.
pub(crate) fn decay(dx: f64, wtau: f64) -> f64 {
    if wtau > 0.0 {
        (-dx / wtau).exp()
    } else if dx <= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Current of a single RLE conduction pulse that starts from zero at α.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseCurrent {
    /// Vm/Z
    amplitude: f64,
    theta: f64,
    /// Vdc/R
    offset: f64,
    alpha: f64,
    wtau: f64,
    /// Transient term evaluated at α
    anchor: f64,
}

impl PulseCurrent {
    /// Build the pulse for firing angle `alpha`, choosing A so that i(α) = 0.
    pub fn new(config: &CircuitConfig, derived: &DerivedConstants, alpha: f64) -> Self {
        let amplitude = config.vm() / derived.z;
        let offset = config.vdc() / config.resistance();
        let anchor = -(amplitude * (alpha - derived.theta).sin() - offset);
        Self {
            amplitude,
            theta: derived.theta,
            offset,
            alpha,
            wtau: derived.wtau,
            anchor,
        }
    }

    /// Instantaneous current at angle `wt` (valid on [α, β]).
    pub fn at(&self, wt: f64) -> f64 {
        self.amplitude * (wt - self.theta).sin() - self.offset
            + self.anchor * decay(wt - self.alpha, self.wtau)
    }

    /// Integration constant A of the `A·e^(−ωt/ωτ)` form.
    ///
    /// Reported as 0 for a purely resistive load, where the transient term vanishes.
    /// Fails with [`RectifierError::NonFinite`] when `e^(α/ωτ)` overflows, which
    /// happens for a late firing angle on a very short time constant.
    pub fn integration_constant(&self) -> Result<f64> {
        if self.wtau <= 0.0 || self.anchor == 0.0 {
            return Ok(0.0);
        }
        let a = self.anchor * (self.alpha / self.wtau).exp();
        if a.is_finite() {
            Ok(a)
        } else {
            Err(RectifierError::NonFinite {
                stage: Stage::AngleSolve,
                quantity: "A",
            })
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Steady-state current of the RL load with a freewheeling diode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreewheelingCurrent {
    amplitude: f64,
    theta: f64,
    wtau: f64,
    a: f64,
    b: f64,
}

impl FreewheelingCurrent {
    /// Solve the boundary conditions for A and B.
    ///
    /// Continuity at π and periodicity over 2π, with k = e^(−π/ωτ):
    /// ```text
    /// [  k  −1 ] [A]   [ −(Vm/Z)·sin(π − θ) ]
    /// [ −1   k ] [B] = [  (Vm/Z)·sin(−θ)    ]
    /// ```
    pub fn solve(config: &CircuitConfig, derived: &DerivedConstants) -> Result<Self> {
        let amplitude = config.vm() / derived.z;
        let k = decay(PI, derived.wtau);

        let m = [[k, -1.0], [-1.0, k]];
        let rhs = [
            -amplitude * (PI - derived.theta).sin(),
            amplitude * (-derived.theta).sin(),
        ];

        let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        if det.abs() < 1e-12 {
            return Err(RectifierError::SingularSystem { determinant: det });
        }

        let a = (rhs[0] * m[1][1] - m[0][1] * rhs[1]) / det;
        let b = (m[0][0] * rhs[1] - rhs[0] * m[1][0]) / det;

        Ok(Self {
            amplitude,
            theta: derived.theta,
            wtau: derived.wtau,
            a,
            b,
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Current through the source-side diode (0 ≤ ωt < π).
    pub fn source_branch(&self, wt: f64) -> f64 {
        self.amplitude * (wt - self.theta).sin() + self.a * decay(wt, self.wtau)
    }

    /// Current through the freewheeling diode (π ≤ ωt < 2π).
    pub fn freewheel_branch(&self, wt: f64) -> f64 {
        self.b * decay(wt - PI, self.wtau)
    }

    /// Load current at any angle, folded into one cycle.
    pub fn at(&self, wt: f64) -> f64 {
        let phase = wt.rem_euclid(TAU);
        if phase < PI {
            self.source_branch(phase)
        } else {
            self.freewheel_branch(phase)
        }
    }
}

/// Solved description of the load current, sufficient to resample any waveform.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentModel {
    /// The switch never becomes forward biased; no current flows
    Blocked,
    /// One RLE pulse per output period on [α, β]
    Pulse(PulseCurrent),
    /// Two-segment freewheeling current
    Freewheeling(FreewheelingCurrent),
    /// Continuous conduction reconstructed from harmonics
    Fourier(FourierSeries),
}
