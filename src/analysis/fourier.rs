//! Harmonic synthesis for continuous full-wave conduction.
//!
//! With current flowing at all times, the bridge output voltage is a full
//! sinusoidal pulse every π radians. Its Fourier series has a DC term and
//! even harmonics only:
//!
//! ```text
//! Vavg = (2Vm/π)·cos(α)                     (α = 0 for diodes)
//! Vn   = (2Vm/π)·(1/(n−1) − 1/(n+1))        n = 2, 4, 6, ...
//! ```
//!
//! Each harmonic drives the load through Zn = √(R² + (nωL)²) with phase
//! θn = atan(nωL/R), and the DC term through R against the back-EMF. Being
//! orthogonal, the components add in quadrature:
//!
//! ```text
//! Irms² = Iavg² + Σ (In/√2)²
//! ```
//!
//! Truncation: In ≤ Vn/R and Vn < 4Vm/(πn²), so the harmonics left out
//! after order n_max carry less than (4Vm/πR)²·Σ_{n>n_max} n⁻⁴/2 of mean
//! square current. For the default n_max = 20 that is below 2e-5·(Vm/R)².
//! The reconstructed time-domain current is approximate to the same degree.

use std::f64::consts::PI;

use serde::Serialize;

use crate::circuit::{CircuitConfig, ControlType, DerivedConstants};
use crate::error::{RectifierError, Result, Stage};

use super::quadrature::Averages;

/// One even harmonic of the output voltage and the current it drives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Harmonic {
    /// Harmonic order n (multiple of the source frequency)
    pub order: u32,
    /// Voltage amplitude Vn (V)
    #[serde(rename = "Vn")]
    pub voltage: f64,
    /// Load impedance Zn (Ω)
    #[serde(rename = "Zn")]
    pub impedance: f64,
    /// Load phase θn (rad)
    #[serde(rename = "theta_n")]
    pub phase: f64,
    /// Current amplitude In (A)
    #[serde(rename = "In")]
    pub current: f64,
}

/// Truncated Fourier description of continuous-conduction output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourierSeries {
    pub vavg: f64,
    pub iavg: f64,
    pub harmonics: Vec<Harmonic>,
    /// Angle at which the first device pair takes over (α, or 0 for diodes)
    #[serde(skip)]
    origin: f64,
    /// ωL, converts di/d(ωt) into inductor voltage
    #[serde(skip)]
    reactance: f64,
}

impl FourierSeries {
    /// Build the series with `count` even harmonics (n = 2, 4, ..., 2·count).
    pub fn synthesize(
        config: &CircuitConfig,
        derived: &DerivedConstants,
        alpha: f64,
        count: usize,
    ) -> Result<Self> {
        let vm = config.vm();
        let (vavg, origin) = match config.control_type() {
            ControlType::Controlled => (2.0 * vm / PI * alpha.cos(), alpha),
            ControlType::Uncontrolled => (2.0 * vm / PI, 0.0),
        };
        let iavg = (vavg - config.vdc()) / config.resistance();

        let harmonics = (1..=count as u32)
            .map(|k| {
                let order = 2 * k;
                let n = f64::from(order);
                let voltage = 2.0 * vm / PI * (1.0 / (n - 1.0) - 1.0 / (n + 1.0));
                let (impedance, phase) = derived.harmonic_impedance(config, order);
                Harmonic {
                    order,
                    voltage,
                    impedance,
                    phase,
                    current: voltage / impedance,
                }
            })
            .collect();

        let series = Self {
            vavg,
            iavg,
            harmonics,
            origin,
            reactance: derived.omega * config.inductance(),
        };

        if !series.iavg.is_finite() || series.harmonics.iter().any(|h| !h.current.is_finite()) {
            return Err(RectifierError::NonFinite {
                stage: Stage::FourierSynthesis,
                quantity: "harmonic current",
            });
        }

        Ok(series)
    }

    /// DC and RMS values by orthogonal superposition.
    pub fn averages(&self) -> Result<Averages> {
        let i_ac: f64 = self.harmonics.iter().map(|h| h.current.powi(2) / 2.0).sum();
        let v_ac: f64 = self.harmonics.iter().map(|h| h.voltage.powi(2) / 2.0).sum();

        Averages {
            iavg: self.iavg,
            irms: (self.iavg.powi(2) + i_ac).sqrt(),
            vavg: self.vavg,
            vrms: (self.vavg.powi(2) + v_ac).sqrt(),
        }
        .check_finite(Stage::FourierSynthesis)
    }

    fn harmonic_angle(&self, h: &Harmonic, wt: f64) -> f64 {
        f64::from(h.order) * (wt - self.origin) + PI - h.phase
    }

    /// Reconstructed load current.
    pub fn current_at(&self, wt: f64) -> f64 {
        self.iavg
            + self
                .harmonics
                .iter()
                .map(|h| h.current * self.harmonic_angle(h, wt).cos())
                .sum::<f64>()
    }

    /// Derivative of the reconstructed current with respect to ωt.
    pub fn current_slope(&self, wt: f64) -> f64 {
        -self
            .harmonics
            .iter()
            .map(|h| f64::from(h.order) * h.current * self.harmonic_angle(h, wt).sin())
            .sum::<f64>()
    }

    /// Inductor voltage L·di/dt of the reconstructed current.
    pub fn inductor_voltage(&self, wt: f64) -> f64 {
        self.reactance * self.current_slope(wt)
    }

    /// Angle at which the first device pair starts conducting.
    pub fn origin(&self) -> f64 {
        self.origin
    }
}
