//! Performance metrics and per-device currents.
//!
//! ```text
//! P   = Vdc·Iavg + Irms²·R
//! PF  = P / (Vs,rms·Irms)
//! FF  = Vrms / Vavg
//! RF  = √(FF² − 1)
//! η   = (Vavg·Iavg) / (Vrms·Irms)
//! ```

use std::f64::consts::SQRT_2;

use serde::Serialize;

use crate::circuit::{CircuitConfig, WaveType};
use crate::error::{RectifierError, Result};

use super::quadrature::Averages;

/// Relative magnitude below which a divisor counts as zero.
const DEGENERATE_THRESHOLD: f64 = 1e-9;

/// Derived performance figures for one operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Power delivered to the load (W)
    pub power: f64,
    #[serde(rename = "Iavg")]
    pub iavg: f64,
    #[serde(rename = "Irms")]
    pub irms: f64,
    #[serde(rename = "Vavg")]
    pub vavg: f64,
    #[serde(rename = "Vrms")]
    pub vrms: f64,
    pub power_factor: f64,
    pub form_factor: f64,
    pub ripple_factor: f64,
    pub efficiency: f64,
}

impl PerformanceMetrics {
    /// Derive all metrics from load averages.
    ///
    /// Fails with [`RectifierError::DegenerateMetric`] instead of dividing by a
    /// vanishing Vavg or Irms.
    pub fn assemble(averages: &Averages, config: &CircuitConfig) -> Result<Self> {
        let Averages {
            iavg,
            irms,
            vavg,
            vrms,
        } = *averages;

        if vavg.abs() <= DEGENERATE_THRESHOLD * config.vm() {
            return Err(RectifierError::degenerate("form_factor", vavg));
        }
        if irms <= DEGENERATE_THRESHOLD * config.vm() / config.resistance() {
            return Err(RectifierError::degenerate("power_factor", irms));
        }

        let power = config.vdc() * iavg + irms * irms * config.resistance();
        let form_factor = vrms / vavg;

        Ok(Self {
            power,
            iavg,
            irms,
            vavg,
            vrms,
            power_factor: power / (config.source_rms() * irms),
            form_factor,
            // FF ≥ 1 analytically; rounding can push FF² just under 1
            ripple_factor: (form_factor * form_factor - 1.0).max(0.0).sqrt(),
            efficiency: (vavg * iavg) / (vrms * irms),
        })
    }

    /// Metrics of a circuit in which no current ever flows.
    ///
    /// The output terminals sit at the back-EMF, so Vavg = Vrms = Vdc with no
    /// ripple, and nothing is delivered.
    pub fn blocked(vdc: f64) -> Self {
        Self {
            power: 0.0,
            iavg: 0.0,
            irms: 0.0,
            vavg: vdc,
            vrms: vdc.abs(),
            power_factor: 0.0,
            form_factor: 1.0,
            ripple_factor: 0.0,
            efficiency: 0.0,
        }
    }
}

/// Average and RMS current through each switching device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceCurrents {
    #[serde(rename = "Iavg")]
    pub iavg: f64,
    #[serde(rename = "Irms")]
    pub irms: f64,
    /// Freewheeling diode, RL + FWD load only
    #[serde(rename = "freewheel_Iavg", skip_serializing_if = "Option::is_none")]
    pub freewheel_iavg: Option<f64>,
    #[serde(rename = "freewheel_Irms", skip_serializing_if = "Option::is_none")]
    pub freewheel_irms: Option<f64>,
}

impl DeviceCurrents {
    /// Per-switch currents given the load averages.
    ///
    /// A half-wave switch carries the whole load current. In a bridge each
    /// pair conducts on alternate half cycles, halving the average and
    /// dividing the RMS by √2.
    pub fn for_switches(wave: WaveType, averages: &Averages) -> Self {
        let (iavg, irms) = match wave {
            WaveType::Half => (averages.iavg, averages.irms),
            WaveType::Full => (averages.iavg / 2.0, averages.irms / SQRT_2),
        };
        Self {
            iavg,
            irms,
            freewheel_iavg: None,
            freewheel_irms: None,
        }
    }

    pub fn none() -> Self {
        Self {
            iavg: 0.0,
            irms: 0.0,
            freewheel_iavg: None,
            freewheel_irms: None,
        }
    }
}
