//! Raw parameters, the validated circuit configuration and its derived constants.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::types::{ControlType, LoadType, WaveType};
use super::validate::validate_params;

/// Unvalidated parameter set as supplied by a caller (CLI flags, JSON, WASM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitParams {
    pub wave_type: WaveType,
    pub control_type: ControlType,
    #[serde(default = "default_load")]
    pub load_type: LoadType,
    /// Peak source voltage (V)
    #[serde(alias = "Vm")]
    pub vm: f64,
    /// Source frequency (Hz)
    pub f: f64,
    /// Load resistance (Ω)
    #[serde(alias = "R")]
    pub r: f64,
    /// Load inductance (H)
    #[serde(alias = "L")]
    pub l: f64,
    /// Back-EMF (V)
    #[serde(default, alias = "Vdc")]
    pub vdc: f64,
    /// Firing angle in radians, controlled rectifiers only
    #[serde(default)]
    pub firing_angle: Option<f64>,
}

fn default_load() -> LoadType {
    LoadType::Rle
}

impl CircuitParams {
    /// Parameters for a rectifier feeding an RLE load.
    pub fn rle(
        wave_type: WaveType,
        control_type: ControlType,
        vm: f64,
        f: f64,
        r: f64,
        l: f64,
        vdc: f64,
    ) -> Self {
        Self {
            wave_type,
            control_type,
            load_type: LoadType::Rle,
            vm,
            f,
            r,
            l,
            vdc,
            firing_angle: None,
        }
    }

    /// Parameters for the half-wave diode rectifier with an RL load and freewheeling diode.
    pub fn freewheeling(vm: f64, f: f64, r: f64, l: f64) -> Self {
        Self {
            wave_type: WaveType::Half,
            control_type: ControlType::Uncontrolled,
            load_type: LoadType::RlFwd,
            vm,
            f,
            r,
            l,
            vdc: 0.0,
            firing_angle: None,
        }
    }

    /// Set the firing angle (radians).
    pub fn with_firing_angle(mut self, firing_angle: f64) -> Self {
        self.firing_angle = Some(firing_angle);
        self
    }

    /// Validate into an immutable [`CircuitConfig`].
    pub fn validate(&self) -> Result<CircuitConfig> {
        CircuitConfig::new(self)
    }
}

/// Validated, immutable circuit configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitConfig {
    wave_type: WaveType,
    control_type: ControlType,
    load_type: LoadType,
    vm: f64,
    f: f64,
    r: f64,
    l: f64,
    vdc: f64,
    firing_angle: Option<f64>,
}

impl CircuitConfig {
    /// Validate a raw parameter set.
    ///
    /// A back-EMF on a freewheeling load is dropped (the topology has none) and
    /// a firing angle on an uncontrolled rectifier is ignored.
    pub fn new(params: &CircuitParams) -> Result<Self> {
        validate_params(params)?;

        let vdc = match params.load_type {
            LoadType::RlFwd if params.vdc != 0.0 => {
                tracing::warn!(vdc = params.vdc, "freewheeling load has no back-EMF, using 0 V");
                0.0
            }
            _ => params.vdc,
        };

        let firing_angle = match params.control_type {
            ControlType::Controlled => params.firing_angle,
            ControlType::Uncontrolled => {
                if params.firing_angle.is_some() {
                    tracing::debug!("ignoring firing angle on uncontrolled rectifier");
                }
                None
            }
        };

        Ok(Self {
            wave_type: params.wave_type,
            control_type: params.control_type,
            load_type: params.load_type,
            vm: params.vm,
            f: params.f,
            r: params.r,
            l: params.l,
            vdc,
            firing_angle,
        })
    }

    pub fn wave_type(&self) -> WaveType {
        self.wave_type
    }

    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    /// Peak source voltage (V).
    pub fn vm(&self) -> f64 {
        self.vm
    }

    /// Source frequency (Hz).
    pub fn frequency(&self) -> f64 {
        self.f
    }

    /// Load resistance (Ω).
    pub fn resistance(&self) -> f64 {
        self.r
    }

    /// Load inductance (H).
    pub fn inductance(&self) -> f64 {
        self.l
    }

    /// Back-EMF (V), always 0 for a freewheeling load.
    pub fn vdc(&self) -> f64 {
        self.vdc
    }

    /// Requested firing angle, present only on controlled rectifiers.
    pub fn firing_angle(&self) -> Option<f64> {
        self.firing_angle
    }

    pub fn is_controlled(&self) -> bool {
        self.control_type == ControlType::Controlled
    }

    /// RMS value of the sinusoidal source.
    pub fn source_rms(&self) -> f64 {
        self.vm / std::f64::consts::SQRT_2
    }

    /// Constants derived from the component values.
    pub fn derived(&self) -> DerivedConstants {
        DerivedConstants::new(self)
    }
}

/// Quantities derived from a [`CircuitConfig`]. Recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedConstants {
    /// Angular frequency ω = 2πf (rad/s)
    pub omega: f64,
    /// Load impedance at the source frequency (Ω)
    pub z: f64,
    /// Impedance angle θ = atan(ωL/R) (rad)
    pub theta: f64,
    /// Normalized time constant ωτ = ωL/R
    pub wtau: f64,
}

impl DerivedConstants {
    pub fn new(config: &CircuitConfig) -> Self {
        let omega = 2.0 * PI * config.f;
        let x_l = omega * config.l;
        Self {
            omega,
            z: config.r.hypot(x_l),
            theta: (x_l / config.r).atan(),
            wtau: x_l / config.r,
        }
    }

    /// Impedance of the load at the n-th multiple of the source frequency.
    pub fn harmonic_impedance(&self, config: &CircuitConfig, n: u32) -> (f64, f64) {
        let x_n = f64::from(n) * self.omega * config.l;
        (config.r.hypot(x_n), (x_n / config.r).atan())
    }
}
