//! Parameter validation.

use std::f64::consts::PI;

use crate::error::{RectifierError, Result};

use super::types::{ControlType, LoadType, WaveType};
use super::CircuitParams;

/// Validate a raw parameter set before any numerical work.
///
/// Checks:
/// - All values are finite
/// - Vm, f and R are positive; L is non-negative
/// - Controlled rectifiers carry a firing angle in [0, π)
/// - A freewheeling load is only used on the uncontrolled half-wave rectifier
pub fn validate_params(params: &CircuitParams) -> Result<()> {
    let values = [
        ("Vm", params.vm),
        ("f", params.f),
        ("R", params.r),
        ("L", params.l),
        ("Vdc", params.vdc),
    ];
    for (name, value) in values {
        if !value.is_finite() {
            return Err(RectifierError::invalid(format!("{name} must be a finite number")));
        }
    }

    if params.vm <= 0.0 {
        return Err(RectifierError::invalid("peak source voltage Vm must be positive"));
    }
    if params.f <= 0.0 {
        return Err(RectifierError::invalid("frequency f must be positive"));
    }
    if params.r <= 0.0 {
        return Err(RectifierError::invalid("resistance R must be positive"));
    }
    if params.l < 0.0 {
        return Err(RectifierError::invalid("inductance L cannot be negative"));
    }

    if params.control_type == ControlType::Controlled {
        let alpha = params
            .firing_angle
            .ok_or_else(|| RectifierError::invalid("controlled rectifier requires a firing angle"))?;
        if !alpha.is_finite() || !(0.0..PI).contains(&alpha) {
            return Err(RectifierError::invalid(format!(
                "firing angle {alpha} rad outside [0, π)"
            )));
        }
    }

    if params.load_type == LoadType::RlFwd {
        if params.control_type == ControlType::Controlled {
            return Err(RectifierError::invalid(
                "freewheeling diode load is only supported on uncontrolled rectifiers",
            ));
        }
        if params.wave_type == WaveType::Full {
            return Err(RectifierError::invalid(
                "freewheeling diode load is only supported on half-wave rectifiers",
            ));
        }
    }

    Ok(())
}
