//! Conduction mode classification.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::circuit::{ControlType, WaveType};

use super::BOUNDARY_TOLERANCE;

/// Whether the load current returns to zero within each output period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConductionMode {
    Discontinuous,
    Continuous,
}

impl fmt::Display for ConductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConductionMode::Discontinuous => write!(f, "discontinuous"),
            ConductionMode::Continuous => write!(f, "continuous"),
        }
    }
}

/// Result of classifying a solved pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub mode: ConductionMode,
    /// β at which the mode would switch (None for half-wave)
    pub boundary: Option<f64>,
    /// β lies within [`BOUNDARY_TOLERANCE`] of the boundary
    pub near_boundary: bool,
}

/// Classify conduction from the solved angles.
///
/// - Half-wave: always discontinuous
/// - Full-wave uncontrolled: continuous iff β > π
/// - Full-wave controlled: continuous iff β > π + α
///
/// The comparison is strict; β exactly on the boundary is discontinuous.
pub fn classify(wave: WaveType, control: ControlType, alpha: f64, beta: f64) -> Classification {
    let boundary = match (wave, control) {
        (WaveType::Half, _) => {
            return Classification {
                mode: ConductionMode::Discontinuous,
                boundary: None,
                near_boundary: false,
            }
        }
        (WaveType::Full, ControlType::Uncontrolled) => PI,
        (WaveType::Full, ControlType::Controlled) => PI + alpha,
    };

    let mode = if beta > boundary {
        ConductionMode::Continuous
    } else {
        ConductionMode::Discontinuous
    };
    let near_boundary = (beta - boundary).abs() < BOUNDARY_TOLERANCE;
    if near_boundary {
        tracing::warn!(beta, boundary, %mode, "extinction angle on the conduction mode boundary");
    }

    Classification {
        mode,
        boundary: Some(boundary),
        near_boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_wave_always_discontinuous() {
        let c = classify(WaveType::Half, ControlType::Uncontrolled, 0.0, 5.0);
        assert_eq!(c.mode, ConductionMode::Discontinuous);
        assert_eq!(c.boundary, None);
    }

    #[test]
    fn test_full_wave_uncontrolled() {
        let c = classify(WaveType::Full, ControlType::Uncontrolled, 0.2, PI + 0.1);
        assert_eq!(c.mode, ConductionMode::Continuous);
        let c = classify(WaveType::Full, ControlType::Uncontrolled, 0.2, PI - 0.1);
        assert_eq!(c.mode, ConductionMode::Discontinuous);
    }

    #[test]
    fn test_full_wave_controlled_boundary_shifts() {
        // β between π and π + α is still discontinuous for a controlled bridge
        let c = classify(WaveType::Full, ControlType::Controlled, 0.5, PI + 0.3);
        assert_eq!(c.mode, ConductionMode::Discontinuous);
        let c = classify(WaveType::Full, ControlType::Controlled, 0.5, PI + 0.6);
        assert_eq!(c.mode, ConductionMode::Continuous);
    }

    #[test]
    fn test_tie_and_flag() {
        let c = classify(WaveType::Full, ControlType::Uncontrolled, 0.0, PI);
        assert_eq!(c.mode, ConductionMode::Discontinuous);
        assert!(c.near_boundary);

        let c = classify(WaveType::Full, ControlType::Uncontrolled, 0.0, PI + 1e-3);
        assert!(!c.near_boundary);
    }
}
