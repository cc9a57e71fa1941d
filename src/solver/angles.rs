//! Firing angle, extinction angle and integration constants.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::circuit::CircuitConfig;
use crate::error::{RectifierError, Result};

use super::current::PulseCurrent;
use super::roots::ExtinctionSearch;

/// Angles and constants produced by one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolvedAngles {
    /// Angle at which conduction begins (rad)
    pub alpha: f64,
    /// Angle at which conduction ends (rad)
    pub beta: f64,
    /// Integration constant of the transient term
    #[serde(rename = "A")]
    pub a: f64,
    /// Freewheeling-segment constant (RL + FWD load only)
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    /// β − α (rad)
    pub conducting_angle: f64,
    /// Conduction time (ms)
    pub conducting_time: f64,
}

impl SolvedAngles {
    pub fn new(alpha: f64, beta: f64, a: f64, b: Option<f64>, omega: f64) -> Self {
        let conducting_angle = beta - alpha;
        Self {
            alpha,
            beta,
            a,
            b,
            conducting_angle,
            conducting_time: conducting_angle / omega * 1000.0,
        }
    }
}

/// Smallest angle at which the source can forward-bias the switch.
///
/// `arcsin(Vdc/Vm)` clamped to [0, π/2]; π/2 when Vdc ≥ Vm.
pub fn minimum_firing_angle(config: &CircuitConfig) -> f64 {
    (config.vdc() / config.vm()).clamp(-1.0, 1.0).asin().max(0.0)
}

/// Angle at which conduction begins: the requested firing angle, never
/// earlier than the minimum firing angle. Closed form, no iteration.
pub fn firing_angle(config: &CircuitConfig) -> f64 {
    let alpha_min = minimum_firing_angle(config);
    match config.firing_angle() {
        Some(requested) => requested.max(alpha_min),
        None => alpha_min,
    }
}

/// Whether current can start flowing at `alpha`.
///
/// At i = 0 the inductor sees `Vm·sin(α) − Vdc`. Conduction starts if that
/// is positive, or zero and still rising.
pub fn can_conduct(config: &CircuitConfig, alpha: f64) -> bool {
    let tol = 1e-12 * config.vm();
    let drive = config.vm() * alpha.sin() - config.vdc();
    if drive > tol {
        return true;
    }
    drive >= -tol && config.vm() * alpha.cos() > tol
}

/// Extinction angle β: the first zero of the pulse current after α.
pub fn extinction_angle(pulse: &PulseCurrent, search: &ExtinctionSearch) -> Result<f64> {
    let alpha = pulse.alpha();
    search
        .first_zero(|wt| pulse.at(wt), alpha, TAU)
        .map(|root| {
            tracing::trace!(beta = root.x, iterations = root.iterations, "extinction angle bracketed");
            root.x
        })
        .ok_or(RectifierError::NoExtinctionFound {
            alpha,
            search_end: alpha + TAU,
            subdivisions: search.subdivisions,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitParams, ControlType, WaveType};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn half_wave(vdc: f64, l: f64) -> CircuitConfig {
        CircuitParams::rle(WaveType::Half, ControlType::Uncontrolled, 100.0, 50.0, 10.0, l, vdc)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_uncontrolled_firing_angle() {
        assert_relative_eq!(firing_angle(&half_wave(20.0, 0.01)), 0.2f64.asin());
        assert_eq!(firing_angle(&half_wave(0.0, 0.01)), 0.0);
        // Negative back-EMF: conduction starts at the zero crossing
        assert_eq!(firing_angle(&half_wave(-30.0, 0.01)), 0.0);
    }

    #[test]
    fn test_controlled_firing_angle_clamp() {
        let params = CircuitParams::rle(WaveType::Half, ControlType::Controlled, 100.0, 50.0, 10.0, 0.01, 50.0);

        let late = params.clone().with_firing_angle(1.0).validate().unwrap();
        assert_eq!(firing_angle(&late), 1.0);

        let early = params.with_firing_angle(0.1).validate().unwrap();
        assert_eq!(firing_angle(&early), 0.5f64.asin());
    }

    #[test]
    fn test_back_emf_above_peak() {
        let config = CircuitParams::rle(WaveType::Half, ControlType::Controlled, 100.0, 50.0, 10.0, 0.01, 150.0)
            .with_firing_angle(0.3)
            .validate()
            .unwrap();
        assert_abs_diff_eq!(minimum_firing_angle(&config), FRAC_PI_2, epsilon = 1e-15);
        assert!(!can_conduct(&config, firing_angle(&config)));
    }

    #[test]
    fn test_can_conduct_at_minimum_angle() {
        let config = half_wave(20.0, 0.01);
        assert!(can_conduct(&config, firing_angle(&config)));
        // Past the point where the source falls below the back-EMF
        assert!(!can_conduct(&config, PI - 0.1));
    }

    #[test]
    fn test_extinction_after_pi_without_back_emf() {
        let config = half_wave(0.0, 0.01);
        let derived = config.derived();
        let pulse = PulseCurrent::new(&config, &derived, 0.0);
        let beta = extinction_angle(&pulse, &ExtinctionSearch::new()).unwrap();

        assert!(beta > PI);
        assert_abs_diff_eq!(pulse.at(beta), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extinction_resistive_limit() {
        let config = half_wave(0.0, 1e-7);
        let derived = config.derived();
        let pulse = PulseCurrent::new(&config, &derived, 0.0);
        let beta = extinction_angle(&pulse, &ExtinctionSearch::new()).unwrap();
        assert_abs_diff_eq!(beta, PI, epsilon = 1e-4);
    }

    #[test]
    fn test_no_extinction_with_negative_back_emf() {
        let config = half_wave(-200.0, 0.01);
        let derived = config.derived();
        let pulse = PulseCurrent::new(&config, &derived, firing_angle(&config));
        let err = extinction_angle(&pulse, &ExtinctionSearch::new()).unwrap_err();
        assert!(matches!(err, RectifierError::NoExtinctionFound { .. }));
    }

    #[test]
    fn test_conducting_time_ms() {
        let angles = SolvedAngles::new(0.0, PI, 0.0, None, 100.0 * PI);
        // Half a 50 Hz cycle
        assert_relative_eq!(angles.conducting_time, 10.0, epsilon = 1e-12);
    }
}
