//! Property-based tests for the solver using proptest.
//!
//! Covers: angle ordering, sign of averages, the form/ripple factor
//! identity and classifier consistency over random valid circuits.

use std::f64::consts::{PI, TAU};

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rectifier_core::{
    CircuitParams, ConductionMode, ControlType, RectifierError, SolveResult, Solver, WaveType,
};

fn wave() -> impl Strategy<Value = WaveType> {
    prop_oneof![Just(WaveType::Half), Just(WaveType::Full)]
}

/// Random RLE circuit with non-negative back-EMF below the source peak.
fn rle_circuit() -> impl Strategy<Value = CircuitParams> {
    (
        wave(),
        any::<bool>(),
        50.0f64..400.0,
        40.0f64..70.0,
        1.0f64..100.0,
        0.0f64..0.2,
        0.0f64..0.95,
        0.0f64..2.5,
    )
        .prop_map(|(wave, controlled, vm, f, r, l, vdc_ratio, firing)| {
            let control = if controlled {
                ControlType::Controlled
            } else {
                ControlType::Uncontrolled
            };
            let params = CircuitParams::rle(wave, control, vm, f, r, l, vdc_ratio * vm);
            if controlled {
                params.with_firing_angle(firing)
            } else {
                params
            }
        })
}

/// Solve, treating a vanishing average output voltage or an overflowing
/// integration constant (near-zero time constant, late firing) as uninteresting.
fn solved(params: &CircuitParams) -> Result<Option<SolveResult>, TestCaseError> {
    match Solver::new().solve_params(params) {
        Ok(result) => Ok(Some(result)),
        Err(RectifierError::DegenerateMetric { .. }) => Ok(None),
        Err(RectifierError::NonFinite { quantity: "A", .. }) => Ok(None),
        Err(e) => Err(TestCaseError::fail(format!("{params:?}: {e}"))),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// α ≤ β < α + 2π, and β = α only when nothing conducts.
    #[test]
    fn angles_ordered(params in rle_circuit()) {
        if let Some(result) = solved(&params)? {
            let p = result.parameters;
            prop_assert!(p.alpha >= 0.0 && p.alpha < PI);
            prop_assert!(p.beta >= p.alpha);
            prop_assert!(p.beta < p.alpha + TAU);
            if p.beta == p.alpha {
                prop_assert_eq!(result.performance.irms, 0.0);
            }
        }
    }

    /// Load current never flows backwards on average, and Irms bounds Iavg.
    #[test]
    fn averages_nonnegative(params in rle_circuit()) {
        if let Some(result) = solved(&params)? {
            let perf = result.performance;
            prop_assert!(perf.iavg >= -1e-9 * perf.irms.max(1.0));
            prop_assert!(perf.irms >= 0.0);
            prop_assert!(perf.irms >= perf.iavg * (1.0 - 1e-9));
            prop_assert!(perf.vrms >= 0.0);
        }
    }

    /// ripple_factor² + 1 = form_factor².
    #[test]
    fn ripple_form_identity(params in rle_circuit()) {
        if let Some(result) = solved(&params)? {
            let m = result.performance;
            let lhs = m.ripple_factor * m.ripple_factor + 1.0;
            let rhs = m.form_factor * m.form_factor;
            prop_assert!((lhs - rhs).abs() <= 1e-6 * rhs.max(1.0), "{} vs {}", lhs, rhs);
        }
    }

    /// The reported mode agrees with the boundary rule, and harmonics appear
    /// exactly for continuous conduction.
    #[test]
    fn classifier_consistent(params in rle_circuit()) {
        if let Some(result) = solved(&params)? {
            let p = result.parameters;
            let expected = match (params.wave_type, params.control_type) {
                _ if !result.conducts() => ConductionMode::Discontinuous,
                (WaveType::Half, _) => ConductionMode::Discontinuous,
                (WaveType::Full, ControlType::Uncontrolled) if p.beta > PI => ConductionMode::Continuous,
                (WaveType::Full, ControlType::Controlled) if p.beta > PI + p.alpha => ConductionMode::Continuous,
                _ => ConductionMode::Discontinuous,
            };
            prop_assert_eq!(result.mode, expected);
            prop_assert_eq!(result.harmonics.is_some(), result.is_continuous());
        }
    }

    /// Freewheeling load: A = B and the load sees no net inductor voltage.
    #[test]
    fn freewheeling_balance(
        vm in 50.0f64..400.0,
        f in 40.0f64..70.0,
        r in 1.0f64..100.0,
        l in 0.001f64..0.2,
    ) {
        let result = Solver::new()
            .solve_params(&CircuitParams::freewheeling(vm, f, r, l))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let p = result.parameters;
        let b = p.b.unwrap_or(f64::NAN);
        prop_assert!((p.a - b).abs() <= 1e-9 * b.abs().max(1.0));

        let perf = result.performance;
        prop_assert!((perf.iavg - perf.vavg / r).abs() <= 1e-6 * perf.iavg.abs().max(1e-3));
    }
}
