//! Numerical integration of discontinuous waveforms.
//!
//! Averages and RMS values over one output period are computed with
//! adaptive Simpson quadrature. The interval is first split into a fixed
//! number of panels, each refined until the Richardson error estimate falls
//! below its share of the tolerance or the depth limit is hit, so every
//! integral terminates after a bounded number of evaluations.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use crate::circuit::CircuitConfig;
use crate::error::{RectifierError, Result, Stage};
use crate::solver::{FreewheelingCurrent, PulseCurrent};

use super::performance::DeviceCurrents;

/// Initial number of panels before adaptive refinement.
const PANELS: usize = 16;

/// Average and RMS values of load current and output voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub iavg: f64,
    pub irms: f64,
    pub vavg: f64,
    pub vrms: f64,
}

impl Averages {
    /// Reject NaN or infinite values produced by `stage`.
    pub(crate) fn check_finite(self, stage: Stage) -> Result<Self> {
        let fields = [
            ("Iavg", self.iavg),
            ("Irms", self.irms),
            ("Vavg", self.vavg),
            ("Vrms", self.vrms),
        ];
        for (quantity, value) in fields {
            if !value.is_finite() {
                return Err(RectifierError::NonFinite { stage, quantity });
            }
        }
        Ok(self)
    }
}

/// Adaptive Simpson integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    /// Error target relative to the magnitude of the integral
    pub tolerance: f64,
    /// Maximum bisection depth per panel
    pub max_depth: u32,
}

impl Quadrature {
    pub fn new(tolerance: f64, max_depth: u32) -> Self {
        Self {
            tolerance,
            max_depth,
        }
    }

    /// Integrate `f` over `[a, b]`. An empty or reversed interval yields 0.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }

        let h = (b - a) / PANELS as f64;
        let panels: Vec<(f64, f64, f64, f64, f64, f64)> = (0..PANELS)
            .map(|k| {
                let x0 = a + h * k as f64;
                let x1 = if k + 1 == PANELS { b } else { x0 + h };
                let (f0, f1) = (f(x0), f(x1));
                let fm = f(0.5 * (x0 + x1));
                let whole = simpson(x0, x1, f0, fm, f1);
                (x0, x1, f0, fm, f1, whole)
            })
            .collect();

        // Tolerance scales with the coarse estimate so large currents do not over-refine
        let scale: f64 = panels.iter().map(|p| p.5.abs()).sum::<f64>().max(f64::MIN_POSITIVE);
        let panel_tol = self.tolerance * scale / PANELS as f64;

        panels
            .into_iter()
            .map(|(x0, x1, f0, fm, f1, whole)| {
                self.refine(&f, x0, x1, f0, fm, f1, whole, panel_tol, self.max_depth)
            })
            .sum()
    }

    #[allow(clippy::too_many_arguments)]
    fn refine<F: Fn(f64) -> f64>(
        &self,
        f: &F,
        a: f64,
        b: f64,
        fa: f64,
        fm: f64,
        fb: f64,
        whole: f64,
        tol: f64,
        depth: u32,
    ) -> f64 {
        let m = 0.5 * (a + b);
        let flm = f(0.5 * (a + m));
        let frm = f(0.5 * (m + b));
        let left = simpson(a, m, fa, flm, fm);
        let right = simpson(m, b, fm, frm, fb);
        let delta = left + right - whole;

        if depth == 0 || delta.abs() <= 15.0 * tol {
            return left + right + delta / 15.0;
        }

        self.refine(f, a, m, fa, flm, fm, left, 0.5 * tol, depth - 1)
            + self.refine(f, m, b, fm, frm, fb, right, 0.5 * tol, depth - 1)
    }
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

/// Averages for an RLE load conducting on [α, β] once per output period.
///
/// Outside the conduction interval the load current is zero and the output
/// terminals sit at the back-EMF, so
/// ```text
/// Vavg = (1/T)·[∫_α^β Vm·sin(ωt) d(ωt) + Vdc·(T − (β − α))]
/// ```
/// with T = 2π for half-wave and T = π for a full-wave bridge.
pub fn pulse_averages(
    q: &Quadrature,
    pulse: &PulseCurrent,
    config: &CircuitConfig,
    alpha: f64,
    beta: f64,
) -> Result<Averages> {
    let period = config.wave_type().period();
    let vm = config.vm();
    let vdc = config.vdc();
    let idle = (period - (beta - alpha)).max(0.0);

    let i_int = q.integrate(|wt| pulse.at(wt), alpha, beta);
    let i_sq_int = q.integrate(|wt| pulse.at(wt).powi(2), alpha, beta);
    let v_int = q.integrate(|wt| vm * wt.sin(), alpha, beta);
    let v_sq_int = q.integrate(|wt| (vm * wt.sin()).powi(2), alpha, beta);

    Averages {
        iavg: i_int / period,
        irms: (i_sq_int.max(0.0) / period).sqrt(),
        vavg: (v_int + vdc * idle) / period,
        vrms: ((v_sq_int + vdc * vdc * idle).max(0.0) / period).sqrt(),
    }
    .check_finite(Stage::Quadrature)
}

/// Averages for the RL load with freewheeling diode, plus the split of
/// current between the source-side diode and the freewheeling diode.
pub fn freewheeling_averages(
    q: &Quadrature,
    current: &FreewheelingCurrent,
    config: &CircuitConfig,
) -> Result<(Averages, DeviceCurrents)> {
    let vm = config.vm();

    let main_int = q.integrate(|wt| current.source_branch(wt), 0.0, PI);
    let main_sq_int = q.integrate(|wt| current.source_branch(wt).powi(2), 0.0, PI);
    let fw_int = q.integrate(|wt| current.freewheel_branch(wt), PI, TAU);
    let fw_sq_int = q.integrate(|wt| current.freewheel_branch(wt).powi(2), PI, TAU);

    // Output follows the source for the positive half cycle and is clamped to 0 after
    let v_int = q.integrate(|wt| vm * wt.sin(), 0.0, PI);
    let v_sq_int = q.integrate(|wt| (vm * wt.sin()).powi(2), 0.0, PI);

    let averages = Averages {
        iavg: (main_int + fw_int) / TAU,
        irms: ((main_sq_int + fw_sq_int).max(0.0) / TAU).sqrt(),
        vavg: v_int / TAU,
        vrms: (v_sq_int.max(0.0) / TAU).sqrt(),
    }
    .check_finite(Stage::Quadrature)?;

    let devices = DeviceCurrents {
        iavg: main_int / TAU,
        irms: (main_sq_int.max(0.0) / TAU).sqrt(),
        freewheel_iavg: Some(fw_int / TAU),
        freewheel_irms: Some((fw_sq_int.max(0.0) / TAU).sqrt()),
    };

    Ok((averages, devices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitParams, ControlType, WaveType};
    use approx::assert_relative_eq;

    fn quad() -> Quadrature {
        Quadrature::new(1e-10, 20)
    }

    #[test]
    fn test_integrates_polynomials_and_sines() {
        let q = quad();
        assert_relative_eq!(q.integrate(|x| x * x, 0.0, 3.0), 9.0, epsilon = 1e-12);
        assert_relative_eq!(q.integrate(f64::sin, 0.0, PI), 2.0, epsilon = 1e-9);
        assert_eq!(q.integrate(f64::sin, 1.0, 1.0), 0.0);
        assert_eq!(q.integrate(f64::sin, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_sharp_exponential() {
        // Time constant far below the panel width
        let q = quad();
        let tau = 1e-4;
        let exact = tau * (1.0 - (-1.0f64 / tau).exp());
        assert_relative_eq!(q.integrate(|x| (-x / tau).exp(), 0.0, 1.0), exact, max_relative = 1e-6);
    }

    #[test]
    fn test_resistive_half_wave_averages() {
        // R load, no back-EMF: classic Vm/π and Vm/2
        let config = CircuitParams::rle(WaveType::Half, ControlType::Uncontrolled, 100.0, 50.0, 10.0, 0.0, 0.0)
            .validate()
            .unwrap();
        let pulse = PulseCurrent::new(&config, &config.derived(), 0.0);
        let avg = pulse_averages(&quad(), &pulse, &config, 0.0, PI).unwrap();

        assert_relative_eq!(avg.vavg, 100.0 / PI, max_relative = 1e-8);
        assert_relative_eq!(avg.vrms, 50.0, max_relative = 1e-8);
        assert_relative_eq!(avg.iavg, 10.0 / PI, max_relative = 1e-8);
        assert_relative_eq!(avg.irms, 5.0, max_relative = 1e-8);
    }

    #[test]
    fn test_freewheeling_output_voltage() {
        let config = CircuitParams::freewheeling(100.0, 50.0, 10.0, 0.05).validate().unwrap();
        let current = FreewheelingCurrent::solve(&config, &config.derived()).unwrap();
        let (avg, devices) = freewheeling_averages(&quad(), &current, &config).unwrap();

        assert_relative_eq!(avg.vavg, 100.0 / PI, max_relative = 1e-8);
        assert_relative_eq!(avg.vrms, 50.0, max_relative = 1e-8);
        // Mean inductor voltage is zero, so Iavg = Vavg/R
        assert_relative_eq!(avg.iavg, avg.vavg / 10.0, max_relative = 1e-6);
        let split = devices.iavg + devices.freewheel_iavg.unwrap();
        assert_relative_eq!(split, avg.iavg, max_relative = 1e-12);
    }
}
