//! Solver interface.

use std::f64::consts::PI;

use crate::analysis::{
    freewheeling_averages, pulse_averages, DeviceCurrents, FourierSeries, PerformanceMetrics, Quadrature,
};
use crate::circuit::{CircuitConfig, CircuitParams, DerivedConstants, LoadType};
use crate::error::Result;
use crate::waveform;

use super::angles::{can_conduct, extinction_angle, firing_angle, SolvedAngles};
use super::conduction::{classify, ConductionMode};
use super::current::{CurrentModel, FreewheelingCurrent, PulseCurrent};
use super::result::SolveResult;
use super::roots::ExtinctionSearch;
use super::{
    DEFAULT_HARMONICS, MAX_ITERATIONS, QUADRATURE_MAX_DEPTH, QUADRATURE_TOLERANCE, ROOT_TOLERANCE,
    SCAN_SUBDIVISIONS,
};

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Number of even harmonics used for continuous conduction.
    pub harmonics: usize,
    /// Extinction-angle bracket width at which bisection stops (rad).
    pub root_tolerance: f64,
    /// Maximum bisection iterations.
    pub max_iterations: usize,
    /// Scan steps used to bracket the extinction angle.
    pub scan_subdivisions: usize,
    /// Relative error target of the quadrature.
    pub quadrature_tolerance: f64,
    /// Maximum quadrature refinement depth.
    pub quadrature_max_depth: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            harmonics: DEFAULT_HARMONICS,
            root_tolerance: ROOT_TOLERANCE,
            max_iterations: MAX_ITERATIONS,
            scan_subdivisions: SCAN_SUBDIVISIONS,
            quadrature_tolerance: QUADRATURE_TOLERANCE,
            quadrature_max_depth: QUADRATURE_MAX_DEPTH,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of even harmonics (n = 2, 4, ..., 2·count).
    ///
    /// The mean-square current dropped by truncating at order n_max is bounded
    /// in [`crate::analysis::fourier`].
    pub fn with_harmonics(mut self, harmonics: usize) -> Self {
        self.harmonics = harmonics;
        self
    }

    /// Set the extinction-angle tolerance (rad).
    pub fn with_root_tolerance(mut self, tolerance: f64) -> Self {
        self.root_tolerance = tolerance;
        self
    }

    /// Set the maximum bisection iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the number of scan steps used to bracket β.
    ///
    /// Pulses shorter than 2π/subdivisions can be missed.
    pub fn with_scan_subdivisions(mut self, subdivisions: usize) -> Self {
        self.scan_subdivisions = subdivisions;
        self
    }

    /// Set the relative quadrature tolerance.
    pub fn with_quadrature_tolerance(mut self, tolerance: f64) -> Self {
        self.quadrature_tolerance = tolerance;
        self
    }

    /// Set the maximum quadrature refinement depth.
    pub fn with_quadrature_max_depth(mut self, depth: u32) -> Self {
        self.quadrature_max_depth = depth;
        self
    }

    fn extinction_search(&self) -> ExtinctionSearch {
        ExtinctionSearch {
            subdivisions: self.scan_subdivisions,
            max_iterations: self.max_iterations,
            tolerance: self.root_tolerance,
        }
    }

    fn quadrature(&self) -> Quadrature {
        Quadrature::new(self.quadrature_tolerance, self.quadrature_max_depth)
    }
}

/// The rectifier solver.
///
/// Holds only configuration; every call to [`Solver::solve`] works on its
/// own local state, so one solver can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validate raw parameters and solve.
    pub fn solve_params(&self, params: &CircuitParams) -> Result<SolveResult> {
        self.solve(&params.validate()?)
    }

    /// Solve one circuit.
    pub fn solve(&self, circuit: &CircuitConfig) -> Result<SolveResult> {
        let span = tracing::debug_span!(
            "solve",
            wave = %circuit.wave_type(),
            control = %circuit.control_type(),
            load = %circuit.load_type(),
        );
        let _enter = span.enter();

        match circuit.load_type() {
            LoadType::Rle => self.solve_rle(circuit),
            LoadType::RlFwd => self.solve_freewheeling(circuit),
        }
    }

    fn solve_rle(&self, circuit: &CircuitConfig) -> Result<SolveResult> {
        let derived = circuit.derived();
        let alpha = firing_angle(circuit);

        if !can_conduct(circuit, alpha) {
            return Ok(self.blocked(circuit, &derived, alpha));
        }

        let pulse = PulseCurrent::new(circuit, &derived, alpha);
        let beta = extinction_angle(&pulse, &self.config.extinction_search())?;
        let angles = SolvedAngles::new(alpha, beta, pulse.integration_constant()?, None, derived.omega);

        let class = classify(circuit.wave_type(), circuit.control_type(), alpha, beta);
        tracing::debug!(alpha, beta, a = angles.a, mode = %class.mode, "conduction interval solved");

        let (averages, harmonics, model) = match class.mode {
            ConductionMode::Discontinuous => {
                let averages = pulse_averages(&self.config.quadrature(), &pulse, circuit, alpha, beta)?;
                (averages, None, CurrentModel::Pulse(pulse))
            }
            ConductionMode::Continuous => {
                let series = FourierSeries::synthesize(circuit, &derived, alpha, self.config.harmonics)?;
                let averages = series.averages()?;
                (averages, Some(series.harmonics.clone()), CurrentModel::Fourier(series))
            }
        };

        let performance = PerformanceMetrics::assemble(&averages, circuit)?;
        let devices = DeviceCurrents::for_switches(circuit.wave_type(), &averages);

        Ok(SolveResult {
            parameters: angles,
            performance,
            devices,
            mode: class.mode,
            near_mode_boundary: class.near_boundary,
            harmonics,
            waveforms: waveform::assemble(circuit, &angles, &model),
        })
    }

    fn solve_freewheeling(&self, circuit: &CircuitConfig) -> Result<SolveResult> {
        let derived = circuit.derived();
        let current = FreewheelingCurrent::solve(circuit, &derived)?;
        tracing::debug!(a = current.a(), b = current.b(), "freewheeling constants solved");

        // The source-side diode conducts for the whole positive half cycle
        let angles = SolvedAngles::new(0.0, PI, current.a(), Some(current.b()), derived.omega);
        let class = classify(circuit.wave_type(), circuit.control_type(), angles.alpha, angles.beta);

        let (averages, devices) = freewheeling_averages(&self.config.quadrature(), &current, circuit)?;
        let performance = PerformanceMetrics::assemble(&averages, circuit)?;

        Ok(SolveResult {
            parameters: angles,
            performance,
            devices,
            mode: class.mode,
            near_mode_boundary: class.near_boundary,
            harmonics: None,
            waveforms: waveform::assemble(circuit, &angles, &CurrentModel::Freewheeling(current)),
        })
    }

    /// Result for a switch that is never forward biased.
    fn blocked(&self, circuit: &CircuitConfig, derived: &DerivedConstants, alpha: f64) -> SolveResult {
        tracing::warn!(
            alpha,
            vm = circuit.vm(),
            vdc = circuit.vdc(),
            "source never exceeds back-EMF at the firing angle, no conduction"
        );

        let angles = SolvedAngles::new(alpha, alpha, 0.0, None, derived.omega);
        SolveResult {
            parameters: angles,
            performance: PerformanceMetrics::blocked(circuit.vdc()),
            devices: DeviceCurrents::none(),
            mode: ConductionMode::Discontinuous,
            near_mode_boundary: false,
            harmonics: None,
            waveforms: waveform::assemble(circuit, &angles, &CurrentModel::Blocked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ControlType, WaveType};
    use crate::error::{RectifierError, Stage};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    fn rle(wave: WaveType, control: ControlType, l: f64, vdc: f64) -> CircuitParams {
        CircuitParams::rle(wave, control, 100.0, 50.0, 10.0, l, vdc)
    }

    #[test]
    fn test_half_wave_rle_scenario() {
        let params = rle(WaveType::Half, ControlType::Uncontrolled, 0.01, 20.0);
        let result = Solver::new().solve_params(&params).unwrap();
        let p = &result.parameters;

        assert_relative_eq!(p.alpha, 0.2f64.asin(), epsilon = 1e-12);
        assert_abs_diff_eq!(p.alpha, 0.2014, epsilon = 1e-4);
        assert!(p.beta > p.alpha && p.beta < p.alpha + 2.0 * PI);
        assert!(result.performance.iavg > 0.0);
        assert!(result.performance.vavg > 0.0);
        assert_eq!(result.mode, ConductionMode::Discontinuous);
        assert!(result.harmonics.is_none());
    }

    #[test]
    fn test_back_emf_above_peak_is_blocked() {
        let params = rle(WaveType::Half, ControlType::Controlled, 0.01, 120.0).with_firing_angle(0.5);
        let result = Solver::new().solve_params(&params).unwrap();

        assert_abs_diff_eq!(result.parameters.alpha, FRAC_PI_2, epsilon = 1e-15);
        assert_eq!(result.parameters.beta, result.parameters.alpha);
        assert!(!result.conducts());
        assert_eq!(result.performance.vavg, 120.0);
        assert_eq!(result.performance.irms, 0.0);
    }

    #[test]
    fn test_controlled_half_wave_uses_requested_angle() {
        let params = rle(WaveType::Half, ControlType::Controlled, 0.02, 10.0).with_firing_angle(1.0);
        let result = Solver::new().solve_params(&params).unwrap();
        assert_eq!(result.parameters.alpha, 1.0);
        assert!(result.performance.iavg > 0.0);
    }

    #[test]
    fn test_full_wave_continuous_uses_harmonics() {
        let params = rle(WaveType::Full, ControlType::Uncontrolled, 0.1, 0.0);
        let result = Solver::new().solve_params(&params).unwrap();

        assert_eq!(result.mode, ConductionMode::Continuous);
        let harmonics = result.harmonics.as_ref().unwrap();
        assert_eq!(harmonics.len(), DEFAULT_HARMONICS);
        assert_relative_eq!(result.performance.vavg, 200.0 / PI, epsilon = 1e-12);
        assert_relative_eq!(result.devices.iavg, result.performance.iavg / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_wave_discontinuous() {
        let params = rle(WaveType::Full, ControlType::Uncontrolled, 0.01, 50.0);
        let result = Solver::new().solve_params(&params).unwrap();
        assert_eq!(result.mode, ConductionMode::Discontinuous);
        assert!(result.parameters.beta < PI);
        // Idle output sits at the back-EMF, pulses sit above it
        assert!(result.performance.vavg > 50.0);
    }

    #[test]
    fn test_harmonic_count_configurable() {
        let solver = Solver::with_config(SolverConfig::new().with_harmonics(4));
        let params = rle(WaveType::Full, ControlType::Uncontrolled, 0.1, 0.0);
        let result = solver.solve_params(&params).unwrap();
        assert_eq!(result.harmonics.unwrap().len(), 4);
    }

    #[test]
    fn test_freewheeling_reports_both_constants() {
        let params = CircuitParams::freewheeling(100.0, 50.0, 10.0, 0.05);
        let result = Solver::new().solve_params(&params).unwrap();

        assert_eq!(result.parameters.alpha, 0.0);
        assert_eq!(result.parameters.beta, PI);
        let b = result.parameters.b.unwrap();
        assert_relative_eq!(result.parameters.a, b, epsilon = 1e-10);
        assert!(result.devices.freewheel_irms.unwrap() > 0.0);
        // No back-EMF: all power is dissipated in R
        let perf = &result.performance;
        assert_relative_eq!(perf.power, perf.irms * perf.irms * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_params_propagate() {
        let params = rle(WaveType::Half, ControlType::Uncontrolled, 0.01, 0.0);
        let bad = CircuitParams { r: 0.0, ..params };
        let err = Solver::new().solve_params(&bad).unwrap_err();
        assert!(matches!(err, RectifierError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_overflowing_integration_constant_is_an_error() {
        // ωτ ≈ 3.1e-3, so e^(α/ωτ) overflows at α = 2.5
        let params = rle(WaveType::Half, ControlType::Controlled, 1e-4, 0.0).with_firing_angle(2.5);
        let err = Solver::new().solve_params(&params).unwrap_err();

        assert!(matches!(err, RectifierError::NonFinite { quantity: "A", .. }));
        assert_eq!(err.stage(), Stage::AngleSolve);
    }

    #[test]
    fn test_resistive_load_reports_zero_constant() {
        let params = rle(WaveType::Half, ControlType::Controlled, 0.0, 0.0).with_firing_angle(2.5);
        let result = Solver::new().solve_params(&params).unwrap();
        assert_eq!(result.parameters.a, 0.0);
        assert!(result.performance.iavg > 0.0);
    }

    #[test]
    fn test_ripple_form_identity() {
        let params = rle(WaveType::Half, ControlType::Uncontrolled, 0.05, 10.0);
        let m = Solver::new().solve_params(&params).unwrap().performance;
        assert_relative_eq!(m.ripple_factor.powi(2) + 1.0, m.form_factor.powi(2), epsilon = 1e-9);
    }
}
