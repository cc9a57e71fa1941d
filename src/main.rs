//! Rectify - single-phase rectifier solver
//!
//! Solves one rectifier circuit and prints the result as JSON on stdout.
//! Logs go to stderr, filtered by `RUST_LOG`.
//!
//! # Usage
//!
//! ```bash
//! rectify --wave full --control controlled --firing-deg 30 --vrms 120 \
//!     --frequency 60 --resistance 10 --inductance 0.05 --vdc 40 --pretty
//! rectify --params circuit.json --no-waveforms
//! ```

use std::f64::consts::SQRT_2;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rectifier_core::{
    error::Result,
    output::{self, OutputOptions},
    solver::DEFAULT_HARMONICS,
    CircuitParams, ControlType, LoadType, RectifierError, Solver, SolverConfig, WaveType,
};
use tracing_subscriber::EnvFilter;

/// Single-phase rectifier circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read circuit parameters from a JSON file instead of flags
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Rectifier topology (half, full)
    #[arg(long, default_value = "half")]
    wave: WaveType,

    /// Switch type (controlled, uncontrolled)
    #[arg(long, default_value = "uncontrolled")]
    control: ControlType,

    /// Load (rle, rl_fwd)
    #[arg(long, default_value = "rle")]
    load: LoadType,

    /// Peak source voltage (V)
    #[arg(long, conflicts_with = "vrms")]
    vm: Option<f64>,

    /// RMS source voltage (V)
    #[arg(long)]
    vrms: Option<f64>,

    /// Source frequency (Hz)
    #[arg(short, long, default_value_t = 50.0)]
    frequency: f64,

    /// Load resistance (Ω)
    #[arg(short, long, required_unless_present = "params")]
    resistance: Option<f64>,

    /// Load inductance (H)
    #[arg(short = 'l', long, default_value_t = 0.0)]
    inductance: f64,

    /// Back-EMF (V)
    #[arg(long, default_value_t = 0.0)]
    vdc: f64,

    /// Firing angle (rad)
    #[arg(long, conflicts_with = "firing_deg")]
    firing_angle: Option<f64>,

    /// Firing angle (degrees)
    #[arg(long)]
    firing_deg: Option<f64>,

    /// Even harmonics used for continuous conduction
    #[arg(long, default_value_t = DEFAULT_HARMONICS)]
    harmonics: usize,

    /// Omit sampled waveforms from the output
    #[arg(long)]
    no_waveforms: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

impl Args {
    /// Assemble parameters from flags, normalizing RMS voltage and degrees.
    fn circuit_params(&self) -> Result<CircuitParams> {
        let vm = match (self.vm, self.vrms) {
            (Some(vm), _) => vm,
            (None, Some(vrms)) => vrms * SQRT_2,
            (None, None) => return Err(RectifierError::invalid("one of --vm or --vrms is required")),
        };
        let resistance = self
            .resistance
            .ok_or_else(|| RectifierError::invalid("--resistance is required"))?;

        Ok(CircuitParams {
            wave_type: self.wave,
            control_type: self.control,
            load_type: self.load,
            vm,
            f: self.frequency,
            r: resistance,
            l: self.inductance,
            vdc: self.vdc,
            firing_angle: self.firing_angle.or(self.firing_deg.map(f64::to_radians)),
        })
    }
}

fn read_params(path: &Path) -> Result<CircuitParams> {
    let text = fs::read_to_string(path).map_err(|source| RectifierError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn run(args: &Args) -> Result<()> {
    let params = match &args.params {
        Some(path) => read_params(path)?,
        None => args.circuit_params()?,
    };
    tracing::debug!(?params, "parameters loaded");

    let solver = Solver::with_config(SolverConfig::new().with_harmonics(args.harmonics));
    let result = solver.solve_params(&params)?;

    let options = OutputOptions {
        pretty: args.pretty,
        waveforms: !args.no_waveforms,
    };
    output::write_stdout(&output::render_result(&result, options)?)
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(stage = %err.stage(), "{err}");
            if let Err(write_err) = output::write_stdout(&output::render_error(&err)) {
                eprintln!("{write_err}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rms_voltage_and_degrees() {
        let args = Args::try_parse_from([
            "rectify", "--wave", "full", "--control", "controlled", "--vrms", "120", "--resistance", "10",
            "--firing-deg", "30",
        ])
        .unwrap();
        let params = args.circuit_params().unwrap();

        assert_eq!(params.wave_type, WaveType::Full);
        assert_relative_eq!(params.vm, 120.0 * SQRT_2);
        assert_relative_eq!(params.firing_angle.unwrap(), std::f64::consts::FRAC_PI_6, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_source_voltage() {
        let args = Args::try_parse_from(["rectify", "--resistance", "10"]).unwrap();
        assert!(args.circuit_params().is_err());
    }

    #[test]
    fn test_conflicting_voltage_flags() {
        let parsed = Args::try_parse_from(["rectify", "--vm", "100", "--vrms", "70", "--resistance", "10"]);
        assert!(parsed.is_err());
    }
}
