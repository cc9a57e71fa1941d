//! WASM bindings for Rectifier Core.
//!
//! Parameters go in and results come out as JSON strings, using the same
//! field names as the CLI.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmRectifierSolver } from 'rectifier_core';
//!
//! await init();
//!
//! const solver = new WasmRectifierSolver();
//! const result = JSON.parse(solver.solve(JSON.stringify({
//!   wave_type: 'full', control_type: 'controlled', load_type: 'rle',
//!   Vm: 169.7, f: 60, R: 10, L: 0.05, Vdc: 40, firing_angle: 0.5236,
//! })));
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::CircuitParams;
use crate::output::{self, OutputOptions};
use crate::solver::{Solver, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible rectifier solver.
///
/// Wraps the native [`Solver`]. Errors are thrown as the JSON string
/// `{"error": ..., "stage": ...}`.
#[wasm_bindgen]
pub struct WasmRectifierSolver {
    solver: Solver,
}

#[wasm_bindgen]
impl WasmRectifierSolver {
    /// Create a solver with the default harmonic count.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmRectifierSolver {
        WasmRectifierSolver {
            solver: Solver::new(),
        }
    }

    /// Create a solver using `harmonics` even harmonics for continuous conduction.
    #[wasm_bindgen]
    pub fn with_harmonics(harmonics: usize) -> WasmRectifierSolver {
        WasmRectifierSolver {
            solver: Solver::with_config(SolverConfig::new().with_harmonics(harmonics)),
        }
    }

    /// Solve a circuit given as a JSON parameter object.
    ///
    /// # Arguments
    /// * `params_json` - Circuit parameters (see `CircuitParams`)
    /// * `include_waveforms` - Whether to return sampled waveforms
    #[wasm_bindgen]
    pub fn solve(&self, params_json: &str, include_waveforms: bool) -> Result<String, JsValue> {
        let result = serde_json::from_str::<CircuitParams>(params_json)
            .map_err(Into::into)
            .and_then(|params| self.solver.solve_params(&params))
            .and_then(|result| {
                let options = OutputOptions {
                    pretty: false,
                    waveforms: include_waveforms,
                };
                output::render_result(&result, options)
            });

        result.map_err(|e| JsValue::from_str(&output::render_error(&e)))
    }

    /// Number of even harmonics used for continuous conduction.
    #[wasm_bindgen(getter)]
    pub fn harmonics(&self) -> usize {
        self.solver.config().harmonics
    }
}

impl Default for WasmRectifierSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the number of samples per waveform.
#[wasm_bindgen]
pub fn waveform_points() -> usize {
    crate::WAVEFORM_POINTS
}
