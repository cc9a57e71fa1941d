//! JSON rendering of solve results and errors.
//!
//! Results serialize through their `serde` derives; errors become
//! `{"error": <message>, "stage": <stage>}` so callers can tell a rejected
//! input from a numerical failure.

use std::io::{self, Write};

use serde_json::json;

use crate::error::{RectifierError, Result};
use crate::solver::SolveResult;

/// How a result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Indent the JSON
    pub pretty: bool,
    /// Include the sampled waveforms
    pub waveforms: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            waveforms: true,
        }
    }
}

/// Render a result as JSON.
pub fn render_result(result: &SolveResult, options: OutputOptions) -> Result<String> {
    let mut value = serde_json::to_value(result)?;
    if !options.waveforms {
        if let Some(fields) = value.as_object_mut() {
            fields.remove("waveforms");
        }
    }

    let text = if options.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Render an error as JSON.
pub fn render_error(err: &RectifierError) -> String {
    json!({
        "error": err.to_string(),
        "stage": err.stage().as_str(),
    })
    .to_string()
}

/// Write one line to stdout.
pub fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "{text}")
        .and_then(|_| handle.flush())
        .map_err(|e| RectifierError::OutputError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitParams, ControlType, WaveType};
    use crate::solver::Solver;
    use serde_json::Value;

    fn solved() -> SolveResult {
        let params = CircuitParams::rle(WaveType::Half, ControlType::Uncontrolled, 100.0, 50.0, 10.0, 0.01, 20.0);
        Solver::new().solve_params(&params).unwrap()
    }

    #[test]
    fn test_result_field_names() {
        let text = render_result(&solved(), OutputOptions::default()).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();

        for key in ["alpha", "beta", "A", "conducting_angle", "conducting_time"] {
            assert!(json["parameters"].get(key).is_some(), "{key}");
        }
        assert!(json["parameters"].get("B").is_none());
        for key in ["power", "Iavg", "Irms", "Vavg", "Vrms", "power_factor", "form_factor", "ripple_factor", "efficiency"] {
            assert!(json["performance"][key].is_number(), "{key}");
        }
        assert_eq!(json["mode"], "discontinuous");
        assert!(json["waveforms"]["i_out"].is_array());
    }

    #[test]
    fn test_strip_waveforms() {
        let options = OutputOptions {
            pretty: true,
            waveforms: false,
        };
        let text = render_result(&solved(), options).unwrap();
        assert!(text.contains('\n'));
        let json: Value = serde_json::from_str(&text).unwrap();
        assert!(json.get("waveforms").is_none());
        assert!(json.get("performance").is_some());
    }

    #[test]
    fn test_error_json() {
        let err = RectifierError::invalid("R must be positive");
        let json: Value = serde_json::from_str(&render_error(&err)).unwrap();
        assert_eq!(json["stage"], "validation");
        assert!(json["error"].as_str().unwrap().contains("R must be positive"));
    }
}
