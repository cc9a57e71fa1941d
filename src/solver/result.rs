//! Output of one solve.

use serde::Serialize;

use crate::analysis::{DeviceCurrents, Harmonic, PerformanceMetrics};
use crate::waveform::WaveformSet;

use super::angles::SolvedAngles;
use super::conduction::ConductionMode;

/// Everything a solve produces. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub parameters: SolvedAngles,
    pub performance: PerformanceMetrics,
    pub devices: DeviceCurrents,
    pub mode: ConductionMode,
    /// β within the boundary tolerance of the mode switch
    pub near_mode_boundary: bool,
    /// Harmonic table, continuous conduction only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonics: Option<Vec<Harmonic>>,
    pub waveforms: WaveformSet,
}

impl SolveResult {
    pub fn is_continuous(&self) -> bool {
        self.mode == ConductionMode::Continuous
    }

    /// Whether any current flows at all.
    pub fn conducts(&self) -> bool {
        self.parameters.conducting_angle > 0.0
    }
}
