//! Circuit configuration selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RectifierError;

/// Number of rectified pulses per source cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveType {
    /// Single switch, one pulse per cycle (period 2π)
    #[serde(alias = "half_wave")]
    Half,
    /// Bridge, two pulses per cycle (output period π)
    #[serde(alias = "full_wave")]
    Full,
}

impl WaveType {
    /// Output period in radians of ωt.
    pub fn period(&self) -> f64 {
        match self {
            WaveType::Half => 2.0 * std::f64::consts::PI,
            WaveType::Full => std::f64::consts::PI,
        }
    }
}

/// Diodes (uncontrolled) or thyristors fired at a set angle (controlled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Controlled,
    Uncontrolled,
}

/// Load topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// Series resistor, inductor and back-EMF source
    #[serde(rename = "rle", alias = "RLE")]
    Rle,
    /// Series resistor and inductor with a freewheeling diode across them
    #[serde(rename = "rl_fwd", alias = "RL_FWD", alias = "fwd")]
    RlFwd,
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveType::Half => write!(f, "half"),
            WaveType::Full => write!(f, "full"),
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlType::Controlled => write!(f, "controlled"),
            ControlType::Uncontrolled => write!(f, "uncontrolled"),
        }
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadType::Rle => write!(f, "rle"),
            LoadType::RlFwd => write!(f, "rl_fwd"),
        }
    }
}

impl FromStr for WaveType {
    type Err = RectifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "half" | "half_wave" | "hw" => Ok(WaveType::Half),
            "full" | "full_wave" | "fw" => Ok(WaveType::Full),
            other => Err(RectifierError::invalid(format!("unknown wave type '{other}'"))),
        }
    }
}

impl FromStr for ControlType {
    type Err = RectifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "controlled" => Ok(ControlType::Controlled),
            "uncontrolled" => Ok(ControlType::Uncontrolled),
            other => Err(RectifierError::invalid(format!("unknown control type '{other}'"))),
        }
    }
}

impl FromStr for LoadType {
    type Err = RectifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rle" => Ok(LoadType::Rle),
            "rl_fwd" | "fwd" => Ok(LoadType::RlFwd),
            other => Err(RectifierError::invalid(format!("unknown load type '{other}'"))),
        }
    }
}
