//! Time-domain waveforms over one source cycle.
//!
//! Every waveform is sampled on the same grid of [`WAVEFORM_POINTS`] angles
//! spanning ωt ∈ [0, 2π], which covers one output period for both half-wave
//! and full-wave circuits. Each sample is built piecewise from whichever
//! state holds at that angle: conducting, blocked or freewheeling.
//!
//! Sign conventions: device voltages are anode to cathode (negative when
//! reverse biased), currents are positive in the conducting direction.
//! In a bridge, pair 1 is devices 1 and 4 (conducting on the positive half
//! cycle), pair 2 is devices 2 and 3. Bridge circuits report the
//! per-device voltages `vd1`..`vd4` in place of the single `vd`.

use std::f64::consts::{PI, TAU};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::analysis::FourierSeries;
use crate::circuit::{CircuitConfig, WaveType};
use crate::solver::{CurrentModel, FreewheelingCurrent, PulseCurrent, SolvedAngles};
use crate::WAVEFORM_POINTS;

/// Physical quantity carried by a waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Source voltage
    Vs,
    /// Output (load) voltage
    Vo,
    /// Switch voltage, half-wave circuits
    Vd,
    /// Freewheeling diode voltage
    VdFw,
    /// Load current
    IOut,
    /// Source-side diode current, freewheeling load
    ISource,
    /// Freewheeling diode current
    IFw,
    Id1,
    Id2,
    Id3,
    Id4,
    Vd1,
    Vd2,
    Vd3,
    Vd4,
    /// Inductor voltage
    Vl,
    /// Resistor voltage
    Vr,
}

impl Quantity {
    /// Key used when serializing.
    pub fn key(&self) -> &'static str {
        match self {
            Quantity::Vs => "vs",
            Quantity::Vo => "vo",
            Quantity::Vd => "vd",
            Quantity::VdFw => "vd_fw",
            Quantity::IOut => "i_out",
            Quantity::ISource => "i_source",
            Quantity::IFw => "i_fw",
            Quantity::Id1 => "id1",
            Quantity::Id2 => "id2",
            Quantity::Id3 => "id3",
            Quantity::Id4 => "id4",
            Quantity::Vd1 => "vd1",
            Quantity::Vd2 => "vd2",
            Quantity::Vd3 => "vd3",
            Quantity::Vd4 => "vd4",
            Quantity::Vl => "vl",
            Quantity::Vr => "vr",
        }
    }
}

/// Sampled values of one quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    quantity: Quantity,
    values: Vec<f64>,
}

impl Waveform {
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// All waveforms of one solve, sharing a common time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSet {
    /// Sample angles ωt (rad)
    time: Vec<f64>,
    series: Vec<Waveform>,
}

impl WaveformSet {
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Values of `quantity`, if this circuit produces it.
    pub fn get(&self, quantity: Quantity) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|w| w.quantity == quantity)
            .map(|w| w.values.as_slice())
    }

    /// (time, value) pairs of `quantity`.
    pub fn samples(&self, quantity: Quantity) -> Option<impl Iterator<Item = (f64, f64)> + '_> {
        self.get(quantity)
            .map(|values| self.time.iter().copied().zip(values.iter().copied()))
    }

    pub fn quantities(&self) -> impl Iterator<Item = Quantity> + '_ {
        self.series.iter().map(|w| w.quantity)
    }

    pub fn waveforms(&self) -> &[Waveform] {
        &self.series
    }

    /// Number of samples per waveform.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl Serialize for WaveformSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len() + 1))?;
        map.serialize_entry("time", &self.time)?;
        for waveform in &self.series {
            map.serialize_entry(waveform.quantity.key(), &waveform.values)?;
        }
        map.end()
    }
}

/// `points` evenly spaced angles over [0, 2π], both ends included.
pub fn sample_grid(points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = TAU / (n - 1) as f64;
            (0..n).map(|k| step * k as f64).collect()
        }
    }
}

/// Sample `row` on the standard grid, one column per quantity.
pub fn tabulate<const N: usize>(
    quantities: [Quantity; N],
    row: impl Fn(f64) -> [f64; N],
) -> WaveformSet {
    let time = sample_grid(WAVEFORM_POINTS);
    let mut columns: [Vec<f64>; N] = std::array::from_fn(|_| Vec::with_capacity(time.len()));

    for &wt in &time {
        for (column, value) in columns.iter_mut().zip(row(wt)) {
            column.push(value);
        }
    }

    let series = quantities
        .into_iter()
        .zip(columns)
        .map(|(quantity, values)| Waveform { quantity, values })
        .collect();

    WaveformSet { time, series }
}

/// Which bridge pair carries the load current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bridge {
    Idle,
    Pair1,
    Pair2,
}

/// Sample every waveform of a solved circuit.
pub fn assemble(config: &CircuitConfig, angles: &SolvedAngles, model: &CurrentModel) -> WaveformSet {
    match model {
        CurrentModel::Blocked => match config.wave_type() {
            WaveType::Half => half_wave(config, |_| None),
            WaveType::Full => bridge(config, |_| (Bridge::Idle, 0.0, 0.0)),
        },
        CurrentModel::Pulse(pulse) => match config.wave_type() {
            WaveType::Half => half_wave_pulse(config, pulse, angles),
            WaveType::Full => bridge_pulse(config, pulse, angles),
        },
        CurrentModel::Fourier(series) => bridge_continuous(config, series),
        CurrentModel::Freewheeling(current) => freewheeling(config, current),
    }
}

fn half_wave_pulse(config: &CircuitConfig, pulse: &PulseCurrent, angles: &SolvedAngles) -> WaveformSet {
    let (alpha, beta) = (angles.alpha, angles.beta);
    half_wave(config, |wt| {
        if (alpha..=beta).contains(&wt) {
            Some(pulse.at(wt))
        } else if wt <= beta - TAU {
            // Tail of the previous cycle's pulse
            Some(pulse.at(wt + TAU))
        } else {
            None
        }
    })
}

/// Single switch in series with the RLE load. `current` is `None` while blocked.
fn half_wave(config: &CircuitConfig, current: impl Fn(f64) -> Option<f64>) -> WaveformSet {
    let vm = config.vm();
    let r = config.resistance();
    let vdc = config.vdc();

    tabulate(
        [Quantity::Vs, Quantity::Vo, Quantity::Vd, Quantity::IOut, Quantity::Vl, Quantity::Vr],
        |wt| {
            let vs = vm * wt.sin();
            match current(wt) {
                Some(i) => [vs, vs, 0.0, i, vs - r * i - vdc, r * i],
                None => [vs, vdc, vs - vdc, 0.0, 0.0, 0.0],
            }
        },
    )
}

fn bridge_pulse(config: &CircuitConfig, pulse: &PulseCurrent, angles: &SolvedAngles) -> WaveformSet {
    let (alpha, beta) = (angles.alpha, angles.beta);
    let r = config.resistance();
    let vdc = config.vdc();
    let vm = config.vm();

    bridge(config, move |wt| {
        let (pair, i) = if (alpha..=beta).contains(&wt) {
            (Bridge::Pair1, pulse.at(wt))
        } else if (PI + alpha..=PI + beta).contains(&wt) {
            (Bridge::Pair2, pulse.at(wt - PI))
        } else if wt <= beta - PI {
            // Pair 2 pulse carried over from the previous cycle
            (Bridge::Pair2, pulse.at(wt + PI))
        } else {
            return (Bridge::Idle, 0.0, 0.0);
        };
        let vo = match pair {
            Bridge::Pair2 => -vm * wt.sin(),
            _ => vm * wt.sin(),
        };
        (pair, i, vo - r * i - vdc)
    })
}

fn bridge_continuous(config: &CircuitConfig, series: &FourierSeries) -> WaveformSet {
    let origin = series.origin();
    bridge(config, |wt| {
        let pair = if (wt - origin).rem_euclid(TAU) < PI {
            Bridge::Pair1
        } else {
            Bridge::Pair2
        };
        (pair, series.current_at(wt), series.inductor_voltage(wt))
    })
}

/// Four-device bridge. `state` yields the conducting pair, load current and
/// inductor voltage at each angle.
fn bridge(config: &CircuitConfig, state: impl Fn(f64) -> (Bridge, f64, f64)) -> WaveformSet {
    let vm = config.vm();
    let r = config.resistance();
    let vdc = config.vdc();

    tabulate(
        [
            Quantity::Vs,
            Quantity::Vo,
            Quantity::IOut,
            Quantity::Id1,
            Quantity::Id2,
            Quantity::Id3,
            Quantity::Id4,
            Quantity::Vd1,
            Quantity::Vd2,
            Quantity::Vd3,
            Quantity::Vd4,
            Quantity::Vl,
            Quantity::Vr,
        ],
        |wt| {
            let vs = vm * wt.sin();
            let (pair, i, vl) = state(wt);
            let vo = match pair {
                Bridge::Idle => vdc,
                Bridge::Pair1 => vs,
                Bridge::Pair2 => -vs,
            };
            let i1 = if pair == Bridge::Pair1 { i } else { 0.0 };
            let i2 = if pair == Bridge::Pair2 { i } else { 0.0 };
            // Each off device blocks half of the difference between source and output
            let vd1 = (vs - vo) / 2.0;
            let vd2 = (-vs - vo) / 2.0;
            [vs, vo, i, i1, i2, i2, i1, vd1, vd2, vd2, vd1, vl, r * i]
        },
    )
}

fn freewheeling(config: &CircuitConfig, current: &FreewheelingCurrent) -> WaveformSet {
    let vm = config.vm();
    let r = config.resistance();

    tabulate(
        [
            Quantity::Vs,
            Quantity::Vo,
            Quantity::Vd,
            Quantity::VdFw,
            Quantity::IOut,
            Quantity::ISource,
            Quantity::IFw,
            Quantity::Vl,
            Quantity::Vr,
        ],
        |wt| {
            let vs = vm * wt.sin();
            let i = current.at(wt);
            let on_source = wt.rem_euclid(TAU) < PI;
            let vo = if on_source { vs } else { 0.0 };
            let (i_source, i_fw) = if on_source { (i, 0.0) } else { (0.0, i) };
            [vs, vo, vs - vo, -vo, i, i_source, i_fw, vo - r * i, r * i]
        },
    )
}
