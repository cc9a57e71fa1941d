//! Waveform analysis: averages, RMS values, harmonics and performance.
//!
//! Two routes lead to the same [`Averages`]:
//!
//! - Discontinuous conduction (and the freewheeling load) integrate the
//!   closed-form current numerically ([`quadrature`]).
//! - Continuous full-wave conduction superposes even harmonics of the
//!   output voltage ([`fourier`]).
//!
//! [`PerformanceMetrics`] are then assembled identically for both.

pub mod fourier;
pub mod performance;
pub mod quadrature;

pub use fourier::{FourierSeries, Harmonic};
pub use performance::{DeviceCurrents, PerformanceMetrics};
pub use quadrature::{freewheeling_averages, pulse_averages, Averages, Quadrature};
