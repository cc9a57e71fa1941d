//! Bracketed root search for the extinction angle.

use super::{MAX_ITERATIONS, ROOT_TOLERANCE, SCAN_SUBDIVISIONS};

/// A located zero crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Position of the crossing
    pub x: f64,
    /// Bisection iterations spent refining it
    pub iterations: usize,
}

/// First-crossing search: a uniform scan to bracket the first sign change,
/// then bisection inside the bracket.
///
/// The function is assumed positive just after `start` (the current has
/// just started flowing); the scan looks for the first sample at or below
/// zero. Later crossings are never considered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtinctionSearch {
    /// Number of scan steps across the search span
    pub subdivisions: usize,
    /// Maximum bisection iterations
    pub max_iterations: usize,
    /// Bracket width at which bisection stops (rad)
    pub tolerance: f64,
}

impl Default for ExtinctionSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtinctionSearch {
    pub fn new() -> Self {
        Self {
            subdivisions: SCAN_SUBDIVISIONS,
            max_iterations: MAX_ITERATIONS,
            tolerance: ROOT_TOLERANCE,
        }
    }

    /// Find the first zero of `f` in `(start, start + span]`.
    ///
    /// Returns `None` when no sample in the span is non-positive.
    pub fn first_zero<F: Fn(f64) -> f64>(&self, f: F, start: f64, span: f64) -> Option<Root> {
        let steps = self.subdivisions.max(1);
        let h = span / steps as f64;

        let mut lo = start;
        for k in 1..=steps {
            let x = start + h * k as f64;
            if f(x) <= 0.0 {
                return Some(self.bisect(&f, lo, x));
            }
            lo = x;
        }

        None
    }

    /// Refine a bracket where `f(lo) > 0` (or `lo` is the pulse start) and `f(hi) <= 0`.
    fn bisect<F: Fn(f64) -> f64>(&self, f: &F, mut lo: f64, mut hi: f64) -> Root {
        let mut iterations = 0;
        while iterations < self.max_iterations && hi - lo > self.tolerance {
            let mid = 0.5 * (lo + hi);
            if f(mid) > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
            iterations += 1;
        }

        Root {
            x: 0.5 * (lo + hi),
            iterations,
        }
    }
}
