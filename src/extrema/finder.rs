//! # Local-extremum search on a sampled series
//!
//! [`ExtremaFinder`] locates the interior local maxima of a [`TimeSeries`] and optionally
//! refines them below the sampling resolution.
//!
//! ## Algorithm
//!
//! 1. **Candidates** – indices `i` with `v[i] > v[i-1]` and `v[i] > v[i+1]`, where the
//!    neighbours of the first and last samples wrap around. Candidates at the first or
//!    last index are edge artifacts and are discarded.
//! 2. **Approximate mode** – the sampled values and times at the candidates are returned.
//! 3. **Refined mode** – an interpolating spline is fitted through the *negated* series.
//!    Each candidate is a sampled minimum of that spline, bracketed by its two
//!    neighbours `(t[i-1], t[i], t[i+1])`; a bracketed 1-D minimization (or a root
//!    search on the spline derivative) returns the refined time, and the refined value
//!    is minus the spline at that time.
//!
//! Minima are found by running the finder on a negated series (see
//! [`crate::orbit::apsides`]).
use log::debug;
use roots::{find_root_brent, SimpleConvergency};

use crate::apsis_errors::ApsisError;
use crate::constants::MIN_SAMPLES_FINDER;
use crate::extrema::minimize::{brent, golden_section};
use crate::extrema::spline::InterpolatingSpline;
use crate::extrema::time_series::TimeSeries;
use crate::extrema::{ExtremaParams, ExtremaSeries, RefineMethod};

/// Indices of the strict local extrema of `values` selected by `better`, with
/// wrap-around neighbours at both ends.
///
/// `better(a, b)` must return `true` when `a` beats its neighbour `b`
/// (`>` for maxima, `<` for minima).
pub fn relative_extrema_wrap(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .filter(|&i| {
            let prev = values[(i + n - 1) % n];
            let next = values[(i + 1) % n];
            better(values[i], prev) && better(values[i], next)
        })
        .collect()
}

/// Interior strict local maxima of `values` (first and last index excluded).
pub fn interior_maxima(values: &[f64]) -> Vec<usize> {
    strip_edges(relative_extrema_wrap(values, |a, b| a > b), values.len())
}

/// Interior strict local minima of `values` (first and last index excluded).
pub fn interior_minima(values: &[f64]) -> Vec<usize> {
    strip_edges(relative_extrema_wrap(values, |a, b| a < b), values.len())
}

fn strip_edges(mut ix: Vec<usize>, n: usize) -> Vec<usize> {
    ix.retain(|&i| i != 0 && i + 1 != n);
    ix
}

/// Finds interior local maxima of a series with the options of an [`ExtremaParams`].
#[derive(Debug, Clone, Copy)]
pub struct ExtremaFinder<'p> {
    params: &'p ExtremaParams,
}

impl<'p> ExtremaFinder<'p> {
    pub fn new(params: &'p ExtremaParams) -> Self {
        ExtremaFinder { params }
    }

    /// Locate every interior local maximum of `series`.
    ///
    /// Arguments
    /// -----------------
    /// * `series`: at least 3 samples on a strictly increasing time grid (4 for the
    ///   cubic refinement).
    ///
    /// Return
    /// ----------
    /// * An [`ExtremaSeries`] with one `(value, time)` pair per maximum, in time order.
    ///   It is empty when the series has no interior maximum.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::InsufficientSamples`] for too short series.
    /// * [`ApsisError::NonMonotonicTime`] if the time grid is not strictly increasing.
    /// * [`ApsisError::RootFindingError`] if [`RefineMethod::DerivativeRoot`] cannot
    ///   bracket a zero of the spline derivative.
    pub fn find(&self, series: &TimeSeries<'_>) -> Result<ExtremaSeries, ApsisError> {
        if series.len() < MIN_SAMPLES_FINDER {
            return Err(ApsisError::InsufficientSamples {
                needed: MIN_SAMPLES_FINDER,
                found: series.len(),
            });
        }
        series.ensure_increasing()?;

        let values = series.values();
        let t = series.times();
        let ix = interior_maxima(values);

        if ix.is_empty() {
            debug!("no interior maximum among {} samples", values.len());
            return Ok(ExtremaSeries::default());
        }

        if self.params.approximate {
            return Ok(ExtremaSeries {
                values: ix.iter().map(|&i| values[i]).collect(),
                times: ix.iter().map(|&i| t[i]).collect(),
            });
        }

        // maxima of the series are minima of the negated spline
        let spline = InterpolatingSpline::fit(
            &series.negated(),
            self.params.spline_degree,
            self.params.boundary,
        )?;

        let times = ix
            .iter()
            .map(|&i| self.refine(&spline, t[i - 1], t[i], t[i + 1]))
            .collect::<Result<Vec<f64>, ApsisError>>()?;
        let values = times.iter().map(|&ti| -spline.eval(ti)).collect();

        Ok(ExtremaSeries { values, times })
    }

    fn refine(
        &self,
        spline: &InterpolatingSpline,
        lo: f64,
        seed: f64,
        hi: f64,
    ) -> Result<f64, ApsisError> {
        let xtol = self.params.xtol;
        let max_iter = self.params.max_iter;
        let f = |x: f64| spline.eval(x);

        match self.params.refine_method {
            RefineMethod::Brent => {
                let m = brent(f, lo, seed, hi, xtol, max_iter);
                if !m.converged {
                    debug!("Brent refinement stopped after {} iterations", m.iterations);
                }
                Ok(m.x)
            }
            RefineMethod::GoldenSection => Ok(golden_section(f, lo, seed, hi, xtol, max_iter).x),
            RefineMethod::DerivativeRoot => {
                let df = |x: f64| spline.derivative(x);
                let mut convergency = SimpleConvergency {
                    eps: xtol * seed.abs().max(1.0),
                    max_iter,
                };
                Ok(find_root_brent(lo, hi, &df, &mut convergency)?)
            }
        }
    }
}
