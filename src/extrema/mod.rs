//! # Extremum search parameters and results
//!
//! This module defines the [`ExtremaParams`] configuration struct and its builder,
//! which control how [`ExtremaFinder`](crate::extrema::finder::ExtremaFinder)
//! locates and refines the local extrema behind
//! [`pericenter`](crate::orbit::Orbit::pericenter),
//! [`apocenter`](crate::orbit::Orbit::apocenter) and [`zmax`](crate::orbit::Orbit::zmax).
//! It also defines the per-call request ([`ExtremaRequest`], [`Reduction`]) and the
//! result types ([`ExtremaSeries`], [`Extrema`]).
//!
//! ## Pipeline overview
//!
//! 1. **Candidate detection** – strict local maxima of the sampled series, edges excluded.
//! 2. **Refinement** (skipped when `approximate` is set) – spline fit through the samples
//!    (`spline_degree`, `boundary`), then a bracketed 1-D search per candidate
//!    (`refine_method`, `xtol`, `max_iter`).
//! 3. **Reduction** – per orbit, the extrema are reduced with the [`Reduction`] of the
//!    request, or returned unreduced with their times.
//!
//! ## Example
//!
//! ```rust
//! use apsis::extrema::{ExtremaParams, ExtremaRequest, Reduction, RefineMethod};
//!
//! let params = ExtremaParams::builder()
//!     .refine_method(RefineMethod::GoldenSection)
//!     .xtol(1e-10)
//!     .build()
//!     .unwrap();
//!
//! let request = ExtremaRequest::new(Reduction::Max).with_params(params);
//! assert!(request.validate().is_ok());
//! ```
//!
//! ## See also
//!
//! * [`crate::extrema::finder`] – candidate detection and refinement.
//! * [`crate::extrema::spline`] – interpolating splines.
//! * [`crate::extrema::minimize`] – bracketed minimizers.
//! * [`crate::extrema::period`] – peak-to-peak period.
use std::fmt;

use serde::Serialize;

use crate::apsis_errors::ApsisError;
use crate::constants::{REFINE_MAX_ITER, REFINE_XTOL};
use crate::units::{Quantity, QuantityArray, Unit};

pub mod finder;
pub mod minimize;
pub mod period;
pub mod spline;
pub mod time_series;

/// Polynomial degree of the interpolating spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SplineDegree {
    Linear,
    Cubic,
}

/// Behaviour of the spline outside the sampled time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Boundary {
    /// Return the boundary value.
    Clamp,
    /// Evaluate the polynomial of the end interval.
    Extrapolate,
}

/// Refinement of a sampled extremum on the spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RefineMethod {
    /// Brent's derivative-free bracketed minimization.
    Brent,
    /// Derivative-free golden-section search.
    GoldenSection,
    /// Brent root search on the spline derivative.
    DerivativeRoot,
}

/// Configuration of the extremum search.
///
/// Fields
/// -----------------
/// * `approximate` – return the sampled extrema, skipping the spline refinement.
/// * `spline_degree` – degree of the interpolating spline (cubic by default).
/// * `boundary` – spline behaviour beyond the sampled domain (clamped by default).
/// * `refine_method` – 1-D search used on the spline (Brent by default).
/// * `xtol` – relative tolerance on the refined time.
/// * `max_iter` – iteration cap of the 1-D search.
///
/// Defaults
/// -----------------
/// * `approximate`: false
/// * `spline_degree`: Cubic
/// * `boundary`: Clamp
/// * `refine_method`: Brent
/// * `xtol`: 1.48e-8
/// * `max_iter`: 500
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremaParams {
    pub approximate: bool,
    pub spline_degree: SplineDegree,
    pub boundary: Boundary,
    pub refine_method: RefineMethod,
    pub xtol: f64,
    pub max_iter: usize,
}

impl ExtremaParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`ExtremaParamsBuilder`] initialized with the defaults.
    pub fn builder() -> ExtremaParamsBuilder {
        ExtremaParamsBuilder::new()
    }

    /// Defaults with the fast, sample-resolution path.
    pub fn approximate() -> Self {
        ExtremaParams {
            approximate: true,
            ..Self::default()
        }
    }
}

impl Default for ExtremaParams {
    fn default() -> Self {
        ExtremaParams {
            approximate: false,
            spline_degree: SplineDegree::Cubic,
            boundary: Boundary::Clamp,
            refine_method: RefineMethod::Brent,
            xtol: REFINE_XTOL,
            max_iter: REFINE_MAX_ITER,
        }
    }
}

/// Builder for [`ExtremaParams`], with validation.
#[derive(Debug, Clone)]
pub struct ExtremaParamsBuilder {
    params: ExtremaParams,
}

impl Default for ExtremaParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtremaParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ExtremaParams::default(),
        }
    }

    pub fn approximate(mut self, v: bool) -> Self {
        self.params.approximate = v;
        self
    }
    pub fn spline_degree(mut self, v: SplineDegree) -> Self {
        self.params.spline_degree = v;
        self
    }
    pub fn boundary(mut self, v: Boundary) -> Self {
        self.params.boundary = v;
        self
    }
    pub fn refine_method(mut self, v: RefineMethod) -> Self {
        self.params.refine_method = v;
        self
    }
    pub fn xtol(mut self, v: f64) -> Self {
        self.params.xtol = v;
        self
    }
    pub fn max_iter(mut self, v: usize) -> Self {
        self.params.max_iter = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `xtol` finite and `> 0`.
    /// * `max_iter >= 1`.
    pub fn build(self) -> Result<ExtremaParams, ApsisError> {
        let p = &self.params;

        if !p.xtol.is_finite() || p.xtol <= 0.0 {
            return Err(ApsisError::InvalidExtremaParameter(
                "xtol must be finite and > 0".into(),
            ));
        }
        if p.max_iter == 0 {
            return Err(ApsisError::InvalidExtremaParameter(
                "max_iter must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for ExtremaParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Extrema Search Parameters")?;
            writeln!(f, "-------------------------")?;
            writeln!(f, "  approximate   = {}", self.approximate)?;
            writeln!(f, "  spline_degree = {:?}", self.spline_degree)?;
            writeln!(f, "  boundary      = {:?}", self.boundary)?;
            writeln!(f, "  refine_method = {:?}", self.refine_method)?;
            writeln!(f, "  xtol          = {:.2e}", self.xtol)?;
            writeln!(f, "  max_iter      = {}", self.max_iter)
        } else {
            write!(
                f,
                "ExtremaParams(approximate={}, spline={:?}/{:?}, method={:?}, xtol={:.1e}, max_iter={})",
                self.approximate,
                self.spline_degree,
                self.boundary,
                self.refine_method,
                self.xtol,
                self.max_iter,
            )
        }
    }
}

/// How the extrema of one orbit are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reduction {
    Mean,
    Min,
    Max,
    /// Keep every extremum with its time.
    All,
}

impl Reduction {
    /// Reduce `values` to a single number.
    ///
    /// Return
    /// ----------
    /// * `None` for [`Reduction::All`].
    /// * `Some(NaN)` for an empty slice.
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return match self {
                Reduction::All => None,
                _ => Some(f64::NAN),
            };
        }
        match self {
            Reduction::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Reduction::Min => values.iter().copied().reduce(f64::min),
            Reduction::Max => values.iter().copied().reduce(f64::max),
            Reduction::All => None,
        }
    }
}

/// Per-call options of the extremum estimators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremaRequest {
    pub reduction: Reduction,
    pub return_times: bool,
    pub params: ExtremaParams,
}

impl Default for ExtremaRequest {
    fn default() -> Self {
        ExtremaRequest::new(Reduction::Mean)
    }
}

impl ExtremaRequest {
    pub fn new(reduction: Reduction) -> Self {
        ExtremaRequest {
            reduction,
            return_times: false,
            params: ExtremaParams::default(),
        }
    }

    /// Every extremum with its time, unreduced.
    pub fn all() -> Self {
        ExtremaRequest {
            return_times: true,
            ..ExtremaRequest::new(Reduction::All)
        }
    }

    pub fn with_times(mut self, return_times: bool) -> Self {
        self.return_times = return_times;
        self
    }

    pub fn with_params(mut self, params: ExtremaParams) -> Self {
        self.params = params;
        self
    }

    pub fn approximate(mut self, v: bool) -> Self {
        self.params.approximate = v;
        self
    }

    /// Reject a reducing function combined with a request for the extremum times.
    pub fn validate(&self) -> Result<(), ApsisError> {
        if self.return_times && self.reduction != Reduction::All {
            return Err(ApsisError::ConflictingReduction);
        }
        Ok(())
    }
}

/// Extrema of one orbit: parallel values and times, in time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtremaSeries {
    pub values: Vec<f64>,
    pub times: Vec<f64>,
}

impl ExtremaSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(value, time)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied().zip(self.times.iter().copied())
    }

    pub(crate) fn negate_values(mut self) -> Self {
        self.values.iter_mut().for_each(|v| *v = -*v);
        self
    }
}

/// Result of an extremum estimator over a batch of orbits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Extrema {
    /// One reduced value per orbit.
    Reduced(QuantityArray),
    /// Every extremum of every orbit, one [`ExtremaSeries`] per orbit.
    All {
        series: Vec<ExtremaSeries>,
        unit: Unit,
        time_unit: Unit,
    },
}

impl Extrema {
    pub fn unit(&self) -> &Unit {
        match self {
            Extrema::Reduced(q) => &q.unit,
            Extrema::All { unit, .. } => unit,
        }
    }

    /// Number of orbits covered.
    pub fn norbits(&self) -> usize {
        match self {
            Extrema::Reduced(q) => q.len(),
            Extrema::All { series, .. } => series.len(),
        }
    }

    pub fn reduced(&self) -> Option<&QuantityArray> {
        match self {
            Extrema::Reduced(q) => Some(q),
            Extrema::All { .. } => None,
        }
    }

    /// Reduced value of a single-orbit result.
    pub fn scalar(&self) -> Option<Quantity> {
        match self {
            Extrema::Reduced(q) if q.len() == 1 => q.get(0),
            _ => None,
        }
    }

    pub fn series(&self) -> Option<&[ExtremaSeries]> {
        match self {
            Extrema::All { series, .. } => Some(series),
            Extrema::Reduced(_) => None,
        }
    }
}
