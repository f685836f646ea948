//! # Apsides, vertical excursion, eccentricity and radial period
//!
//! Per-orbit extremum estimators of an [`Orbit`] batch. Each estimator builds the
//! relevant [`TimeSeries`] of every orbit, hands it to an [`ExtremaFinder`] and reduces
//! the extrema found with the [`Reduction`] of the request.
//!
//! | estimator | series searched | sign |
//! |---|---|---|
//! | [`Orbit::pericenter`] | spherical radius | minima (`-r` searched, negated back) |
//! | [`Orbit::apocenter`] | spherical radius | maxima |
//! | [`Orbit::zmax`] | `|z|` | maxima |
//!
//! A time grid running backwards is handled by working on the time-reversed copy of
//! the batch, so callers may pass orbits integrated backwards in time.
//!
//! ## Empty extrema
//!
//! An orbit without any interior extremum reduces to NaN under
//! [`Reduction::Mean`], [`Reduction::Min`] and [`Reduction::Max`] (a warning is
//! logged) and to an empty [`ExtremaSeries`] under [`Reduction::All`].
use std::borrow::Cow;

use log::warn;

use crate::apsis_errors::ApsisError;
use crate::extrema::finder::ExtremaFinder;
use crate::extrema::period::{peak_to_peak_period, PeriodKind, PeriodParams};
use crate::extrema::time_series::TimeSeries;
use crate::extrema::{Extrema, ExtremaParams, ExtremaRequest, ExtremaSeries, Reduction};
use crate::orbit::view::OrbitView;
use crate::orbit::Orbit;
use crate::units::{QuantityArray, Unit};

/// Which side of the series the estimator is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Maxima,
    Minima,
}

/// One reduced value per orbit, NaN for orbits without extrema.
fn reduce_each(per_orbit: &[ExtremaSeries], reduction: Reduction, unit: Unit) -> QuantityArray {
    QuantityArray::new(
        per_orbit
            .iter()
            .map(|s| reduction.reduce(&s.values).unwrap_or(f64::NAN))
            .collect(),
        unit,
    )
}

impl Orbit {
    /// The batch with an increasing time grid, reversed only when needed.
    fn time_ordered(&self) -> Cow<'_, Orbit> {
        if self.is_time_reversed() {
            Cow::Owned(self.reversed())
        } else {
            Cow::Borrowed(self)
        }
    }

    fn require_time(&self, what: &str) -> Result<(), ApsisError> {
        match self.t() {
            Some(_) => Ok(()),
            None => Err(ApsisError::MissingTime(format!(
                "to compute the {what}, a time array is needed; specify one when creating the orbit"
            ))),
        }
    }

    /// Extrema of `quantity` for every orbit, searched on the time-ordered batch.
    fn per_orbit_extrema<Q>(
        &self,
        name: &str,
        quantity: Q,
        side: Side,
        params: &ExtremaParams,
    ) -> Result<Vec<ExtremaSeries>, ApsisError>
    where
        Q: Fn(&OrbitView<'_>) -> Vec<f64> + Sync + Send,
    {
        self.require_time(name)?;

        let ordered = self.time_ordered();
        let finder = ExtremaFinder::new(params);

        ordered.map_orbits(|view| {
            let t = view.t().unwrap_or_default();
            let values = quantity(&view);
            let series = TimeSeries::new(t, values)?;
            let found = match side {
                Side::Maxima => finder.find(&series)?,
                Side::Minima => finder.find(&series.negated())?.negate_values(),
            };
            if found.is_empty() {
                warn!(
                    "no interior {name} found for orbit {} over {} samples",
                    view.index(),
                    view.ntimes()
                );
            }
            Ok(found)
        })
    }

    fn extrema_of<Q>(
        &self,
        name: &str,
        quantity: Q,
        side: Side,
        request: &ExtremaRequest,
    ) -> Result<Extrema, ApsisError>
    where
        Q: Fn(&OrbitView<'_>) -> Vec<f64> + Sync + Send,
    {
        request.validate()?;
        let per_orbit = self.per_orbit_extrema(name, quantity, side, &request.params)?;

        let unit = self.units().length();
        match request.reduction {
            Reduction::All => Ok(Extrema::All {
                series: per_orbit,
                unit,
                time_unit: self.units().time(),
            }),
            reduction => Ok(Extrema::Reduced(reduce_each(&per_orbit, reduction, unit))),
        }
    }

    /// Mean apocenter or mean pericenter of every orbit.
    fn mean_apsis(&self, side: Side, params: &ExtremaParams) -> Result<QuantityArray, ApsisError> {
        let name = match side {
            Side::Maxima => "apocenter",
            Side::Minima => "pericenter",
        };
        let per_orbit = self.per_orbit_extrema(name, |v| v.spherical_radius(), side, params)?;
        Ok(reduce_each(&per_orbit, Reduction::Mean, self.units().length()))
    }

    /// Pericenter(s) of every orbit, from the local minima of the spherical radius.
    ///
    /// Arguments
    /// -----------------
    /// * `request`: reduction applied to the pericenters of each orbit (mean by default),
    ///   and the search parameters. [`Reduction::All`] keeps every pericenter with its time.
    ///
    /// Return
    /// ----------
    /// * [`Extrema::Reduced`] with one value per orbit, or [`Extrema::All`] with one
    ///   [`ExtremaSeries`] per orbit, in the length unit of the orbit.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::ConflictingReduction`] if times are requested with a reducing function.
    /// * [`ApsisError::MissingTime`] without a time array.
    /// * Any error of [`ExtremaFinder::find`].
    pub fn pericenter(&self, request: &ExtremaRequest) -> Result<Extrema, ApsisError> {
        self.extrema_of(
            "pericenter",
            |v| v.spherical_radius(),
            Side::Minima,
            request,
        )
    }

    /// Apocenter(s) of every orbit, from the local maxima of the spherical radius.
    ///
    /// See [`Orbit::pericenter`] for the arguments, return value and errors.
    pub fn apocenter(&self, request: &ExtremaRequest) -> Result<Extrema, ApsisError> {
        self.extrema_of(
            "apocenter",
            |v| v.spherical_radius(),
            Side::Maxima,
            request,
        )
    }

    /// Maximum vertical excursion(s) of every orbit, from the local maxima of `|z|`.
    ///
    /// See [`Orbit::pericenter`] for the arguments, return value and errors.
    pub fn zmax(&self, request: &ExtremaRequest) -> Result<Extrema, ApsisError> {
        self.extrema_of("z maximum", |v| v.abs_z(), Side::Maxima, request)
    }

    /// Eccentricity `(r_apo - r_peri) / (r_apo + r_peri)` of every orbit, from the mean
    /// apocenter and mean pericenter.
    ///
    /// `params` is forwarded to both estimators, e.g. [`ExtremaParams::approximate`].
    pub fn eccentricity(&self, params: &ExtremaParams) -> Result<QuantityArray, ApsisError> {
        let ra = self.mean_apsis(Side::Maxima, params)?;
        let rp = self.mean_apsis(Side::Minima, params)?;

        let e = ra
            .values
            .iter()
            .zip(&rp.values)
            .map(|(a, p)| (a - p) / (a + p))
            .collect();
        Ok(QuantityArray::new(e, Unit::ONE))
    }

    /// Radial period of every orbit, from the peak-to-peak spacing of the radius.
    ///
    /// Return
    /// ----------
    /// * One period per orbit, in the time unit of the orbit. NaN for orbits with fewer
    ///   than two apocenters or two pericenters, or a radial amplitude below
    ///   `params.amplitude_threshold`.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::MissingTime`] without a time array.
    /// * [`ApsisError::Unsupported`] for [`PeriodKind::PerAxis`].
    pub fn estimate_period(&self, params: &PeriodParams) -> Result<QuantityArray, ApsisError> {
        self.require_time("period")?;

        if params.kind == PeriodKind::PerAxis {
            return Err(ApsisError::Unsupported(
                "per-axis period estimation is not implemented".into(),
            ));
        }

        let ordered = self.time_ordered();
        let periods = ordered.map_orbits(|view| {
            let series = TimeSeries::new(view.t().unwrap_or_default(), view.spherical_radius())?;
            Ok(peak_to_peak_period(&series, params.amplitude_threshold))
        })?;

        Ok(QuantityArray::new(periods, self.units().time()))
    }
}
