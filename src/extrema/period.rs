//! Peak-to-peak period of an oscillating series.
use itertools::Itertools;
use serde::Serialize;

use crate::constants::PERIOD_AMPLITUDE_THRESHOLD;
use crate::extrema::finder::{interior_maxima, interior_minima};
use crate::extrema::time_series::TimeSeries;

/// Which period to estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodKind {
    /// Spacing of successive radial extrema.
    Radial,
    /// One period per Cartesian axis. Not supported.
    PerAxis,
}

/// Options of [`crate::orbit::Orbit::estimate_period`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodParams {
    pub kind: PeriodKind,
    /// Below this peak-to-trough amplitude the series is considered flat and the
    /// period is NaN.
    pub amplitude_threshold: f64,
}

impl Default for PeriodParams {
    fn default() -> Self {
        PeriodParams {
            kind: PeriodKind::Radial,
            amplitude_threshold: PERIOD_AMPLITUDE_THRESHOLD,
        }
    }
}

impl PeriodParams {
    pub fn radial() -> Self {
        Self::default()
    }

    pub fn per_axis() -> Self {
        PeriodParams {
            kind: PeriodKind::PerAxis,
            ..Self::default()
        }
    }

    pub fn amplitude_threshold(mut self, v: f64) -> Self {
        self.amplitude_threshold = v;
        self
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Mean spacing between successive sampled maxima, averaged with the mean spacing
/// between successive sampled minima.
///
/// Return
/// ----------
/// * The period in the time unit of the series. NaN when the mean peak and mean
///   trough differ by less than `amplitude_threshold`, or when fewer than two peaks
///   or two troughs are found.
pub fn peak_to_peak_period(series: &TimeSeries<'_>, amplitude_threshold: f64) -> f64 {
    let f = series.values();
    let t = series.times();

    let max_ix = interior_maxima(f);
    let min_ix = interior_minima(f);

    let amplitude = mean(max_ix.iter().map(|&i| f[i])) - mean(min_ix.iter().map(|&i| f[i]));
    if amplitude.abs() < amplitude_threshold {
        return f64::NAN;
    }

    let spacing = |ix: &[usize]| mean(ix.iter().tuple_windows().map(|(&a, &b)| t[b] - t[a]));
    let t_max = spacing(&max_ix);
    let t_min = spacing(&min_ix);

    0.5 * (t_max + t_min)
}

#[cfg(test)]
mod period_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    #[test]
    fn test_sine_period() {
        let t: Vec<f64> = (0..=2000).map(|i| i as f64 * 0.01).collect();
        let r = t.iter().map(|x| 2.0 + x.sin()).collect();
        let series = TimeSeries::new(&t, r).unwrap();
        assert_abs_diff_eq!(
            peak_to_peak_period(&series, PERIOD_AMPLITUDE_THRESHOLD),
            TAU,
            epsilon = 0.01
        );
    }

    #[test]
    fn test_flat_series_is_nan() {
        let t: Vec<f64> = (0..500).map(|i| i as f64 * 0.05).collect();
        let r = t.iter().map(|x| 1.0 + 1e-4 * x.sin()).collect();
        let series = TimeSeries::new(&t, r).unwrap();
        assert!(peak_to_peak_period(&series, PERIOD_AMPLITUDE_THRESHOLD).is_nan());
    }

    #[test]
    fn test_single_peak_is_nan() {
        let t: Vec<f64> = (0..100).map(|i| i as f64 * 0.05).collect();
        let r = t.iter().map(|x| 2.0 + x.sin()).collect();
        let series = TimeSeries::new(&t, r).unwrap();
        assert!(peak_to_peak_period(&series, PERIOD_AMPLITUDE_THRESHOLD).is_nan());
    }
}
