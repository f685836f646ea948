//! Scalar series sampled on the time grid of a single orbit.
use crate::apsis_errors::ApsisError;

/// One scalar quantity of one orbit, sampled at the orbit times.
///
/// The time grid is borrowed from the orbit; the values are owned since they are
/// usually derived (radius, |z|, ...) from the phase-space arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<'a> {
    times: &'a [f64],
    values: Vec<f64>,
}

impl<'a> TimeSeries<'a> {
    /// Pair a time grid with sampled values.
    ///
    /// Errors
    /// ------
    /// * [`ApsisError::ShapeMismatch`] if the two slices differ in length.
    pub fn new(times: &'a [f64], values: Vec<f64>) -> Result<Self, ApsisError> {
        if times.len() != values.len() {
            return Err(ApsisError::ShapeMismatch(format!(
                "time series has {} times but {} values",
                times.len(),
                values.len()
            )));
        }
        Ok(TimeSeries { times, values })
    }

    pub fn times(&self) -> &[f64] {
        self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `f` to every value, keeping the time grid.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> TimeSeries<'a> {
        TimeSeries {
            times: self.times,
            values: self.values.iter().copied().map(f).collect(),
        }
    }

    pub fn negated(&self) -> TimeSeries<'a> {
        self.map(|v| -v)
    }

    /// Check that the time grid is strictly increasing.
    pub fn ensure_increasing(&self) -> Result<(), ApsisError> {
        match self.times.windows(2).position(|w| !(w[1] > w[0])) {
            Some(i) => Err(ApsisError::NonMonotonicTime(format!(
                "t[{}] = {} is not greater than t[{}] = {}",
                i + 1,
                self.times[i + 1],
                i,
                self.times[i]
            ))),
            None => Ok(()),
        }
    }
}
