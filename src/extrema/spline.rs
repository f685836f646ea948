//! # Interpolating splines
//!
//! Piecewise polynomial interpolants through every sample of a [`TimeSeries`]:
//!
//! - **Cubic** – not-a-knot cubic spline (the first two and last two intervals share
//!   one polynomial each, equivalently the interior knots next to each end are
//!   removed). This is the smoothing-free cubic B-spline through the samples.
//! - **Linear** – broken line through the samples.
//!
//! The cubic spline is built from its knot slopes `s_i`, solution of a tridiagonal
//! system. On the interval `[x_i, x_{i+1}]` of width `h` and secant slope `m`:
//!
//! ```text
//! p(τ) = y_i + s_i τ + c2 τ² + c3 τ³,  τ = x - x_i
//! c2 = (3m - 2 s_i - s_{i+1}) / h
//! c3 = (s_i + s_{i+1} - 2m) / h²
//! ```
//!
//! Queries outside `[x_0, x_{n-1}]` follow the [`Boundary`] policy.
use crate::apsis_errors::ApsisError;
use crate::constants::MIN_SAMPLES_CUBIC;
use crate::extrema::time_series::TimeSeries;
use crate::extrema::{Boundary, SplineDegree};

/// Piecewise polynomial through every sample of a series.
#[derive(Debug, Clone)]
pub struct InterpolatingSpline {
    x: Vec<f64>,
    /// `[c0, c1, c2, c3]` for each interval, in powers of `x - x_i`.
    coeffs: Vec<[f64; 4]>,
    boundary: Boundary,
}

impl InterpolatingSpline {
    /// Fit a spline of the requested degree through `series`.
    ///
    /// Arguments
    /// -----------------
    /// * `series`: samples with a strictly increasing time grid.
    /// * `degree`: [`SplineDegree::Cubic`] or [`SplineDegree::Linear`].
    /// * `boundary`: policy for queries outside the sampled domain.
    ///
    /// Return
    /// ----------
    /// * The spline, or [`ApsisError::InsufficientSamples`] if the series is too short
    ///   for the degree (4 samples for cubic, 2 for linear).
    pub fn fit(
        series: &TimeSeries<'_>,
        degree: SplineDegree,
        boundary: Boundary,
    ) -> Result<Self, ApsisError> {
        let x = series.times();
        let y = series.values();
        let n = x.len();

        let needed = match degree {
            SplineDegree::Cubic => MIN_SAMPLES_CUBIC,
            SplineDegree::Linear => 2,
        };
        if n < needed {
            return Err(ApsisError::InsufficientSamples { needed, found: n });
        }

        let dx: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = y
            .windows(2)
            .zip(&dx)
            .map(|(w, h)| (w[1] - w[0]) / h)
            .collect();

        let coeffs = match degree {
            SplineDegree::Linear => y
                .iter()
                .zip(&slope)
                .map(|(&yi, &mi)| [yi, mi, 0.0, 0.0])
                .collect(),
            SplineDegree::Cubic => {
                let s = not_a_knot_slopes(x, &dx, &slope);
                (0..n - 1)
                    .map(|i| {
                        let h = dx[i];
                        let m = slope[i];
                        let c2 = (3.0 * m - 2.0 * s[i] - s[i + 1]) / h;
                        let c3 = (s[i] + s[i + 1] - 2.0 * m) / (h * h);
                        [y[i], s[i], c2, c3]
                    })
                    .collect()
            }
        };

        Ok(InterpolatingSpline {
            x: x.to_vec(),
            coeffs,
            boundary,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn interval(&self, t: f64) -> usize {
        let last = self.coeffs.len() - 1;
        self.x.partition_point(|&xi| xi <= t).saturating_sub(1).min(last)
    }

    /// Value of the spline at `t`.
    pub fn eval(&self, t: f64) -> f64 {
        let (lo, hi) = self.domain();
        let t = match self.boundary {
            Boundary::Clamp => t.clamp(lo, hi),
            Boundary::Extrapolate => t,
        };
        let i = self.interval(t);
        let [c0, c1, c2, c3] = self.coeffs[i];
        let tau = t - self.x[i];
        c0 + tau * (c1 + tau * (c2 + tau * c3))
    }

    /// First derivative of the spline at `t`; zero outside the domain when clamped.
    pub fn derivative(&self, t: f64) -> f64 {
        let (lo, hi) = self.domain();
        if self.boundary == Boundary::Clamp && (t < lo || t > hi) {
            return 0.0;
        }
        let i = self.interval(t);
        let [_, c1, c2, c3] = self.coeffs[i];
        let tau = t - self.x[i];
        c1 + tau * (2.0 * c2 + 3.0 * tau * c3)
    }
}

/// Knot slopes of the not-a-knot cubic spline (Thomas algorithm).
fn not_a_knot_slopes(x: &[f64], dx: &[f64], slope: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    // not-a-knot at the first interior knot
    let d0 = x[2] - x[0];
    diag[0] = dx[1];
    upper[0] = d0;
    rhs[0] = ((dx[0] + 2.0 * d0) * dx[1] * slope[0] + dx[0] * dx[0] * slope[1]) / d0;

    for i in 1..n - 1 {
        lower[i] = dx[i];
        diag[i] = 2.0 * (dx[i - 1] + dx[i]);
        upper[i] = dx[i - 1];
        rhs[i] = 3.0 * (dx[i] * slope[i - 1] + dx[i - 1] * slope[i]);
    }

    // not-a-knot at the last interior knot
    let d1 = x[n - 1] - x[n - 3];
    lower[n - 1] = d1;
    diag[n - 1] = dx[n - 3];
    rhs[n - 1] =
        (dx[n - 2] * dx[n - 2] * slope[n - 3] + (2.0 * d1 + dx[n - 2]) * dx[n - 3] * slope[n - 2])
            / d1;

    // forward sweep
    for i in 1..n {
        let w = lower[i] / diag[i - 1];
        diag[i] -= w * upper[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }

    // back substitution
    let mut s = vec![0.0; n];
    s[n - 1] = rhs[n - 1] / diag[n - 1];
    for i in (0..n - 1).rev() {
        s[i] = (rhs[i] - upper[i] * s[i + 1]) / diag[i];
    }
    s
}

#[cfg(test)]
mod spline_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid(n: usize, step: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * step).collect()
    }

    #[test]
    fn test_cubic_reproduces_cubic_polynomial() {
        // a not-a-knot spline is exact on any cubic
        let t = grid(9, 0.37);
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x - 0.3 * x * x * x;
        let ts = TimeSeries::new(&t, t.iter().map(|&x| f(x)).collect()).unwrap();
        let spline = InterpolatingSpline::fit(&ts, SplineDegree::Cubic, Boundary::Clamp).unwrap();

        for k in 0..80 {
            let x = k as f64 * 0.037;
            assert_abs_diff_eq!(spline.eval(x), f(x), epsilon = 1e-10);
        }
        let df = |x: f64| -2.0 + x - 0.9 * x * x;
        assert_abs_diff_eq!(spline.derivative(1.1), df(1.1), epsilon = 1e-9);
    }

    #[test]
    fn test_cubic_interpolates_samples_on_uneven_grid() {
        let t = vec![0.0, 0.1, 0.35, 0.4, 0.9, 1.3, 1.32, 2.0];
        let v: Vec<f64> = t.iter().map(|x: &f64| x.sin()).collect();
        let ts = TimeSeries::new(&t, v.clone()).unwrap();
        let spline = InterpolatingSpline::fit(&ts, SplineDegree::Cubic, Boundary::Clamp).unwrap();
        for (x, y) in t.iter().zip(&v) {
            assert_abs_diff_eq!(spline.eval(*x), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_boundary_policy() {
        let t = grid(5, 1.0);
        let ts = TimeSeries::new(&t, vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        let clamped = InterpolatingSpline::fit(&ts, SplineDegree::Cubic, Boundary::Clamp).unwrap();
        assert_abs_diff_eq!(clamped.eval(-3.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(clamped.eval(10.0), 4.0, epsilon = 1e-12);
        assert_eq!(clamped.derivative(10.0), 0.0);

        let free = InterpolatingSpline::fit(&ts, SplineDegree::Cubic, Boundary::Extrapolate).unwrap();
        assert_abs_diff_eq!(free.eval(6.0), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_linear_and_too_short() {
        let t = grid(3, 1.0);
        let ts = TimeSeries::new(&t, vec![0.0, 2.0, 0.0]).unwrap();
        let lin = InterpolatingSpline::fit(&ts, SplineDegree::Linear, Boundary::Clamp).unwrap();
        assert_abs_diff_eq!(lin.eval(0.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lin.eval(1.5), 1.0, epsilon = 1e-12);

        assert_eq!(
            InterpolatingSpline::fit(&ts, SplineDegree::Cubic, Boundary::Clamp).unwrap_err(),
            ApsisError::InsufficientSamples {
                needed: 4,
                found: 3
            }
        );
    }
}
