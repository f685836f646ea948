//! Bracketed one-dimensional minimizers.
//!
//! Both methods take a bracketing triplet `a < x < b` with `f(x) < f(a)` and
//! `f(x) < f(b)` and never evaluate `f` outside `[a, b]`.
//!
//! * [`brent`] – Brent's method, parabolic interpolation with golden-section fallback.
//! * [`golden_section`] – plain golden-section search.
use crate::constants::CGOLD;

/// Absolute floor added to the relative tolerance, protects minima at `x = 0`.
const ZEPS: f64 = 1e-11;

/// Outcome of a bracketed minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub fx: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Brent's derivative-free minimization inside the bracket `(a, x0, b)`.
///
/// Arguments
/// -----------------
/// * `f`: objective.
/// * `a`, `b`: bracket ends (any order).
/// * `x0`: seed inside the bracket, usually the sample with the lowest value.
/// * `xtol`: relative tolerance on the abscissa.
/// * `max_iter`: iteration cap; the best point so far is returned when reached.
pub fn brent(
    f: impl Fn(f64) -> f64,
    a: f64,
    x0: f64,
    b: f64,
    xtol: f64,
    max_iter: usize,
) -> Minimum {
    let (mut a, mut b) = (a.min(b), a.max(b));
    let (mut x, mut w, mut v) = (x0, x0, x0);
    let mut fx = f(x);
    let (mut fw, mut fv) = (fx, fx);
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for iter in 0..max_iter {
        let xm = 0.5 * (a + b);
        let tol1 = xtol * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;

        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            return Minimum {
                x,
                fx,
                iterations: iter,
                converged: true,
            };
        }

        let mut golden = true;
        if e.abs() > tol1 {
            // trial parabola through x, w, v
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let etemp = e;
            e = d;
            if !(p.abs() >= (0.5 * q * etemp).abs() || p <= q * (a - x) || p >= q * (b - x)) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(xm - x);
                }
                golden = false;
            }
        }
        if golden {
            e = if x >= xm { a - x } else { b - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = f(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            (v, w, x) = (w, x, u);
            (fv, fw, fx) = (fw, fx, fu);
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                (v, w) = (w, u);
                (fv, fw) = (fw, fu);
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Minimum {
        x,
        fx,
        iterations: max_iter,
        converged: false,
    }
}

/// Golden-section search inside the bracket `(a, x0, b)`.
pub fn golden_section(
    f: impl Fn(f64) -> f64,
    a: f64,
    seed: f64,
    b: f64,
    xtol: f64,
    max_iter: usize,
) -> Minimum {
    let r = 1.0 - CGOLD;
    let (lo, hi) = (a.min(b), a.max(b));
    let (mut x0, mut x3) = (lo, hi);
    let (mut x1, mut x2) = if (hi - seed).abs() > (seed - lo).abs() {
        (seed, seed + CGOLD * (hi - seed))
    } else {
        (seed - CGOLD * (seed - lo), seed)
    };
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    let mut iterations = 0;
    while (x3 - x0).abs() > xtol * (x1.abs() + x2.abs()) + ZEPS {
        if iterations == max_iter {
            break;
        }
        if f2 < f1 {
            x0 = x1;
            x1 = x2;
            x2 = r * x2 + CGOLD * x3;
            f1 = f2;
            f2 = f(x2);
        } else {
            x3 = x2;
            x2 = x1;
            x1 = r * x1 + CGOLD * x0;
            f2 = f1;
            f1 = f(x1);
        }
        iterations += 1;
    }

    let converged = iterations < max_iter;
    if f1 < f2 {
        Minimum {
            x: x1,
            fx: f1,
            iterations,
            converged,
        }
    } else {
        Minimum {
            x: x2,
            fx: f2,
            iterations,
            converged,
        }
    }
}
