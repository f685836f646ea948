//! # Circulation and frame alignment
//!
//! An orbit *circulates* about an axis when its angular momentum about that axis keeps
//! the sign it had at the first sample and never becomes numerically negligible
//! (`|L_i| < 1e-13`). Tube orbits circulate about one axis, box orbits about none.
//!
//! ## Overview
//!
//! - [`Orbit::circulation`] classifies every orbit of a batch into a [`Circulation`],
//!   a `(3, norbits)` matrix of `0/1` flags (rows `x, y, z`).
//! - [`Orbit::align_circulation_with_z`] swaps the circulating axis of each tube orbit
//!   with `z`, in position and velocity.
//!
//! | flags `[x, y, z]` | orbit family | alignment |
//! |---|---|---|
//! | `[0, 0, 0]` | box / boxlet | unchanged |
//! | `[0, 0, 1]` | short-axis tube | unchanged |
//! | `[1, 0, 0]` | long-axis tube | `x ↔ z` |
//! | `[0, 1, 0]` | intermediate-axis tube | `y ↔ z` |
//!
//! More than one flagged axis usually means the orbit has not been integrated long
//! enough. It is logged as a warning; alignment then leaves orbits flagged about `z`
//! alone, and otherwise picks `x` before `y`.
use log::warn;
use nalgebra::DMatrix;
use serde::Serialize;

use crate::apsis_errors::ApsisError;
use crate::constants::{AxisFlags, CIRCULATION_EPS};
use crate::orbit::Orbit;

/// Per-axis circulation flags of a batch, shape `(3, norbits)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circulation {
    flags: DMatrix<u8>,
}

impl Circulation {
    /// Wrap a matrix of flags, rows `x, y, z` and one column per orbit.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::InvalidCirculation`] if an entry is neither 0 nor 1.
    pub fn from_matrix(flags: DMatrix<u8>) -> Result<Self, ApsisError> {
        if let Some(bad) = flags.iter().find(|&&f| f > 1) {
            return Err(ApsisError::InvalidCirculation(format!(
                "flags must be 0 or 1, found {bad}"
            )));
        }
        Ok(Circulation { flags })
    }

    /// Flags of a batch, one `[x, y, z]` triplet per orbit.
    pub fn from_flags(per_orbit: &[AxisFlags]) -> Result<Self, ApsisError> {
        Self::from_matrix(DMatrix::from_fn(3, per_orbit.len(), |i, k| {
            per_orbit[k][i]
        }))
    }

    /// `(axes, orbits)`.
    pub fn shape(&self) -> (usize, usize) {
        self.flags.shape()
    }

    pub fn norbits(&self) -> usize {
        self.flags.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<u8> {
        &self.flags
    }

    /// `[x, y, z]` flags of orbit `k`.
    pub fn axes(&self, k: usize) -> AxisFlags {
        [self.flags[(0, k)], self.flags[(1, k)], self.flags[(2, k)]]
    }

    /// No circulation about any axis.
    pub fn is_box(&self, k: usize) -> bool {
        self.flags.column(k).iter().all(|&f| f == 0)
    }

    /// Circulation about more than one axis.
    pub fn is_ambiguous(&self, k: usize) -> bool {
        self.flags.column(k).iter().map(|&f| f as usize).sum::<usize>() > 1
    }

    pub fn ambiguous_orbits(&self) -> Vec<usize> {
        (0..self.norbits()).filter(|&k| self.is_ambiguous(k)).collect()
    }
}

/// Sign with `sign(0) = 0` and NaN kept as NaN.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x * 0.0
    }
}

fn circulates(components: impl Iterator<Item = f64>) -> u8 {
    let mut components = components;
    let Some(l0) = components.next() else {
        return 0;
    };
    let s0 = sign(l0);
    let broken = components.any(|l| s0 != sign(l) || l.abs() < CIRCULATION_EPS);
    u8::from(!broken)
}

impl Orbit {
    fn classify_circulation(&self) -> Result<Circulation, ApsisError> {
        let flags = self.map_orbits(|view| {
            let l = view.angular_momentum();
            let axes: AxisFlags = [0, 1, 2].map(|i| circulates(l.iter().map(|li| li[i])));
            Ok(axes)
        })?;
        Circulation::from_flags(&flags)
    }

    /// Classify the circulation of every orbit of the batch.
    ///
    /// Return
    /// ----------
    /// * A [`Circulation`] of shape `(3, norbits)`. Entry `(i, k)` is 1 when the angular
    ///   momentum of orbit `k` about axis `i` keeps the sign of its first sample and
    ///   stays above `1e-13` in magnitude over every later sample.
    pub fn circulation(&self) -> Result<Circulation, ApsisError> {
        let circ = self.classify_circulation()?;
        for k in circ.ambiguous_orbits() {
            warn!(
                "orbit {k} circulates about multiple axes {:?}; has it been integrated for long enough?",
                circ.axes(k)
            );
        }
        Ok(circ)
    }

    /// Copy of the batch where each tube orbit circulates about `z`.
    ///
    /// Arguments
    /// -----------------
    /// * `circulation`: flags to use, recomputed with [`Orbit::circulation`] when `None`.
    ///
    /// Return
    /// ----------
    /// * A new [`Orbit`] sharing the time grid, units and dynamics context. Orbits
    ///   already circulating about `z` and box orbits are copied unchanged; for the
    ///   others the circulating axis is swapped with `z` in position and velocity.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::CirculationShape`] if `circulation` is not `(3, norbits)`.
    pub fn align_circulation_with_z(
        &self,
        circulation: Option<&Circulation>,
    ) -> Result<Orbit, ApsisError> {
        let computed;
        let circ = match circulation {
            Some(c) => c,
            None => {
                computed = self.classify_circulation()?;
                &computed
            }
        };

        let expected = (self.ndim(), self.norbits());
        if circ.shape() != expected {
            return Err(ApsisError::CirculationShape {
                expected,
                found: circ.shape(),
            });
        }

        let mut aligned = self.clone();
        for k in 0..self.norbits() {
            let [cx, cy, cz] = circ.axes(k);
            if cz == 1 || circ.is_box(k) {
                continue;
            }
            if circ.is_ambiguous(k) {
                warn!(
                    "orbit {k} circulates about multiple axes; has it been integrated for long enough?"
                );
            }

            let axis = match (cx, cy) {
                (1, _) => 0,
                _ => 1,
            };
            for it in 0..self.ntimes() {
                aligned.pos_mut(it, k).swap_rows(axis, 2);
                aligned.vel_mut(it, k).swap_rows(axis, 2);
            }
        }
        Ok(aligned)
    }
}

#[cfg(test)]
mod circulation_test {
    use super::*;
    use crate::constants::Vec3;

    #[test]
    fn test_sign_semantics() {
        assert_eq!(sign(0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
        assert_eq!(circulates([1.0, 2.0, 0.5].into_iter()), 1);
        assert_eq!(circulates([1.0, 2.0, -0.5].into_iter()), 0);
        assert_eq!(circulates([1.0, 1e-14, 1.0].into_iter()), 0);
        assert_eq!(circulates([1.0, f64::NAN].into_iter()), 0);
        assert_eq!(circulates([-3.0].into_iter()), 1);
        assert_eq!(circulates(std::iter::empty()), 0);
    }

    #[test]
    fn test_circulation_flags() {
        let c = Circulation::from_flags(&[[0, 0, 1], [0, 0, 0], [1, 1, 0]]).unwrap();
        assert_eq!(c.shape(), (3, 3));
        assert_eq!(c.axes(0), [0, 0, 1]);
        assert!(c.is_box(1));
        assert!(c.is_ambiguous(2));
        assert_eq!(c.ambiguous_orbits(), vec![2]);

        assert!(matches!(
            Circulation::from_matrix(DMatrix::from_element(3, 1, 2)),
            Err(ApsisError::InvalidCirculation(_))
        ));
    }

    #[test]
    fn test_ambiguous_alignment_prefers_x() {
        let t: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let pos = vec![Vec3::new(1.0, 2.0, 3.0); 5];
        let vel = vec![Vec3::new(4.0, 5.0, 6.0); 5];
        let o = Orbit::new(pos, vel, Some(t)).unwrap();

        let circ = Circulation::from_flags(&[[1, 1, 0]]).unwrap();
        let aligned = o.align_circulation_with_z(Some(&circ)).unwrap();
        assert_eq!(*aligned.pos(3, 0), Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(*aligned.vel(3, 0), Vec3::new(6.0, 5.0, 4.0));

        let circ = Circulation::from_flags(&[[0, 1, 0]]).unwrap();
        let aligned = o.align_circulation_with_z(Some(&circ)).unwrap();
        assert_eq!(*aligned.pos(0, 0), Vec3::new(1.0, 3.0, 2.0));

        let circ = Circulation::from_flags(&[[0, 1, 1]]).unwrap();
        let aligned = o.align_circulation_with_z(Some(&circ)).unwrap();
        assert_eq!(*aligned.pos(0, 0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_circulation_shape_mismatch() {
        let o = Orbit::new(vec![Vec3::x(); 3], vec![Vec3::y(); 3], None).unwrap();
        let circ = Circulation::from_flags(&[[0, 0, 1], [0, 0, 1]]).unwrap();
        assert_eq!(
            o.align_circulation_with_z(Some(&circ)).unwrap_err(),
            ApsisError::CirculationShape {
                expected: (3, 1),
                found: (3, 2)
            }
        );
    }
}
