//! # Dynamics context
//!
//! The potential and reference frame a trajectory was computed in. The estimators never
//! integrate anything; they only evaluate the potential (and the Hamiltonian built from
//! it) along the stored samples.
//!
//! ## Overview
//!
//! - [`Potential`] – an opaque callable returning `Φ(q, t)` per sample.
//! - [`KeplerPotential`], [`LogarithmicPotential`] – built-in potentials.
//! - [`Frame`] – static, or rotating at a constant pattern speed about z.
//! - [`Hamiltonian`] – a potential in a frame, giving the specific energy of a
//!   phase-space point (the Jacobi energy in a rotating frame).
use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;

use crate::constants::Vec3;

/// Gravitational potential per unit mass.
pub trait Potential: Send + Sync + Debug {
    /// Potential at position `q` and time `t`.
    fn value(&self, q: &Vec3, t: f64) -> f64;
}

/// Point mass, `Φ = -GM / r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeplerPotential {
    pub gm: f64,
}

impl KeplerPotential {
    pub fn new(gm: f64) -> Self {
        KeplerPotential { gm }
    }
}

impl Potential for KeplerPotential {
    fn value(&self, q: &Vec3, _t: f64) -> f64 {
        -self.gm / q.norm()
    }
}

/// Triaxial logarithmic potential,
/// `Φ = ½ v_c² ln(r_h² + x²/q1² + y²/q2² + z²/q3²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogarithmicPotential {
    pub v_c: f64,
    pub r_h: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl LogarithmicPotential {
    pub fn new(v_c: f64, r_h: f64, q1: f64, q2: f64, q3: f64) -> Self {
        LogarithmicPotential {
            v_c,
            r_h,
            q1,
            q2,
            q3,
        }
    }

    /// Axisymmetric variant flattened along z.
    pub fn axisymmetric(v_c: f64, r_h: f64, q3: f64) -> Self {
        Self::new(v_c, r_h, 1.0, 1.0, q3)
    }
}

impl Potential for LogarithmicPotential {
    fn value(&self, q: &Vec3, _t: f64) -> f64 {
        let m2 = self.r_h.powi(2)
            + (q.x / self.q1).powi(2)
            + (q.y / self.q2).powi(2)
            + (q.z / self.q3).powi(2);
        0.5 * self.v_c.powi(2) * m2.ln()
    }
}

/// Reference frame of the stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Frame {
    #[default]
    Static,
    /// Rotating about z at the constant pattern speed `omega`.
    ConstantRotating { omega: f64 },
}

impl Frame {
    fn omega(&self) -> Vec3 {
        match self {
            Frame::Static => Vec3::zeros(),
            Frame::ConstantRotating { omega } => Vec3::new(0.0, 0.0, *omega),
        }
    }
}

/// A potential evaluated in a reference frame.
#[derive(Debug, Clone)]
pub struct Hamiltonian {
    pub potential: Arc<dyn Potential>,
    pub frame: Frame,
}

impl Hamiltonian {
    pub fn new(potential: Arc<dyn Potential>, frame: Frame) -> Self {
        Hamiltonian { potential, frame }
    }

    /// Specific energy of the phase-space point `(q, v)` at time `t`.
    ///
    /// In a rotating frame this is the Jacobi energy `½v² + Φ - Ω·(q × v)`.
    pub fn energy(&self, q: &Vec3, v: &Vec3, t: f64) -> f64 {
        let kinetic = 0.5 * v.norm_squared();
        let rotation = self.frame.omega().dot(&q.cross(v));
        kinetic + self.potential.value(q, t) - rotation
    }
}
