//! # Orbits
//!
//! [`Orbit`] holds the sampled phase-space trajectory of one body or of a batch of
//! bodies sharing the same time grid, together with an optional dynamics context
//! (potential and reference frame). It is the entry point of every estimator:
//!
//! - extrema and period: [`Orbit::pericenter`], [`Orbit::apocenter`], [`Orbit::zmax`],
//!   [`Orbit::eccentricity`], [`Orbit::estimate_period`] (see [`apsides`]);
//! - circulation: [`Orbit::circulation`], [`Orbit::align_circulation_with_z`]
//!   (see [`circulation`]).
//!
//! ## Storage
//!
//! Positions and velocities are stored time-major: the sample of orbit `k` at time
//! index `it` lives at `it * norbits + k`. Per-sample scalar quantities are returned as
//! `DMatrix` of shape `(ntimes, norbits)`.
//!
//! ## Example
//!
//! ```rust
//! use apsis::constants::Vec3;
//! use apsis::orbit::Orbit;
//!
//! let t: Vec<f64> = (0..1000).map(|i| i as f64 * 0.02).collect();
//! let pos = t.iter().map(|&ti| Vec3::new(2.0 + ti.sin(), 0.0, 0.0)).collect();
//! let vel = t.iter().map(|&ti| Vec3::new(ti.cos(), 0.0, 0.0)).collect();
//!
//! let orbit = Orbit::new(pos, vel, Some(t)).unwrap();
//! assert_eq!(orbit.ntimes(), 1000);
//! assert_eq!(orbit.norbits(), 1);
//! ```
use std::ops::Range;
use std::sync::Arc;

use log::debug;
use nalgebra::DMatrix;
use once_cell::sync::OnceCell;

use crate::apsis_errors::ApsisError;
use crate::constants::Vec3;
use crate::dynamics::{Frame, Hamiltonian, Potential};
use crate::units::UnitSystem;

pub mod apsides;
pub mod circulation;
pub mod view;

use view::{OrbitSeq, OrbitView};

/// Sampled trajectory of one or several orbits on a shared time grid.
#[derive(Debug, Clone)]
pub struct Orbit {
    pos: Vec<Vec3>,
    vel: Vec<Vec3>,
    t: Option<Vec<f64>>,
    ntimes: usize,
    norbits: usize,
    units: UnitSystem,
    potential: Option<Arc<dyn Potential>>,
    frame: Option<Frame>,
    hamiltonian: OnceCell<Option<Hamiltonian>>,
}

impl Orbit {
    /// Single orbit from per-sample positions and velocities.
    pub fn new(pos: Vec<Vec3>, vel: Vec<Vec3>, t: Option<Vec<f64>>) -> Result<Self, ApsisError> {
        Self::batch(pos, vel, t, 1)
    }

    /// Batch of `norbits` orbits from time-major flat arrays.
    ///
    /// Arguments
    /// -----------------
    /// * `pos`, `vel`: `ntimes * norbits` samples, element `it * norbits + k` belonging to
    ///   orbit `k` at time index `it`.
    /// * `t`: optional time grid of length `ntimes`.
    /// * `norbits`: number of orbits in the batch (≥ 1).
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::ShapeMismatch`] if `pos` and `vel` differ in length or are empty, if
    ///   their length is not a multiple of `norbits`, or if `t` does not have `ntimes` entries.
    pub fn batch(
        pos: Vec<Vec3>,
        vel: Vec<Vec3>,
        t: Option<Vec<f64>>,
        norbits: usize,
    ) -> Result<Self, ApsisError> {
        if pos.len() != vel.len() {
            return Err(ApsisError::ShapeMismatch(format!(
                "position has {} samples, velocity has {}",
                pos.len(),
                vel.len()
            )));
        }
        if pos.is_empty() {
            return Err(ApsisError::ShapeMismatch(
                "an orbit needs at least one sample".into(),
            ));
        }
        if norbits == 0 || pos.len() % norbits != 0 {
            return Err(ApsisError::ShapeMismatch(format!(
                "{} samples cannot be split into {} orbits",
                pos.len(),
                norbits
            )));
        }
        let ntimes = pos.len() / norbits;

        if let Some(t) = &t {
            if t.len() != ntimes {
                return Err(ApsisError::ShapeMismatch(format!(
                    "time array has length {}, position and velocity have {} time samples",
                    t.len(),
                    ntimes
                )));
            }
        }

        Ok(Orbit {
            pos,
            vel,
            t,
            ntimes,
            norbits,
            units: UnitSystem::default(),
            potential: None,
            frame: None,
            hamiltonian: OnceCell::new(),
        })
    }

    /// Stack single- or multi-orbit batches sharing the same time grid.
    pub fn from_orbits(orbits: &[Orbit]) -> Result<Self, ApsisError> {
        let first = orbits
            .first()
            .ok_or_else(|| ApsisError::ShapeMismatch("no orbit to stack".into()))?;
        let ntimes = first.ntimes;

        if let Some(o) = orbits.iter().find(|o| o.ntimes != ntimes || o.t != first.t) {
            return Err(ApsisError::ShapeMismatch(format!(
                "cannot stack an orbit of {} samples on a time grid of {} samples",
                o.ntimes, ntimes
            )));
        }

        let norbits = orbits.iter().map(|o| o.norbits).sum();
        let mut pos = Vec::with_capacity(ntimes * norbits);
        let mut vel = Vec::with_capacity(ntimes * norbits);
        for it in 0..ntimes {
            for o in orbits {
                let row = it * o.norbits..(it + 1) * o.norbits;
                pos.extend_from_slice(&o.pos[row.clone()]);
                vel.extend_from_slice(&o.vel[row]);
            }
        }

        Ok(Orbit {
            units: first.units,
            potential: first.potential.clone(),
            frame: first.frame,
            ..Orbit::batch(pos, vel, first.t.clone(), norbits)?
        })
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn with_potential(mut self, potential: Arc<dyn Potential>) -> Self {
        self.potential = Some(potential);
        self.hamiltonian = OnceCell::new();
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self.hamiltonian = OnceCell::new();
        self
    }

    /// Take potential and frame from a Hamiltonian.
    pub fn with_hamiltonian(self, hamiltonian: Hamiltonian) -> Self {
        self.with_potential(hamiltonian.potential)
            .with_frame(hamiltonian.frame)
    }

    // ---------------------------------------------------------------------------------------------
    // Shape and accessors
    // ---------------------------------------------------------------------------------------------

    pub fn ntimes(&self) -> usize {
        self.ntimes
    }

    pub fn norbits(&self) -> usize {
        self.norbits
    }

    /// Spatial dimension, always 3.
    pub fn ndim(&self) -> usize {
        3
    }

    pub fn t(&self) -> Option<&[f64]> {
        self.t.as_deref()
    }

    pub fn units(&self) -> &UnitSystem {
        &self.units
    }

    pub fn potential(&self) -> Option<&Arc<dyn Potential>> {
        self.potential.as_ref()
    }

    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    /// Position of orbit `k` at time index `it`.
    pub fn pos(&self, it: usize, k: usize) -> &Vec3 {
        &self.pos[it * self.norbits + k]
    }

    /// Velocity of orbit `k` at time index `it`.
    pub fn vel(&self, it: usize, k: usize) -> &Vec3 {
        &self.vel[it * self.norbits + k]
    }

    pub(crate) fn pos_mut(&mut self, it: usize, k: usize) -> &mut Vec3 {
        &mut self.pos[it * self.norbits + k]
    }

    pub(crate) fn vel_mut(&mut self, it: usize, k: usize) -> &mut Vec3 {
        &mut self.vel[it * self.norbits + k]
    }

    /// `true` when the time grid runs backwards (last sample before the first).
    pub fn is_time_reversed(&self) -> bool {
        match self.t.as_deref() {
            Some([first, .., last]) => last < first,
            _ => false,
        }
    }

    /// The lazily built Hamiltonian of the dynamics context.
    ///
    /// Built from the potential and frame on first access, then reused. `None` when
    /// either of them is missing.
    pub fn hamiltonian(&self) -> Option<&Hamiltonian> {
        self.hamiltonian
            .get_or_init(|| match (&self.potential, self.frame) {
                (Some(potential), Some(frame)) => Some(Hamiltonian::new(potential.clone(), frame)),
                _ => None,
            })
            .as_ref()
    }

    // ---------------------------------------------------------------------------------------------
    // Slicing and iteration
    // ---------------------------------------------------------------------------------------------

    /// Copy of the orbit with the time axis reversed.
    pub fn reversed(&self) -> Orbit {
        let mut pos = Vec::with_capacity(self.pos.len());
        let mut vel = Vec::with_capacity(self.vel.len());
        for it in (0..self.ntimes).rev() {
            let row = it * self.norbits..(it + 1) * self.norbits;
            pos.extend_from_slice(&self.pos[row.clone()]);
            vel.extend_from_slice(&self.vel[row]);
        }
        let t = self.t.as_ref().map(|t| t.iter().rev().copied().collect());
        self.rebuild(pos, vel, t, self.norbits)
    }

    /// Copy of the samples with time index in `range`.
    pub fn slice_times(&self, range: Range<usize>) -> Result<Orbit, ApsisError> {
        if range.end > self.ntimes || range.start > range.end {
            return Err(ApsisError::IndexOutOfRange {
                index: range.end.max(range.start),
                len: self.ntimes,
            });
        }
        if range.is_empty() {
            return Err(ApsisError::ShapeMismatch(format!(
                "time slice {range:?} selects no sample"
            )));
        }
        let flat = range.start * self.norbits..range.end * self.norbits;
        let t = self.t.as_ref().map(|t| t[range].to_vec());
        Ok(self.rebuild(
            self.pos[flat.clone()].to_vec(),
            self.vel[flat].to_vec(),
            t,
            self.norbits,
        ))
    }

    /// Copy of the orbits at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Orbit, ApsisError> {
        if let Some(&index) = indices.iter().find(|&&k| k >= self.norbits) {
            return Err(ApsisError::IndexOutOfRange {
                index,
                len: self.norbits,
            });
        }
        if indices.is_empty() {
            return Err(ApsisError::ShapeMismatch("no orbit selected".into()));
        }
        let mut pos = Vec::with_capacity(self.ntimes * indices.len());
        let mut vel = Vec::with_capacity(self.ntimes * indices.len());
        for it in 0..self.ntimes {
            for &k in indices {
                pos.push(*self.pos(it, k));
                vel.push(*self.vel(it, k));
            }
        }
        Ok(self.rebuild(pos, vel, self.t.clone(), indices.len()))
    }

    /// Borrowed view of orbit `k`.
    pub fn view(&self, k: usize) -> Result<OrbitView<'_>, ApsisError> {
        OrbitView::new(self, k)
    }

    /// Restartable sequence of single-orbit views.
    pub fn orbits(&self) -> OrbitSeq<'_> {
        OrbitSeq::new(self)
    }

    fn rebuild(&self, pos: Vec<Vec3>, vel: Vec<Vec3>, t: Option<Vec<f64>>, norbits: usize) -> Orbit {
        Orbit {
            ntimes: pos.len() / norbits,
            pos,
            vel,
            t,
            norbits,
            units: self.units,
            potential: self.potential.clone(),
            frame: self.frame,
            hamiltonian: OnceCell::new(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Derived quantities
    // ---------------------------------------------------------------------------------------------

    fn sample_matrix(&self, f: impl Fn(&Vec3, &Vec3) -> f64) -> DMatrix<f64> {
        DMatrix::from_fn(self.ntimes, self.norbits, |it, k| {
            f(self.pos(it, k), self.vel(it, k))
        })
    }

    /// Spherical radius `|q|`, shape `(ntimes, norbits)`.
    pub fn spherical_radius(&self) -> DMatrix<f64> {
        self.sample_matrix(|q, _| q.norm())
    }

    /// Cylindrical radius `sqrt(x² + y²)`, shape `(ntimes, norbits)`.
    pub fn cylindrical_radius(&self) -> DMatrix<f64> {
        self.sample_matrix(|q, _| q.x.hypot(q.y))
    }

    /// Vertical coordinate `z`, shape `(ntimes, norbits)`.
    pub fn z(&self) -> DMatrix<f64> {
        self.sample_matrix(|q, _| q.z)
    }

    /// Specific angular momentum `q × v`, time-major like the positions.
    pub fn angular_momentum(&self) -> Vec<Vec3> {
        self.pos.iter().zip(&self.vel).map(|(q, v)| q.cross(v)).collect()
    }

    /// Specific kinetic energy `½|v|²`, shape `(ntimes, norbits)`.
    pub fn kinetic_energy(&self) -> DMatrix<f64> {
        self.sample_matrix(|_, v| 0.5 * v.norm_squared())
    }

    fn sample_time(&self, it: usize) -> f64 {
        self.t.as_ref().map_or(0.0, |t| t[it])
    }

    /// Specific potential energy along the orbit, shape `(ntimes, norbits)`.
    ///
    /// Uses `potential` when given, otherwise the potential of the orbit.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::MissingPotential`] if neither is available.
    pub fn potential_energy(
        &self,
        potential: Option<&dyn Potential>,
    ) -> Result<DMatrix<f64>, ApsisError> {
        let potential: &dyn Potential = match potential {
            Some(p) => p,
            None => self
                .hamiltonian()
                .map(|h| h.potential.as_ref())
                .ok_or_else(|| {
                    ApsisError::MissingPotential(
                        "to compute the potential energy, a potential must be provided".into(),
                    )
                })?,
        };
        Ok(DMatrix::from_fn(self.ntimes, self.norbits, |it, k| {
            potential.value(self.pos(it, k), self.sample_time(it))
        }))
    }

    /// Specific total energy along the orbit, shape `(ntimes, norbits)`.
    ///
    /// Uses `hamiltonian` when given, otherwise [`Orbit::hamiltonian`].
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::MissingHamiltonian`] if neither is available.
    pub fn energy(&self, hamiltonian: Option<&Hamiltonian>) -> Result<DMatrix<f64>, ApsisError> {
        let hamiltonian = match hamiltonian {
            Some(h) => h,
            None => self.hamiltonian().ok_or_else(|| {
                ApsisError::MissingHamiltonian(
                    "to compute the total energy, a Hamiltonian must be provided".into(),
                )
            })?,
        };
        Ok(DMatrix::from_fn(self.ntimes, self.norbits, |it, k| {
            hamiltonian.energy(self.pos(it, k), self.vel(it, k), self.sample_time(it))
        }))
    }

    /// Phase-space array of shape `(6, ntimes * norbits)`, rows `x y z vx vy vz`.
    ///
    /// Values are converted from the units of the orbit to `units` when given.
    ///
    /// Errors
    /// ----------
    /// * [`ApsisError::IncompatibleUnits`] if `units` cannot express lengths and times of
    ///   the orbit.
    pub fn w(&self, units: Option<&UnitSystem>) -> Result<DMatrix<f64>, ApsisError> {
        let (fq, fv) = match units {
            Some(us) => (
                self.units.length().conversion_factor(&us.length())?,
                self.units.velocity().conversion_factor(&us.velocity())?,
            ),
            None => (1.0, 1.0),
        };
        Ok(DMatrix::from_fn(6, self.pos.len(), |row, j| match row {
            0..=2 => self.pos[j][row] * fq,
            _ => self.vel[j][row - 3] * fv,
        }))
    }

    /// Apply `f` to every orbit of the batch, in parallel with the `parallel` feature.
    pub(crate) fn map_orbits<T, F>(&self, f: F) -> Result<Vec<T>, ApsisError>
    where
        T: Send,
        F: Fn(OrbitView<'_>) -> Result<T, ApsisError> + Sync + Send,
    {
        debug!("dispatching {} orbits", self.norbits);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..self.norbits)
                .into_par_iter()
                .map(|k| f(OrbitView::new(self, k)?))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.orbits().iter().map(f).collect()
        }
    }
}
