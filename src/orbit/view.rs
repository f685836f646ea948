//! Borrowed single-orbit views of a batch.
//!
//! [`OrbitSeq`] is the indexable sequence of the orbits in an [`Orbit`]: it is finite,
//! lazy (a view borrows the batch and copies nothing) and restartable (every call to
//! [`OrbitSeq::iter`] starts again from the first orbit).
use std::iter::FusedIterator;

use crate::apsis_errors::ApsisError;
use crate::constants::Vec3;
use crate::orbit::Orbit;

/// Orbit `k` of a batch.
#[derive(Debug, Clone, Copy)]
pub struct OrbitView<'a> {
    orbit: &'a Orbit,
    k: usize,
}

impl<'a> OrbitView<'a> {
    pub fn new(orbit: &'a Orbit, k: usize) -> Result<Self, ApsisError> {
        if k >= orbit.norbits() {
            return Err(ApsisError::IndexOutOfRange {
                index: k,
                len: orbit.norbits(),
            });
        }
        Ok(OrbitView { orbit, k })
    }

    /// Index of this orbit in its batch.
    pub fn index(&self) -> usize {
        self.k
    }

    pub fn batch(&self) -> &'a Orbit {
        self.orbit
    }

    pub fn ntimes(&self) -> usize {
        self.orbit.ntimes()
    }

    pub fn t(&self) -> Option<&'a [f64]> {
        self.orbit.t()
    }

    pub fn pos(&self, it: usize) -> &'a Vec3 {
        self.orbit.pos(it, self.k)
    }

    pub fn vel(&self, it: usize) -> &'a Vec3 {
        self.orbit.vel(it, self.k)
    }

    /// Scalar `f(q, v)` at every sample of this orbit, in time order.
    pub fn sample(&self, f: impl Fn(&Vec3, &Vec3) -> f64) -> Vec<f64> {
        (0..self.ntimes())
            .map(|it| f(self.pos(it), self.vel(it)))
            .collect()
    }

    pub fn spherical_radius(&self) -> Vec<f64> {
        self.sample(|q, _| q.norm())
    }

    pub fn abs_z(&self) -> Vec<f64> {
        self.sample(|q, _| q.z.abs())
    }

    pub fn angular_momentum(&self) -> Vec<Vec3> {
        (0..self.ntimes())
            .map(|it| self.pos(it).cross(self.vel(it)))
            .collect()
    }
}

/// Indexable, restartable sequence of the orbits of a batch.
#[derive(Debug, Clone, Copy)]
pub struct OrbitSeq<'a> {
    orbit: &'a Orbit,
}

impl<'a> OrbitSeq<'a> {
    pub fn new(orbit: &'a Orbit) -> Self {
        OrbitSeq { orbit }
    }

    pub fn len(&self) -> usize {
        self.orbit.norbits()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, k: usize) -> Option<OrbitView<'a>> {
        OrbitView::new(self.orbit, k).ok()
    }

    pub fn iter(&self) -> OrbitIter<'a> {
        OrbitIter {
            orbit: self.orbit,
            range: 0..self.len(),
        }
    }
}

impl<'a> IntoIterator for OrbitSeq<'a> {
    type Item = OrbitView<'a>;
    type IntoIter = OrbitIter<'a>;

    fn into_iter(self) -> OrbitIter<'a> {
        self.iter()
    }
}

/// Iterator over the views of an [`OrbitSeq`].
#[derive(Debug, Clone)]
pub struct OrbitIter<'a> {
    orbit: &'a Orbit,
    range: std::ops::Range<usize>,
}

impl<'a> Iterator for OrbitIter<'a> {
    type Item = OrbitView<'a>;

    fn next(&mut self) -> Option<OrbitView<'a>> {
        self.range.next().map(|k| OrbitView {
            orbit: self.orbit,
            k,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for OrbitIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(|k| OrbitView {
            orbit: self.orbit,
            k,
        })
    }
}

impl ExactSizeIterator for OrbitIter<'_> {}
impl FusedIterator for OrbitIter<'_> {}
