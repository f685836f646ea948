//! # Apsis
//!
//! Dynamical quantities of sampled orbits: pericenters, apocenters, maximum vertical
//! excursion, eccentricity, radial period and circulation (box versus tube orbits),
//! with sub-sample refinement of every extremum.
//!
//! ```rust
//! use apsis::prelude::*;
//!
//! let t: Vec<f64> = (0..2001).map(|i| i as f64 * 0.01).collect();
//! let pos = t.iter().map(|&ti| Vec3::new(2.0 + ti.sin(), 0.0, 0.0)).collect();
//! let vel = t.iter().map(|&ti| Vec3::new(ti.cos(), 0.0, 0.0)).collect();
//! let orbit = Orbit::new(pos, vel, Some(t)).unwrap();
//!
//! let apo = orbit.apocenter(&ExtremaRequest::default()).unwrap();
//! assert!((apo.scalar().unwrap().value - 3.0).abs() < 1e-6);
//!
//! let e = orbit.eccentricity(&ExtremaParams::default()).unwrap();
//! assert!((e.values[0] - 0.5).abs() < 1e-6);
//! ```
pub mod apsis_errors;
pub mod constants;
pub mod dynamics;
pub mod extrema;
pub mod orbit;
pub mod units;

pub mod prelude {
    pub use crate::apsis_errors::ApsisError;
    pub use crate::constants::Vec3;
    pub use crate::dynamics::{Frame, Hamiltonian, KeplerPotential, LogarithmicPotential, Potential};
    pub use crate::extrema::period::{PeriodKind, PeriodParams};
    pub use crate::extrema::{
        Boundary, Extrema, ExtremaParams, ExtremaRequest, ExtremaSeries, Reduction, RefineMethod,
        SplineDegree,
    };
    pub use crate::orbit::circulation::Circulation;
    pub use crate::orbit::Orbit;
    pub use crate::units::{LengthUnit, Quantity, QuantityArray, TimeUnit, Unit, UnitSystem};
}
