use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApsisError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("A time array is required: {0}")]
    MissingTime(String),

    #[error("A potential is required: {0}")]
    MissingPotential(String),

    #[error("A Hamiltonian is required: {0}")]
    MissingHamiltonian(String),

    #[error(
        "Cannot return times when reducing extrema; use Reduction::All to get every extremum and its time"
    )]
    ConflictingReduction,

    #[error("Circulation array has shape {found:?}, expected {expected:?} (axes × orbits)")]
    CirculationShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid circulation flags: {0}")]
    InvalidCirculation(String),

    #[error("Not enough samples: need at least {needed}, found {found}")]
    InsufficientSamples { needed: usize, found: usize },

    #[error("Time array must be strictly increasing: {0}")]
    NonMonotonicTime(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid extrema parameter: {0}")]
    InvalidExtremaParameter(String),

    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Orbit index {index} out of range for a batch of {len} orbits")]
    IndexOutOfRange { index: usize, len: usize },
}

impl PartialEq for ApsisError {
    fn eq(&self, other: &Self) -> bool {
        use ApsisError::*;
        match (self, other) {
            (ShapeMismatch(a), ShapeMismatch(b)) => a == b,
            (MissingTime(a), MissingTime(b)) => a == b,
            (MissingPotential(a), MissingPotential(b)) => a == b,
            (MissingHamiltonian(a), MissingHamiltonian(b)) => a == b,
            (
                CirculationShape {
                    expected: e1,
                    found: f1,
                },
                CirculationShape {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (InvalidCirculation(a), InvalidCirculation(b)) => a == b,
            (
                InsufficientSamples {
                    needed: n1,
                    found: f1,
                },
                InsufficientSamples {
                    needed: n2,
                    found: f2,
                },
            ) => n1 == n2 && f1 == f2,
            (NonMonotonicTime(a), NonMonotonicTime(b)) => a == b,
            (Unsupported(a), Unsupported(b)) => a == b,
            (InvalidExtremaParameter(a), InvalidExtremaParameter(b)) => a == b,
            (
                IncompatibleUnits { from: f1, to: t1 },
                IncompatibleUnits { from: f2, to: t2 },
            ) => f1 == f2 && t1 == t2,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (IndexOutOfRange { index: i1, len: l1 }, IndexOutOfRange { index: i2, len: l2 }) => {
                i1 == i2 && l1 == l2
            }

            // Unit variants
            (ConflictingReduction, ConflictingReduction) => true,

            _ => false,
        }
    }
}
