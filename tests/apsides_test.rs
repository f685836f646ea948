mod common;

use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, PI};

use apsis::prelude::*;
use uom::si::length::parsec;

use common::{batch_from_fns, radial, reference_radial_orbit, sampled_times};

#[test]
fn test_refined_apsides() {
    let orbit = reference_radial_orbit();

    let peri = orbit.pericenter(&ExtremaRequest::default()).unwrap();
    let apo = orbit.apocenter(&ExtremaRequest::default()).unwrap();
    assert_abs_diff_eq!(peri.scalar().unwrap().value, 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(apo.scalar().unwrap().value, 3.0, epsilon = 1e-6);
    assert!(apo.unit().is_dimensionless());
}

#[test]
fn test_approximate_apsides_within_one_sample() {
    let orbit = reference_radial_orbit();
    let request = ExtremaRequest::all().approximate(true);

    let apo = orbit.apocenter(&request).unwrap();
    let series = &apo.series().unwrap()[0];
    assert_eq!(series.len(), 3);
    for (k, (value, time)) in series.iter().enumerate() {
        assert!((time - (FRAC_PI_2 + 2.0 * PI * k as f64)).abs() <= 0.01);
        assert_abs_diff_eq!(value, 3.0, epsilon = 1e-4);
    }

    let peri = orbit.pericenter(&request).unwrap();
    for (k, (value, time)) in peri.series().unwrap()[0].iter().enumerate() {
        assert!((time - (1.5 * PI + 2.0 * PI * k as f64)).abs() <= 0.01);
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_all_extrema_have_matching_times() {
    let orbit = reference_radial_orbit();
    let peri = orbit.pericenter(&ExtremaRequest::all()).unwrap();
    let series = &peri.series().unwrap()[0];

    assert_eq!(series.values.len(), series.times.len());
    assert_eq!(series.len(), 3);
    for (k, (value, time)) in series.iter().enumerate() {
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(time, 1.5 * PI + 2.0 * PI * k as f64, epsilon = 1e-5);
    }
}

#[test]
fn test_reducing_with_times_is_rejected() {
    let orbit = reference_radial_orbit();
    let request = ExtremaRequest::new(Reduction::Min).with_times(true);
    assert_eq!(
        orbit.pericenter(&request).unwrap_err(),
        ApsisError::ConflictingReduction
    );
    assert_eq!(
        orbit.zmax(&request).unwrap_err(),
        ApsisError::ConflictingReduction
    );
}

#[test]
fn test_eccentricity() {
    let orbit = reference_radial_orbit();
    let e = orbit.eccentricity(&ExtremaParams::default()).unwrap();
    assert_eq!(e.len(), 1);
    assert_abs_diff_eq!(e.values[0], 0.5, epsilon = 1e-6);

    let e_fast = orbit.eccentricity(&ExtremaParams::approximate()).unwrap();
    assert_abs_diff_eq!(e_fast.values[0], 0.5, epsilon = 1e-4);
}

#[test]
fn test_time_reversal_is_transparent() {
    let orbit = reference_radial_orbit();
    let backwards = orbit.reversed();
    assert!(backwards.is_time_reversed());

    let request = ExtremaRequest::default();
    for (f, b) in [
        (orbit.pericenter(&request), backwards.pericenter(&request)),
        (orbit.apocenter(&request), backwards.apocenter(&request)),
    ] {
        assert_abs_diff_eq!(
            f.unwrap().scalar().unwrap().value,
            b.unwrap().scalar().unwrap().value,
            epsilon = 1e-12
        );
    }

    let params = ExtremaParams::default();
    assert_abs_diff_eq!(
        orbit.eccentricity(&params).unwrap().values[0],
        backwards.eccentricity(&params).unwrap().values[0],
        epsilon = 1e-12
    );
}

#[test]
fn test_zmax() {
    let t = sampled_times(2001, 0.01);
    let bob = |t: f64| {
        (
            Vec3::new(1.0, 0.0, 0.5 * t.sin()),
            Vec3::new(0.0, 0.0, 0.5 * t.cos()),
        )
    };
    let orbit = batch_from_fns(&t, &[&bob]);

    let zmax = orbit.zmax(&ExtremaRequest::new(Reduction::Max)).unwrap();
    assert_abs_diff_eq!(zmax.scalar().unwrap().value, 0.5, epsilon = 1e-6);

    // |z| peaks twice per period
    let all = orbit.zmax(&ExtremaRequest::all()).unwrap();
    assert_eq!(all.series().unwrap()[0].len(), 6);
}

#[test]
fn test_batch_apsides() {
    let t = sampled_times(2001, 0.01);
    let orbit = batch_from_fns(
        &t,
        &[&radial(2.0, 1.0, 1.0, 0.0), &radial(3.0, 0.5, 1.0, 0.3)],
    );

    let peri = orbit.pericenter(&ExtremaRequest::default()).unwrap();
    let peri = peri.reduced().unwrap();
    assert_eq!(peri.len(), 2);
    assert_abs_diff_eq!(peri.values[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(peri.values[1], 2.5, epsilon = 1e-6);

    let apo = orbit.apocenter(&ExtremaRequest::all()).unwrap();
    assert_eq!(apo.norbits(), 2);
    assert!(apo.series().unwrap().iter().all(|s| s.values.len() == s.times.len()));

    let e = orbit.eccentricity(&ExtremaParams::default()).unwrap();
    assert_abs_diff_eq!(e.values[1], 0.5 / 3.0, epsilon = 1e-6);
}

#[test]
fn test_units_are_attached() {
    let orbit = reference_radial_orbit().with_units(UnitSystem::galactic());
    let apo = orbit.apocenter(&ExtremaRequest::default()).unwrap();
    let apo = apo.reduced().unwrap();
    assert_eq!(apo.unit, Unit::KPC);

    let apo_pc = apo.to(&Unit::PC).unwrap();
    assert_abs_diff_eq!(apo_pc.values[0], 3000.0, epsilon = 1e-3);
    assert!(apo.to(&Unit::MYR).is_err());

    let lengths = apo.lengths().unwrap();
    assert_abs_diff_eq!(lengths[0].get::<parsec>(), 3000.0, epsilon = 1e-3);
    assert!(apo.times().is_err());
}

#[test]
fn test_nan_time_is_rejected() {
    let t = vec![0.0, 1.0, f64::NAN, 3.0, 4.0, 5.0];
    let pos = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0]
        .iter()
        .map(|&r| Vec3::new(r, 0.0, 0.0))
        .collect();
    let orbit = Orbit::new(pos, vec![Vec3::zeros(); 6], Some(t)).unwrap();

    for request in [ExtremaRequest::all(), ExtremaRequest::all().approximate(true)] {
        assert!(matches!(
            orbit.apocenter(&request),
            Err(ApsisError::NonMonotonicTime(_))
        ));
    }
}
