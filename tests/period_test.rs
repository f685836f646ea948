mod common;

use approx::assert_abs_diff_eq;
use std::f64::consts::TAU;

use apsis::prelude::*;

use common::{batch_from_fns, radial, reference_radial_orbit, sampled_times};

#[test]
fn test_radial_period() {
    let orbit = reference_radial_orbit();
    let period = orbit.estimate_period(&PeriodParams::default()).unwrap();
    assert_eq!(period.len(), 1);
    assert_abs_diff_eq!(period.values[0], TAU, epsilon = 0.01);
}

#[test]
fn test_period_of_reversed_orbit() {
    let orbit = reference_radial_orbit();
    let forward = orbit.estimate_period(&PeriodParams::radial()).unwrap();
    let backward = orbit.reversed().estimate_period(&PeriodParams::radial()).unwrap();
    assert_abs_diff_eq!(forward.values[0], backward.values[0], epsilon = 1e-12);
}

#[test]
fn test_batch_periods() {
    let t = sampled_times(4001, 0.01);
    let orbit = batch_from_fns(
        &t,
        &[&radial(2.0, 1.0, 1.0, 0.0), &radial(5.0, 0.5, 2.0, 1.0)],
    )
    .with_units(UnitSystem::galactic());

    let period = orbit.estimate_period(&PeriodParams::default()).unwrap();
    assert_eq!(period.unit, Unit::MYR);
    assert_abs_diff_eq!(period.values[0], TAU, epsilon = 0.01);
    assert_abs_diff_eq!(period.values[1], TAU / 2.0, epsilon = 0.01);
}

#[test]
fn test_flat_radius_has_no_period() {
    let t = sampled_times(1000, 0.05);
    let orbit = batch_from_fns(&t, &[&radial(1.0, 1e-4, 1.0, 0.0)]);
    let period = orbit.estimate_period(&PeriodParams::default()).unwrap();
    assert!(period.values[0].is_nan());

    let loose = PeriodParams::default().amplitude_threshold(1e-5);
    let period = orbit.estimate_period(&loose).unwrap();
    assert_abs_diff_eq!(period.values[0], TAU, epsilon = 0.05);
}

#[test]
fn test_period_preconditions() {
    let orbit = reference_radial_orbit();
    assert!(matches!(
        orbit.estimate_period(&PeriodParams::per_axis()),
        Err(ApsisError::Unsupported(_))
    ));

    let untimed = Orbit::new(
        (0..orbit.ntimes()).map(|it| *orbit.pos(it, 0)).collect(),
        (0..orbit.ntimes()).map(|it| *orbit.vel(it, 0)).collect(),
        None,
    )
    .unwrap();
    assert!(matches!(
        untimed.estimate_period(&PeriodParams::default()),
        Err(ApsisError::MissingTime(_))
    ));
    // the time grid is checked before the period kind
    assert!(matches!(
        untimed.estimate_period(&PeriodParams::per_axis()),
        Err(ApsisError::MissingTime(_))
    ));
}
