#![allow(dead_code)]

use std::sync::{Mutex, Once};

use apsis::constants::Vec3;
use apsis::orbit::Orbit;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// `n` samples starting at 0 with step `dt`.
pub fn sampled_times(n: usize, dt: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * dt).collect()
}

/// Batch of orbits given as phase-space functions of time.
pub fn batch_from_fns(t: &[f64], orbits: &[&dyn Fn(f64) -> (Vec3, Vec3)]) -> Orbit {
    let mut pos = Vec::with_capacity(t.len() * orbits.len());
    let mut vel = Vec::with_capacity(t.len() * orbits.len());
    for &ti in t {
        for w in orbits {
            let (q, v) = w(ti);
            pos.push(q);
            vel.push(v);
        }
    }
    Orbit::batch(pos, vel, Some(t.to_vec()), orbits.len()).unwrap()
}

/// Purely radial motion along x with `r(t) = a + b sin(ω t + φ)`.
pub fn radial(a: f64, b: f64, omega: f64, phase: f64) -> impl Fn(f64) -> (Vec3, Vec3) {
    move |t| {
        let arg = omega * t + phase;
        (
            Vec3::new(a + b * arg.sin(), 0.0, 0.0),
            Vec3::new(b * omega * arg.cos(), 0.0, 0.0),
        )
    }
}

/// `r(t) = 2 + sin t` over `[0, 20]` sampled every 0.01.
pub fn reference_radial_orbit() -> Orbit {
    let t = sampled_times(2001, 0.01);
    batch_from_fns(&t, &[&radial(2.0, 1.0, 1.0, 0.0)])
}

/// Short-axis tube: unit circle in the xy plane with a small vertical oscillation.
pub fn z_tube(t: f64) -> (Vec3, Vec3) {
    (
        Vec3::new(t.cos(), t.sin(), 0.2 * (2.3 * t).sin()),
        Vec3::new(-t.sin(), t.cos(), 0.46 * (2.3 * t).cos()),
    )
}

/// Long-axis tube: unit circle in the yz plane with a small oscillation along x.
pub fn x_tube(t: f64) -> (Vec3, Vec3) {
    (
        Vec3::new(0.1 * (3.0 * t).cos(), t.cos(), t.sin()),
        Vec3::new(-0.3 * (3.0 * t).sin(), -t.sin(), t.cos()),
    )
}

/// Radial box orbit along x, zero angular momentum.
pub fn radial_box(t: f64) -> (Vec3, Vec3) {
    (Vec3::new(t.cos(), 0.0, 0.0), Vec3::new(-t.sin(), 0.0, 0.0))
}

pub fn assert_same_samples(a: &Orbit, b: &Orbit) {
    assert_eq!(a.ntimes(), b.ntimes());
    assert_eq!(a.norbits(), b.norbits());
    for it in 0..a.ntimes() {
        for k in 0..a.norbits() {
            assert_eq!(a.pos(it, k), b.pos(it, k));
            assert_eq!(a.vel(it, k), b.vel(it, k));
        }
    }
}

/// Logger keeping every warning in memory.
struct WarningCapture {
    records: Mutex<Vec<String>>,
}

impl Log for WarningCapture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static CAPTURE: WarningCapture = WarningCapture {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();
static SERIAL: Mutex<()> = Mutex::new(());

/// Warnings logged while `f` runs.
///
/// Captures are serialized, but tests of the same binary that do not go through this
/// function may still log into a running capture.
pub fn logged_warnings(f: impl FnOnce()) -> Vec<String> {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE).expect("no other logger is installed in tests");
        log::set_max_level(LevelFilter::Warn);
    });

    CAPTURE.records.lock().unwrap().clear();
    f();
    std::mem::take(&mut *CAPTURE.records.lock().unwrap())
}
