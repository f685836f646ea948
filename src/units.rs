//! # Physical units
//!
//! Unit tags attached to the numbers produced by the estimators. Every conversion goes
//! through the SI quantities of [`uom`].
//!
//! ## Overview
//!
//! - [`LengthUnit`] / [`TimeUnit`] – the units an orbit may be expressed in, each
//!   mapping a raw `f64` to a `uom` [`Length`] or [`Time`] and back.
//! - [`Unit`] – the unit of an output: dimensionless, a length, a time, or a velocity,
//!   specific energy or specific angular momentum built from a length and a time unit.
//! - [`Quantity`] / [`QuantityArray`] – raw values paired with a [`Unit`].
//! - [`UnitSystem`] – plain numbers, or a length unit and a time unit.
//!
//! Conversion and arithmetic between unlike units is a checked error
//! ([`ApsisError::IncompatibleUnits`]), never an implicit coercion. Lengths and times
//! leave the crate as `uom` quantities through [`Quantity::length`],
//! [`QuantityArray::lengths`] and their time counterparts.
//!
//! ## Example
//!
//! ```rust
//! use apsis::units::{Quantity, Unit};
//! use uom::si::length::kilometer;
//!
//! let r = Quantity::new(8.0, Unit::KPC);
//! let r_pc = r.to(&Unit::PC).unwrap();
//! assert!((r_pc.value - 8000.0).abs() < 1e-9);
//! assert!(r.length().unwrap().get::<kilometer>() > 2.4e17);
//!
//! let t = Quantity::new(1.0, Unit::MYR);
//! assert!(r.checked_add(&t).is_err());
//! ```
use std::fmt;
use std::mem::discriminant;
use std::ops::{Mul, Neg};

use serde::Serialize;
use uom::si::available_energy::joule_per_kilogram;
use uom::si::f64::{AvailableEnergy, Length, Time, Velocity};
use uom::si::length::{astronomical_unit, kilometer, meter, parsec};
use uom::si::time::{second, year};
use uom::si::velocity::meter_per_second;

use crate::apsis_errors::ApsisError;
use crate::constants::{GIGA, KILO, MEGA};

/// Length units of an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LengthUnit {
    Meter,
    Kilometer,
    AstronomicalUnit,
    Parsec,
    Kiloparsec,
}

impl LengthUnit {
    /// `value`, expressed in this unit, as a `uom` length.
    pub fn length(self, value: f64) -> Length {
        match self {
            LengthUnit::Meter => Length::new::<meter>(value),
            LengthUnit::Kilometer => Length::new::<kilometer>(value),
            LengthUnit::AstronomicalUnit => Length::new::<astronomical_unit>(value),
            LengthUnit::Parsec => Length::new::<parsec>(value),
            LengthUnit::Kiloparsec => Length::new::<parsec>(KILO * value),
        }
    }

    /// Raw value of `length` in this unit.
    pub fn value_of(self, length: Length) -> f64 {
        match self {
            LengthUnit::Meter => length.get::<meter>(),
            LengthUnit::Kilometer => length.get::<kilometer>(),
            LengthUnit::AstronomicalUnit => length.get::<astronomical_unit>(),
            LengthUnit::Parsec => length.get::<parsec>(),
            LengthUnit::Kiloparsec => length.get::<parsec>() / KILO,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Kilometer => "km",
            LengthUnit::AstronomicalUnit => "AU",
            LengthUnit::Parsec => "pc",
            LengthUnit::Kiloparsec => "kpc",
        }
    }
}

/// Time units of an orbit. A year is the `uom` year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeUnit {
    Second,
    Year,
    Megayear,
    Gigayear,
}

impl TimeUnit {
    /// `value`, expressed in this unit, as a `uom` time.
    pub fn time(self, value: f64) -> Time {
        match self {
            TimeUnit::Second => Time::new::<second>(value),
            TimeUnit::Year => Time::new::<year>(value),
            TimeUnit::Megayear => Time::new::<year>(MEGA * value),
            TimeUnit::Gigayear => Time::new::<year>(GIGA * value),
        }
    }

    /// Raw value of `time` in this unit.
    pub fn value_of(self, time: Time) -> f64 {
        match self {
            TimeUnit::Second => time.get::<second>(),
            TimeUnit::Year => time.get::<year>(),
            TimeUnit::Megayear => time.get::<year>() / MEGA,
            TimeUnit::Gigayear => time.get::<year>() / GIGA,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Year => "yr",
            TimeUnit::Megayear => "Myr",
            TimeUnit::Gigayear => "Gyr",
        }
    }
}

fn unit_velocity(length: LengthUnit, time: TimeUnit) -> Velocity {
    length.length(1.0) / time.time(1.0)
}

/// Unit of a value produced by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    One,
    Length(LengthUnit),
    Time(TimeUnit),
    Velocity(LengthUnit, TimeUnit),
    SpecificEnergy(LengthUnit, TimeUnit),
    AngularMomentum(LengthUnit, TimeUnit),
}

impl Unit {
    pub const ONE: Unit = Unit::One;
    pub const M: Unit = Unit::Length(LengthUnit::Meter);
    pub const KM: Unit = Unit::Length(LengthUnit::Kilometer);
    pub const AU: Unit = Unit::Length(LengthUnit::AstronomicalUnit);
    pub const PC: Unit = Unit::Length(LengthUnit::Parsec);
    pub const KPC: Unit = Unit::Length(LengthUnit::Kiloparsec);
    pub const S: Unit = Unit::Time(TimeUnit::Second);
    pub const YR: Unit = Unit::Time(TimeUnit::Year);
    pub const MYR: Unit = Unit::Time(TimeUnit::Megayear);
    pub const GYR: Unit = Unit::Time(TimeUnit::Gigayear);

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Unit::One)
    }

    /// One of this unit in SI base units.
    pub fn si_value(&self) -> f64 {
        match *self {
            Unit::One => 1.0,
            Unit::Length(l) => l.length(1.0).get::<meter>(),
            Unit::Time(t) => t.time(1.0).get::<second>(),
            Unit::Velocity(l, t) => unit_velocity(l, t).get::<meter_per_second>(),
            Unit::SpecificEnergy(l, t) => {
                let v = unit_velocity(l, t);
                let e: AvailableEnergy = v * v;
                e.get::<joule_per_kilogram>()
            }
            Unit::AngularMomentum(l, t) => (l.length(1.0) * unit_velocity(l, t)).value,
        }
    }

    /// Multiplicative factor converting a value in `self` to a value in `to`.
    ///
    /// Errors
    /// ------
    /// * [`ApsisError::IncompatibleUnits`] if the two units measure different things.
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64, ApsisError> {
        if discriminant(self) != discriminant(to) {
            return Err(incompatible(self, to));
        }
        Ok(self.si_value() / to.si_value())
    }
}

fn incompatible(from: &Unit, to: &impl fmt::Display) -> ApsisError {
    ApsisError::IncompatibleUnits {
        from: from.to_string(),
        to: to.to_string(),
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Unit::One => write!(f, "dimensionless"),
            Unit::Length(l) => write!(f, "{}", l.symbol()),
            Unit::Time(t) => write!(f, "{}", t.symbol()),
            Unit::Velocity(l, t) => write!(f, "{}/{}", l.symbol(), t.symbol()),
            Unit::SpecificEnergy(l, t) => write!(f, "({}/{})^2", l.symbol(), t.symbol()),
            Unit::AngularMomentum(l, t) => write!(f, "{}^2/{}", l.symbol(), t.symbol()),
        }
    }
}

/// A scalar value with an attached unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    pub fn dimensionless(value: f64) -> Self {
        Quantity::new(value, Unit::ONE)
    }

    /// A `uom` length expressed in `unit`.
    pub fn from_length(length: Length, unit: LengthUnit) -> Self {
        Quantity::new(unit.value_of(length), Unit::Length(unit))
    }

    /// A `uom` time expressed in `unit`.
    pub fn from_time(time: Time, unit: TimeUnit) -> Self {
        Quantity::new(unit.value_of(time), Unit::Time(unit))
    }

    /// Convert to another unit measuring the same thing.
    pub fn to(&self, unit: &Unit) -> Result<Quantity, ApsisError> {
        let factor = self.unit.conversion_factor(unit)?;
        Ok(Quantity::new(self.value * factor, *unit))
    }

    /// Raw value expressed in `unit`.
    pub fn value_in(&self, unit: &Unit) -> Result<f64, ApsisError> {
        Ok(self.to(unit)?.value)
    }

    /// Add `other`, converted to the unit of `self`.
    pub fn checked_add(&self, other: &Quantity) -> Result<Quantity, ApsisError> {
        let rhs = other.value_in(&self.unit)?;
        Ok(Quantity::new(self.value + rhs, self.unit))
    }

    /// Subtract `other`, converted to the unit of `self`.
    pub fn checked_sub(&self, other: &Quantity) -> Result<Quantity, ApsisError> {
        let rhs = other.value_in(&self.unit)?;
        Ok(Quantity::new(self.value - rhs, self.unit))
    }

    /// The value as a `uom` length.
    ///
    /// Errors
    /// ------
    /// * [`ApsisError::IncompatibleUnits`] unless the unit is a length.
    pub fn length(&self) -> Result<Length, ApsisError> {
        match self.unit {
            Unit::Length(l) => Ok(l.length(self.value)),
            other => Err(incompatible(&other, &"length")),
        }
    }

    /// The value as a `uom` time.
    ///
    /// Errors
    /// ------
    /// * [`ApsisError::IncompatibleUnits`] unless the unit is a time.
    pub fn time(&self) -> Result<Time, ApsisError> {
        match self.unit {
            Unit::Time(t) => Ok(t.time(self.value)),
            other => Err(incompatible(&other, &"time")),
        }
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.value * rhs, self.unit)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::new(-self.value, self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// A flat array of values sharing one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityArray {
    pub values: Vec<f64>,
    pub unit: Unit,
}

impl QuantityArray {
    pub fn new(values: Vec<f64>, unit: Unit) -> Self {
        QuantityArray { values, unit }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Quantity> {
        self.values.get(i).map(|&v| Quantity::new(v, self.unit))
    }

    /// Convert every value to another unit measuring the same thing.
    pub fn to(&self, unit: &Unit) -> Result<QuantityArray, ApsisError> {
        let factor = self.unit.conversion_factor(unit)?;
        Ok(QuantityArray::new(
            self.values.iter().map(|v| v * factor).collect(),
            *unit,
        ))
    }

    /// Every value as a `uom` length.
    pub fn lengths(&self) -> Result<Vec<Length>, ApsisError> {
        match self.unit {
            Unit::Length(l) => Ok(self.values.iter().map(|&v| l.length(v)).collect()),
            other => Err(incompatible(&other, &"length")),
        }
    }

    /// Every value as a `uom` time.
    pub fn times(&self) -> Result<Vec<Time>, ApsisError> {
        match self.unit {
            Unit::Time(t) => Ok(self.values.iter().map(|&v| t.time(v)).collect()),
            other => Err(incompatible(&other, &"time")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Quantity> + '_ {
        self.values.iter().map(move |&v| Quantity::new(v, self.unit))
    }
}

/// Units of an orbit.
///
/// Velocities are `length/time`, specific energies `length²/time²` and
/// specific angular momenta `length²/time`. A dimensionless system keeps every
/// quantity a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UnitSystem {
    #[default]
    Dimensionless,
    Physical { length: LengthUnit, time: TimeUnit },
}

impl UnitSystem {
    pub fn new(length: LengthUnit, time: TimeUnit) -> Self {
        UnitSystem::Physical { length, time }
    }

    pub fn dimensionless() -> Self {
        UnitSystem::Dimensionless
    }

    /// kpc / Myr, the usual galactic-dynamics system.
    pub fn galactic() -> Self {
        UnitSystem::new(LengthUnit::Kiloparsec, TimeUnit::Megayear)
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, UnitSystem::Dimensionless)
    }

    fn derived(&self, unit: fn(LengthUnit, TimeUnit) -> Unit) -> Unit {
        match *self {
            UnitSystem::Dimensionless => Unit::One,
            UnitSystem::Physical { length, time } => unit(length, time),
        }
    }

    pub fn length(&self) -> Unit {
        self.derived(|l, _| Unit::Length(l))
    }

    pub fn time(&self) -> Unit {
        self.derived(|_, t| Unit::Time(t))
    }

    pub fn velocity(&self) -> Unit {
        self.derived(Unit::Velocity)
    }

    pub fn specific_energy(&self) -> Unit {
        self.derived(Unit::SpecificEnergy)
    }

    pub fn angular_momentum(&self) -> Unit {
        self.derived(Unit::AngularMomentum)
    }
}
