//! # Cartesian position and velocity vectors
//!
//! [`Position`] (meters) and [`Velocity`] (m/s), thin wrappers over
//! [`nalgebra::Vector3`] that carry the crate validity convention: any
//! non-finite component makes the value invalid, and a velocity is additionally
//! invalid when its magnitude exceeds the speed of light.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::Vector3;

use crate::constants::{DPI, VLIGHT};
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::quantity::interval::Interval;
use crate::quantity::speed::Speed;

/// Decompose a cartesian vector into longitude ([0, 2π)), latitude and norm.
pub(crate) fn to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let r = v.norm();
    if r == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lat = (v.z / r).asin();
    let mut lon = v.y.atan2(v.x);
    if lon < 0.0 {
        lon += DPI;
    }
    (lon, lat, r)
}

/// Build a unit vector from spherical longitude and latitude in radians.
pub(crate) fn unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let cl = lat.cos();
    Vector3::new(cl * lon.cos(), cl * lon.sin(), lat.sin())
}

/// A position vector in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    v: Vector3<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { v: Vector3::new(x, y, z) }
    }

    pub fn from_vector(v: Vector3<f64>) -> Self {
        Position { v }
    }

    /// The origin of the coordinate system.
    pub fn origin() -> Self {
        Position { v: Vector3::zeros() }
    }

    /// The underlying cartesian components in meters.
    pub fn vector(&self) -> &Vector3<f64> {
        &self.v
    }

    /// Distance from the origin.
    pub fn distance(&self) -> Distance {
        Distance::new(self.v.norm())
    }

    pub fn dot(&self, other: &Position) -> f64 {
        self.v.dot(&other.v)
    }

    /// Scalar projection of this position onto the direction of `other`, in meters.
    /// Zero when `other` is the origin.
    pub fn projection_on(&self, other: &Position) -> f64 {
        let n = other.v.norm();
        if n == 0.0 {
            return 0.0;
        }
        self.v.dot(&other.v) / n
    }

    /// Spherical decomposition: longitude in [0, 2π), latitude, and distance.
    pub fn as_spherical(&self) -> (TimeAngle, Angle, Distance) {
        let (lon, lat, r) = to_spherical(&self.v);
        (TimeAngle::new(lon), Angle::new(lat), Distance::new(r))
    }

    pub fn is_valid(&self) -> bool {
        self.v.iter().all(|c| c.is_finite())
    }

    /// Compare componentwise within an explicit tolerance in meters.
    pub fn is_equal(&self, other: &Position, precision: f64) -> bool {
        (self.v - other.v).norm() <= precision
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}) m", self.v.x, self.v.y, self.v.z)
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Position {
        Position { v: self.v + rhs.v }
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Position {
        Position { v: self.v - rhs.v }
    }
}

impl Neg for Position {
    type Output = Position;
    fn neg(self) -> Position {
        Position { v: -self.v }
    }
}

impl Mul<f64> for Position {
    type Output = Position;
    fn mul(self, rhs: f64) -> Position {
        Position { v: self.v * rhs }
    }
}

/// A velocity vector in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    v: Vector3<f64>,
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Velocity { v: Vector3::new(x, y, z) }
    }

    pub fn from_vector(v: Vector3<f64>) -> Self {
        Velocity { v }
    }

    /// A velocity at rest.
    pub fn stationary() -> Self {
        Velocity { v: Vector3::zeros() }
    }

    /// The underlying cartesian components in m/s.
    pub fn vector(&self) -> &Vector3<f64> {
        &self.v
    }

    /// Magnitude of the velocity.
    pub fn speed(&self) -> Speed {
        Speed::new(self.v.norm())
    }

    pub fn dot(&self, other: &Velocity) -> f64 {
        self.v.dot(&other.v)
    }

    /// Scalar projection of this velocity onto a position direction, in m/s.
    /// This is the radial velocity of a source at `pos` moving with this velocity.
    pub fn projection_on(&self, pos: &Position) -> Speed {
        let n = pos.vector().norm();
        if n == 0.0 {
            return Speed::new(0.0);
        }
        Speed::new(self.v.dot(pos.vector()) / n)
    }

    /// Displacement covered in the given interval at this constant velocity.
    pub fn travel(&self, dt: &Interval) -> Position {
        Position::from_vector(self.v * dt.tt_seconds())
    }

    /// Spherical decomposition: direction longitude/latitude and magnitude.
    pub fn as_spherical(&self) -> (TimeAngle, Angle, Speed) {
        let (lon, lat, r) = to_spherical(&self.v);
        (TimeAngle::new(lon), Angle::new(lat), Speed::new(r))
    }

    /// Valid when all components are finite and the magnitude does not exceed `c`.
    pub fn is_valid(&self) -> bool {
        self.v.iter().all(|c| c.is_finite()) && self.v.norm() <= VLIGHT
    }

    /// Compare componentwise within an explicit tolerance in m/s.
    pub fn is_equal(&self, other: &Velocity, precision: f64) -> bool {
        (self.v - other.v).norm() <= precision
    }
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6}) m/s", self.v.x, self.v.y, self.v.z)
    }
}

impl Add for Velocity {
    type Output = Velocity;
    fn add(self, rhs: Velocity) -> Velocity {
        Velocity { v: self.v + rhs.v }
    }
}

impl Sub for Velocity {
    type Output = Velocity;
    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity { v: self.v - rhs.v }
    }
}

impl Neg for Velocity {
    type Output = Velocity;
    fn neg(self) -> Velocity {
        Velocity { v: -self.v }
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;
    fn mul(self, rhs: f64) -> Velocity {
        Velocity { v: self.v * rhs }
    }
}

#[cfg(test)]
mod vectors_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spherical_round_trip() {
        let p = Position::new(1.0, 1.0, 2f64.sqrt());
        let (lon, lat, r) = p.as_spherical();
        assert_relative_eq!(lon.deg(), 45.0, epsilon = 1e-12);
        assert_relative_eq!(lat.deg(), 45.0, epsilon = 1e-12);
        assert_relative_eq!(r.m(), 2.0, epsilon = 1e-12);

        let back = unit_vector(lon.rad(), lat.rad()) * r.m();
        assert!(p.is_equal(&Position::from_vector(back), 1e-12));
    }

    #[test]
    fn test_origin_decomposition() {
        let (lon, lat, r) = Position::origin().as_spherical();
        assert_eq!(lon.rad(), 0.0);
        assert_eq!(lat.rad(), 0.0);
        assert_eq!(r.m(), 0.0);
    }

    #[test]
    fn test_projection() {
        let p = Position::new(3.0, 4.0, 0.0);
        let v = Velocity::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v.projection_on(&p).ms(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(p.projection_on(&Position::new(1.0, 0.0, 0.0)), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_validity() {
        assert!(Velocity::stationary().is_valid());
        assert!(!Velocity::new(VLIGHT, VLIGHT, 0.0).is_valid());
        assert!(!Position::new(f64::NAN, 0.0, 0.0).is_valid());
    }

    #[test]
    fn test_travel() {
        let v = Velocity::new(10.0, 0.0, -5.0);
        let d = v.travel(&Interval::from_seconds(60.0));
        assert!(d.is_equal(&Position::new(600.0, 0.0, -300.0), 1e-9));
    }
}
