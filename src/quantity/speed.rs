//! # Speeds and radial velocities
//!
//! [`Speed`] is a signed scalar speed in m/s, limited to the speed of light.
//! Composition with `+` and `-` is relativistic, so chaining boosts can never
//! exceed `c`. Spectroscopic redshift conversions use the full relativistic
//! Doppler formula.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use nalgebra::Vector3;

use crate::constants::{AU, KM, SECONDS_PER_DAY, VLIGHT};
use crate::quantity::interval::Interval;
use crate::quantity::distance::Distance;
use crate::vectors::Velocity;

/// A signed scalar speed in m/s. Positive radial velocities recede.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed {
    ms: f64,
}

impl Speed {
    /// New speed from m/s.
    pub fn new(ms: f64) -> Self {
        Speed { ms }
    }

    pub fn from_kms(kms: f64) -> Self {
        Speed::new(kms * KM)
    }

    /// New speed from AU per day.
    pub fn from_au_per_day(aud: f64) -> Self {
        Speed::new(aud * AU / SECONDS_PER_DAY)
    }

    /// New speed from the dimensionless β = v/c.
    pub fn from_beta(beta: f64) -> Self {
        Speed::new(beta * VLIGHT)
    }

    /// Recession speed corresponding to a spectroscopic redshift `z`, from the
    /// relativistic Doppler relation `1 + z = sqrt((1+β)/(1−β))`.
    pub fn from_redshift(z: f64) -> Self {
        let q = (1.0 + z) * (1.0 + z);
        Speed::from_beta((q - 1.0) / (q + 1.0))
    }

    pub fn ms(&self) -> f64 {
        self.ms
    }

    pub fn kms(&self) -> f64 {
        self.ms / KM
    }

    pub fn au_per_day(&self) -> f64 {
        self.ms * SECONDS_PER_DAY / AU
    }

    /// The dimensionless β = v/c.
    pub fn beta(&self) -> f64 {
        self.ms / VLIGHT
    }

    /// The Lorentz factor γ = 1/sqrt(1 − β²).
    pub fn gamma(&self) -> f64 {
        1.0 / (1.0 - self.beta() * self.beta()).sqrt()
    }

    /// The spectroscopic redshift of a source receding at this speed.
    pub fn redshift(&self) -> f64 {
        let b = self.beta();
        ((1.0 + b) / (1.0 - b)).sqrt() - 1.0
    }

    /// Distance covered in the given interval at this (constant) speed.
    pub fn travel(&self, dt: &Interval) -> Distance {
        Distance::new(self.ms * dt.tt_seconds())
    }

    /// A velocity vector of this magnitude along the given direction. The
    /// direction is normalized; a zero direction yields an invalid velocity.
    pub fn to_velocity(&self, direction: &Vector3<f64>) -> Velocity {
        let n = direction.norm();
        Velocity::from_vector(direction * (self.ms / n))
    }

    /// Speeds are valid when finite and subluminal (|v| ≤ c).
    pub fn is_valid(&self) -> bool {
        self.ms.is_finite() && self.ms.abs() <= VLIGHT
    }

    /// Compare within an explicit tolerance in m/s.
    pub fn is_equal(&self, other: &Speed, precision: f64) -> bool {
        (self.ms - other.ms).abs() <= precision
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} km/s", self.kms())
    }
}

impl Add for Speed {
    type Output = Speed;

    /// Relativistic velocity addition: `(v₁ + v₂) / (1 + v₁v₂/c²)`.
    fn add(self, rhs: Speed) -> Speed {
        Speed::new((self.ms + rhs.ms) / (1.0 + self.ms * rhs.ms / (VLIGHT * VLIGHT)))
    }
}

impl Sub for Speed {
    type Output = Speed;

    fn sub(self, rhs: Speed) -> Speed {
        self + (-rhs)
    }
}

impl Neg for Speed {
    type Output = Speed;

    fn neg(self) -> Speed {
        Speed::new(-self.ms)
    }
}

#[cfg(test)]
mod speed_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relativistic_sum_capped() {
        let v = Speed::from_beta(0.9);
        let sum = v + v;
        assert!(sum.beta() < 1.0);
        assert_relative_eq!(sum.beta(), 1.8 / 1.81, epsilon = 1e-12);
    }

    #[test]
    fn test_galilean_limit() {
        let a = Speed::from_kms(10.0);
        let b = Speed::from_kms(20.0);
        assert_relative_eq!((a + b).kms(), 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_redshift_round_trip() {
        let v = Speed::from_kms(30_000.0);
        let z = v.redshift();
        assert!(Speed::from_redshift(z).is_equal(&v, 1e-6));
        // Low-velocity limit: z ≈ β
        let slow = Speed::from_kms(3.0);
        assert_relative_eq!(slow.redshift(), slow.beta(), epsilon = 1e-7);
    }

    #[test]
    fn test_superluminal_invalid() {
        assert!(!Speed::new(VLIGHT * 1.001).is_valid());
        assert!(Speed::new(-VLIGHT).is_valid());
        assert!(!Speed::new(f64::NAN).is_valid());
    }

    #[test]
    fn test_travel() {
        let v = Speed::from_kms(1.0);
        let d = v.travel(&Interval::from_seconds(3600.0));
        assert_relative_eq!(d.km(), 3600.0, epsilon = 1e-9);
    }
}
