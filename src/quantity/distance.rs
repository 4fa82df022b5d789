//! # Distances
//!
//! [`Distance`] stores meters internally and exposes accessors for the usual
//! astronomical length units. A negative or non-finite value is constructible but
//! reports `is_valid() == false`.

use std::fmt;
use std::ops::{Add, Sub};
use std::sync::LazyLock;

use crate::constants::{Meter, AU, DEFAULT_DISTANCE, KM, LIGHT_YEAR, PARSEC, RADSEC};
use crate::quantity::angle::Angle;

static AT_GPC: LazyLock<Distance> = LazyLock::new(|| Distance::from_pc(1e9));

/// A distance, stored in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    m: Meter,
}

impl Distance {
    /// New distance from meters.
    pub fn new(m: Meter) -> Self {
        Distance { m }
    }

    pub fn from_km(km: f64) -> Self {
        Distance::new(km * KM)
    }

    pub fn from_au(au: f64) -> Self {
        Distance::new(au * AU)
    }

    pub fn from_lyr(lyr: f64) -> Self {
        Distance::new(lyr * LIGHT_YEAR)
    }

    pub fn from_pc(pc: f64) -> Self {
        Distance::new(pc * PARSEC)
    }

    /// Distance corresponding to an annual parallax angle.
    ///
    /// A non-positive or invalid parallax yields the default far distance
    /// (1 Gpc), the convention for sources with no measurable parallax.
    pub fn from_parallax(parallax: &Angle) -> Self {
        if !parallax.is_valid() || parallax.rad() <= 0.0 {
            return Distance::new(DEFAULT_DISTANCE);
        }
        Distance::from_pc(1.0 / (parallax.rad() / RADSEC))
    }

    /// The canonical 1 Gpc placeholder distance for sources whose distance is
    /// unknown but effectively infinite for parallax purposes.
    pub fn at_gpc() -> &'static Distance {
        &AT_GPC
    }

    pub fn m(&self) -> Meter {
        self.m
    }

    pub fn km(&self) -> f64 {
        self.m / KM
    }

    pub fn au(&self) -> f64 {
        self.m / AU
    }

    pub fn lyr(&self) -> f64 {
        self.m / LIGHT_YEAR
    }

    pub fn pc(&self) -> f64 {
        self.m / PARSEC
    }

    pub fn kpc(&self) -> f64 {
        self.pc() / 1e3
    }

    pub fn mpc(&self) -> f64 {
        self.pc() / 1e6
    }

    pub fn gpc(&self) -> f64 {
        self.pc() / 1e9
    }

    /// The annual parallax angle corresponding to this distance.
    pub fn parallax(&self) -> Angle {
        Angle::from_arcsec(1.0 / self.pc())
    }

    /// Distances are valid when finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.m.is_finite() && self.m >= 0.0
    }

    /// Compare against another distance within an explicit tolerance in meters.
    pub fn is_equal(&self, other: &Distance, precision: Meter) -> bool {
        (self.m - other.m).abs() <= precision
    }
}

impl fmt::Display for Distance {
    /// Renders with a unit picked for the magnitude: meters below 1 km, then km,
    /// AU, pc, kpc, Mpc and Gpc.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "(invalid distance)");
        }
        let m = self.m;
        if m < KM {
            write!(f, "{m:.3} m")
        } else if m < 0.1 * AU {
            write!(f, "{:.3} km", self.km())
        } else if m < 0.1 * PARSEC {
            write!(f, "{:.6} AU", self.au())
        } else if m < 1e3 * PARSEC {
            write!(f, "{:.6} pc", self.pc())
        } else if m < 1e6 * PARSEC {
            write!(f, "{:.6} kpc", self.kpc())
        } else if m < 1e9 * PARSEC {
            write!(f, "{:.6} Mpc", self.mpc())
        } else {
            write!(f, "{:.6} Gpc", self.gpc())
        }
    }
}

impl Add for Distance {
    type Output = Distance;
    fn add(self, rhs: Distance) -> Distance {
        Distance::new(self.m + rhs.m)
    }
}

impl Sub for Distance {
    type Output = Distance;
    fn sub(self, rhs: Distance) -> Distance {
        Distance::new(self.m - rhs.m)
    }
}

#[cfg(test)]
mod distance_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_units() {
        let d = Distance::from_au(1.0);
        assert_relative_eq!(d.km(), 149_597_870.7, epsilon = 1e-3);
        assert_relative_eq!(Distance::from_pc(1.0).au(), 206_264.806_247, epsilon = 1e-4);
    }

    #[test]
    fn test_parallax_round_trip() {
        let d = Distance::from_pc(25.0);
        let p = d.parallax();
        assert_relative_eq!(p.mas(), 40.0, epsilon = 1e-9);
        assert!(Distance::from_parallax(&p).is_equal(&d, 1e-3));
    }

    #[test]
    fn test_no_parallax_is_far() {
        let d = Distance::from_parallax(&Angle::new(0.0));
        assert_relative_eq!(d.gpc(), 1.0, epsilon = 1e-12);
        assert_eq!(&d, Distance::at_gpc());
    }

    #[test]
    fn test_validity() {
        assert!(!Distance::new(-1.0).is_valid());
        assert!(!Distance::new(f64::NAN).is_valid());
        assert!(Distance::new(0.0).is_valid());
    }

    #[test]
    fn test_display_tiers() {
        assert_eq!(format!("{}", Distance::new(12.5)), "12.500 m");
        assert!(format!("{}", Distance::from_km(250.0)).ends_with("km"));
        assert!(format!("{}", Distance::from_au(5.2)).ends_with("AU"));
        assert!(format!("{}", Distance::from_pc(25.0)).ends_with("pc"));
    }
}
