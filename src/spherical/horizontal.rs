//! Azimuth and elevation at an observing site. Azimuth is measured from north
//! through east, the surveyor convention.

use std::fmt;

use crate::constants::HALF_PI;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::spherical::separation;

/// A sky position in the horizontal frame of some observing site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    az: TimeAngle,
    el: Angle,
    distance: Distance,
}

impl Horizontal {
    pub fn new(az: TimeAngle, el: Angle, distance: Distance) -> Self {
        Horizontal { az, el, distance }
    }

    /// New direction on the unit sphere (default catalog distance).
    pub fn from_angles(az: TimeAngle, el: Angle) -> Self {
        Horizontal::new(az, el, *Distance::at_gpc())
    }

    /// Azimuth, north through east.
    pub fn az(&self) -> TimeAngle {
        self.az
    }

    /// Elevation above the horizon.
    pub fn el(&self) -> Angle {
        self.el
    }

    /// Angular distance from the zenith.
    pub fn zenith_distance(&self) -> Angle {
        Angle::new(HALF_PI - self.el.rad())
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Whether the direction is above the local horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.el.rad() > 0.0
    }

    pub fn angle_to(&self, other: &Horizontal) -> Angle {
        separation(self.az.rad(), self.el.rad(), other.az.rad(), other.el.rad())
    }

    pub fn is_valid(&self) -> bool {
        self.az.is_valid() && self.el.is_valid() && self.distance.is_valid()
    }
}

impl fmt::Display for Horizontal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HOR {:.4}° {:+.4}°", self.az.deg(), self.el.deg())
    }
}

#[cfg(test)]
mod horizontal_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zenith_distance() {
        let h = Horizontal::from_angles(TimeAngle::from_degrees(120.0), Angle::from_degrees(30.0));
        assert_abs_diff_eq!(h.zenith_distance().deg(), 60.0, epsilon = 1e-12);
        assert!(h.is_above_horizon());
        assert!(!Horizontal::from_angles(
            TimeAngle::from_degrees(0.0),
            Angle::from_degrees(-0.1)
        )
        .is_above_horizon());
    }

    #[test]
    fn test_angle_to() {
        let a = Horizontal::from_angles(TimeAngle::from_degrees(0.0), Angle::from_degrees(45.0));
        let b = Horizontal::from_angles(TimeAngle::from_degrees(180.0), Angle::from_degrees(45.0));
        assert_abs_diff_eq!(a.angle_to(&b).deg(), 90.0, epsilon = 1e-12);
    }
}
