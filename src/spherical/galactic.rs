//! Galactic longitude and latitude in the IAU 1958 frame, tied to ICRS through a
//! fixed rotation. Galactic positions carry no equinox of their own.

use std::fmt;

use crate::equinox::Equinox;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::ref_system::icrs_to_galactic;
use crate::spherical::{separation, Ecliptic, Equatorial};
use crate::vectors::{to_spherical, unit_vector};

/// A sky position in galactic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galactic {
    lon: TimeAngle,
    lat: Angle,
    distance: Distance,
}

impl Galactic {
    pub fn new(lon: TimeAngle, lat: Angle, distance: Distance) -> Self {
        Galactic { lon, lat, distance }
    }

    /// New position on the unit sphere (default catalog distance).
    pub fn from_angles(lon: TimeAngle, lat: Angle) -> Self {
        Galactic::new(lon, lat, *Distance::at_gpc())
    }

    /// Galactic longitude, measured from the galactic center direction.
    pub fn lon(&self) -> TimeAngle {
        self.lon
    }

    /// Galactic latitude.
    pub fn lat(&self) -> Angle {
        self.lat
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// The same direction in the given equatorial system. The fixed rotation lands
    /// in ICRS; anything else is one more frame rotation away.
    pub fn to_equatorial(&self, system: &Equinox) -> Equatorial {
        let v = icrs_to_galactic().transpose() * unit_vector(self.lon.rad(), self.lat.rad());
        let (ra, dec, _) = to_spherical(&v);
        Equatorial::new(TimeAngle::new(ra), Angle::new(dec), self.distance, Equinox::icrs())
            .to_system(system)
    }

    /// The same direction in ecliptic coordinates of the given system, through the
    /// equatorial frame.
    pub fn to_ecliptic(&self, system: &Equinox) -> Ecliptic {
        self.to_equatorial(system).to_ecliptic()
    }

    pub fn angle_to(&self, other: &Galactic) -> Angle {
        separation(self.lon.rad(), self.lat.rad(), other.lon.rad(), other.lat.rad())
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_valid() && self.lat.is_valid() && self.distance.is_valid()
    }
}

impl fmt::Display for Galactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GAL {:.6}° {:+.6}°", self.lon.deg(), self.lat.deg())
    }
}

#[cfg(test)]
mod galactic_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_north_galactic_pole() {
        let ngp = Galactic::from_angles(TimeAngle::new(0.0), Angle::from_degrees(90.0));
        let eq = ngp.to_equatorial(Equinox::icrs());
        assert_abs_diff_eq!(eq.ra().deg(), 192.859_48, epsilon = 1e-4);
        assert_abs_diff_eq!(eq.dec().deg(), 27.128_25, epsilon = 1e-4);
    }

    #[test]
    fn test_equatorial_round_trip() {
        let gal = Galactic::from_angles(
            TimeAngle::from_degrees(33.3),
            Angle::from_degrees(-12.5),
        );
        let back = gal.to_equatorial(Equinox::j2000()).to_galactic();
        assert!(gal.lon().is_equal(&back.lon(), 1e-12));
        assert!(gal.lat().is_equal(&back.lat(), 1e-12));
        assert_abs_diff_eq!(gal.distance().m(), back.distance().m());
    }
}
