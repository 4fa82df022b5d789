//! Ecliptic longitude and latitude, referred to the mean ecliptic and equinox of
//! an equatorial system. The obliquity is evaluated at the system's own date.

use std::fmt;

use crate::equinox::Equinox;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::ref_system::{obleq, rotmt};
use crate::spherical::{separation, Equatorial, Galactic};
use crate::vectors::{to_spherical, unit_vector};

/// A sky position in ecliptic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Ecliptic {
    lon: TimeAngle,
    lat: Angle,
    distance: Distance,
    system: Equinox,
}

impl Ecliptic {
    pub fn new(lon: TimeAngle, lat: Angle, distance: Distance, system: &Equinox) -> Self {
        Ecliptic { lon, lat, distance, system: system.clone() }
    }

    /// New position on the unit sphere (default catalog distance).
    pub fn from_angles(lon: TimeAngle, lat: Angle, system: &Equinox) -> Self {
        Ecliptic::new(lon, lat, *Distance::at_gpc(), system)
    }

    /// Ecliptic longitude, measured from the equinox of the system.
    pub fn lon(&self) -> TimeAngle {
        self.lon
    }

    /// Ecliptic latitude.
    pub fn lat(&self) -> Angle {
        self.lat
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn system(&self) -> &Equinox {
        &self.system
    }

    /// The same direction in the equatorial frame of the same equinox.
    pub fn to_equatorial(&self) -> Equatorial {
        let eps = obleq(self.system.jd());
        let v = rotmt(eps, 0) * unit_vector(self.lon.rad(), self.lat.rad());
        let (ra, dec, _) = to_spherical(&v);
        Equatorial::new(TimeAngle::new(ra), Angle::new(dec), self.distance, &self.system)
    }

    /// Re-express in the ecliptic of another equatorial system. Routes through the
    /// equatorial frame, where the inter-system rotation is defined.
    pub fn to_system(&self, system: &Equinox) -> Ecliptic {
        if self.system == *system {
            return Ecliptic { system: system.clone(), ..self.clone() };
        }
        self.to_equatorial().to_system(system).to_ecliptic()
    }

    /// The same direction in galactic coordinates, through the equatorial frame.
    pub fn to_galactic(&self) -> Galactic {
        self.to_equatorial().to_galactic()
    }

    pub fn angle_to(&self, other: &Ecliptic) -> Angle {
        let o = other.to_system(&self.system);
        separation(self.lon.rad(), self.lat.rad(), o.lon.rad(), o.lat.rad())
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_valid()
            && self.lat.is_valid()
            && self.distance.is_valid()
            && self.system.is_valid()
    }
}

impl fmt::Display for Ecliptic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ECL {:.6}° {:+.6}° ({})",
            self.lon.deg(),
            self.lat.deg(),
            self.system.name()
        )
    }
}

#[cfg(test)]
mod ecliptic_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equinox_direction() {
        // The vernal equinox is the origin of both frames.
        let ecl = Ecliptic::from_angles(
            TimeAngle::new(0.0),
            Angle::new(0.0),
            Equinox::j2000(),
        );
        let eq = ecl.to_equatorial();
        assert_abs_diff_eq!(eq.ra().rad(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eq.dec().rad(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ecliptic_pole() {
        let pole = Ecliptic::from_angles(
            TimeAngle::new(0.0),
            Angle::from_degrees(90.0),
            Equinox::j2000(),
        );
        let eq = pole.to_equatorial();
        // The north ecliptic pole is at dec 90° − ε, ra 18h.
        assert_abs_diff_eq!(eq.ra().hours(), 18.0, epsilon = 1e-9);
        assert_abs_diff_eq!(eq.dec().deg(), 90.0 - 23.439_291, epsilon = 1e-3);
    }

    #[test]
    fn test_galactic_round_trip() {
        let ecl = Ecliptic::from_angles(
            TimeAngle::from_degrees(123.4),
            Angle::from_degrees(-21.0),
            Equinox::j2000(),
        );
        let back = ecl.to_galactic().to_ecliptic(Equinox::j2000());
        assert!(ecl.lon().is_equal(&back.lon(), 1e-12));
        assert!(ecl.lat().is_equal(&back.lat(), 1e-12));
    }

    #[test]
    fn test_system_change_round_trip() {
        let ecl = Ecliptic::from_angles(
            TimeAngle::from_degrees(200.0),
            Angle::from_degrees(5.0),
            Equinox::j2000(),
        );
        let mod_sys = Equinox::mean_of_date(2_460_000.5);
        let back = ecl.to_system(&mod_sys).to_system(Equinox::j2000());
        assert!(ecl.lon().is_equal(&back.lon(), 1e-12));
        assert!(ecl.lat().is_equal(&back.lat(), 1e-12));
    }
}
