//! # Equatorial coordinates
//!
//! [`Equatorial`] is a right ascension / declination pair with a distance, referred
//! to an explicit [`Equinox`]. It is the hub of the spherical conversions: every
//! other frame converts to or from it.

use std::fmt;

use crate::equinox::Equinox;
use crate::quantity::angle::{Angle, Separator, TimeAngle};
use crate::quantity::distance::Distance;
use crate::ref_system::{icrs_to_galactic, obleq, rotation_between, rotmt};
use crate::spherical::{separation, Ecliptic, Galactic};
use crate::vectors::{to_spherical, unit_vector, Position};

/// A sky position in an equatorial coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Equatorial {
    ra: TimeAngle,
    dec: Angle,
    distance: Distance,
    system: Equinox,
}

impl Equatorial {
    /// New position from right ascension, declination and distance in the given
    /// system.
    pub fn new(ra: TimeAngle, dec: Angle, distance: Distance, system: &Equinox) -> Self {
        Equatorial { ra, dec, distance, system: system.clone() }
    }

    /// New position on the unit sphere (default catalog distance) in the given
    /// system.
    pub fn from_angles(ra: TimeAngle, dec: Angle, system: &Equinox) -> Self {
        Equatorial::new(ra, dec, *Distance::at_gpc(), system)
    }

    /// Parse a sexagesimal coordinate pair, right ascension in HMS and declination
    /// in DMS, e.g. `("12:00:00.00", "-30:00:00")`.
    ///
    /// A component that does not parse leaves that angle invalid; the position then
    /// reports `is_valid() == false`.
    pub fn from_string(ra: &str, dec: &str, system: &Equinox) -> Self {
        Equatorial::from_angles(TimeAngle::from_hms(ra), Angle::from_dms(dec), system)
    }

    /// Recover a position from a cartesian vector in the given system.
    pub fn from_position(pos: &Position, system: &Equinox) -> Self {
        let (ra, dec, distance) = pos.as_spherical();
        Equatorial::new(ra, dec, distance, system)
    }

    pub fn ra(&self) -> TimeAngle {
        self.ra
    }

    pub fn dec(&self) -> Angle {
        self.dec
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn system(&self) -> &Equinox {
        &self.system
    }

    /// The cartesian position, scaled by the distance.
    pub fn position(&self) -> Position {
        let v = unit_vector(self.ra.rad(), self.dec.rad()) * self.distance.m();
        Position::from_vector(v)
    }

    /// Re-express this position in another equatorial system.
    ///
    /// An invalid source or target system yields NaN coordinates. The distance is
    /// carried over unchanged.
    pub fn to_system(&self, system: &Equinox) -> Equatorial {
        if self.system == *system {
            return Equatorial { system: system.clone(), ..self.clone() };
        }
        let rot = rotation_between(&self.system, system);
        let v = rot * unit_vector(self.ra.rad(), self.dec.rad());
        let (lon, lat, _) = to_spherical(&v);
        Equatorial::new(TimeAngle::new(lon), Angle::new(lat), self.distance, system)
    }

    /// The same direction in ecliptic coordinates of the same equinox.
    ///
    /// The obliquity is evaluated at the system's own date; ICRS-family systems use
    /// the J2000 obliquity.
    pub fn to_ecliptic(&self) -> Ecliptic {
        let eps = obleq(self.system.jd());
        let v = rotmt(-eps, 0) * unit_vector(self.ra.rad(), self.dec.rad());
        let (lon, lat, _) = to_spherical(&v);
        Ecliptic::new(TimeAngle::new(lon), Angle::new(lat), self.distance, &self.system)
    }

    /// The same direction in galactic coordinates. The position is first brought to
    /// ICRS, since the galactic frame is defined against it.
    pub fn to_galactic(&self) -> Galactic {
        let icrs = self.to_system(Equinox::icrs());
        let v = icrs_to_galactic() * unit_vector(icrs.ra.rad(), icrs.dec.rad());
        let (lon, lat, _) = to_spherical(&v);
        Galactic::new(TimeAngle::new(lon), Angle::new(lat), self.distance)
    }

    /// Angular separation from another equatorial position, which is first brought
    /// to this position's system.
    pub fn angle_to(&self, other: &Equatorial) -> Angle {
        let o = other.to_system(&self.system);
        separation(self.ra.rad(), self.dec.rad(), o.ra.rad(), o.dec.rad())
    }

    pub fn is_valid(&self) -> bool {
        self.ra.is_valid()
            && self.dec.is_valid()
            && self.distance.is_valid()
            && self.system.is_valid()
    }
}

impl fmt::Display for Equatorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EQU {} {} ({})",
            self.ra.to_hms_string(Separator::Colon, 2),
            self.dec.to_dms_string(Separator::Colon, 1),
            self.system.name()
        )
    }
}

#[cfg(test)]
mod equatorial_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_string() {
        let eq = Equatorial::from_string("12:00:00.00", "-30:00:00", Equinox::icrs());
        assert!(eq.is_valid());
        assert_abs_diff_eq!(eq.ra().hours(), 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eq.dec().deg(), -30.0, epsilon = 1e-12);

        let bad = Equatorial::from_string("nope", "-30:00:00", Equinox::icrs());
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_identity_to_same_system() {
        let eq = Equatorial::from_string("06:45:08.92", "-16:42:58.0", Equinox::icrs());
        let same = eq.to_system(Equinox::icrs());
        assert!(eq.ra().is_equal(&same.ra(), 1e-15));
        assert!(eq.dec().is_equal(&same.dec(), 1e-15));
    }

    #[test]
    fn test_system_round_trip() {
        let eq = Equatorial::from_string("06:45:08.92", "-16:42:58.0", Equinox::icrs());
        let tod = eq.to_system(&Equinox::true_of_date(2_460_000.5));
        let back = tod.to_system(Equinox::icrs());
        assert!(eq.ra().is_equal(&back.ra(), 1e-12));
        assert!(eq.dec().is_equal(&back.dec(), 1e-12));
        assert_abs_diff_eq!(eq.distance().m(), back.distance().m());
    }

    #[test]
    fn test_ecliptic_round_trip() {
        let eq = Equatorial::from_string("18:30:00", "23:26:00", Equinox::j2000());
        let ecl = eq.to_ecliptic();
        let back = ecl.to_equatorial();
        assert!(eq.ra().is_equal(&back.ra(), 1e-12));
        assert!(eq.dec().is_equal(&back.dec(), 1e-12));
    }

    #[test]
    fn test_solstice_direction() {
        // The June solstice point: RA 6h at dec +obliquity lies on the ecliptic
        // at longitude 90.
        let eps = obleq(Equinox::j2000().jd());
        let eq = Equatorial::new(
            TimeAngle::from_hours(6.0),
            Angle::new(eps),
            Distance::from_pc(1.0),
            Equinox::j2000(),
        );
        let ecl = eq.to_ecliptic();
        assert_abs_diff_eq!(ecl.lat().deg(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ecl.lon().deg(), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_galactic_center() {
        // Sgr A* sits within a fraction of a degree of the galactic origin.
        let eq = Equatorial::from_string("17:45:40.04", "-29:00:28.1", Equinox::icrs());
        let gal = eq.to_galactic();
        assert!(gal.lat().deg().abs() < 0.1);
        assert!(gal.lon().deg() < 0.1 || gal.lon().deg() > 359.9);
    }

    #[test]
    fn test_invalid_system_poisons() {
        let eq = Equatorial::from_string("12:00:00", "00:00:00", Equinox::invalid());
        assert!(!eq.is_valid());
        let moved = eq.to_system(Equinox::j2000());
        assert!(!moved.is_valid());
    }

    #[test]
    fn test_angle_to() {
        let a = Equatorial::from_string("12:00:00", "30:00:00", Equinox::icrs());
        let b = Equatorial::from_string("12:00:00", "31:00:00", Equinox::icrs());
        assert_abs_diff_eq!(a.angle_to(&b).deg(), 1.0, epsilon = 1e-12);
        // Separation is frame independent.
        let b_tod = b.to_system(&Equinox::true_of_date(2_460_000.5));
        assert_abs_diff_eq!(a.angle_to(&b_tod).deg(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_position_round_trip() {
        let eq = Equatorial::new(
            TimeAngle::from_hours(5.5),
            Angle::from_degrees(-7.4),
            Distance::from_pc(150.0),
            Equinox::icrs(),
        );
        let back = Equatorial::from_position(&eq.position(), Equinox::icrs());
        assert!(eq.ra().is_equal(&back.ra(), 1e-12));
        assert!(eq.dec().is_equal(&back.dec(), 1e-12));
        assert!(eq.distance().is_equal(&back.distance(), 1e-3));
    }
}
