//! # Observers and observing sites
//!
//! [`Site`] is a geodetic location on the GRS80 reference ellipsoid; [`Observer`]
//! places the measurement apparatus somewhere meaningful: at the geocenter, in Earth
//! orbit, at a geodetic site (possibly airborne), or anywhere in the solar system.
//!
//! Geodetic observers carry their own [`Eop`] record, since the Earth-fixed frame
//! they are pinned to is only defined through the Earth orientation parameters.

use std::fmt;

use crate::constants::{EARTH_FLATTENING, EARTH_MAJOR_AXIS, HALF_PI, Meter};
use crate::quantity::angle::{Angle, Separator};
use crate::quantity::distance::Distance;
use crate::time::Eop;
use crate::vectors::{Position, Velocity};

/// Altitude bounds for a plausible observing site, meters.
const MIN_ALTITUDE: f64 = -10_000.0;
const MAX_ALTITUDE: f64 = 100_000.0;

/// A geodetic location on the GRS80 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    longitude: Angle,
    latitude: Angle,
    altitude: Meter,
}

impl Site {
    /// New site from geodetic longitude (east positive), latitude and altitude
    /// above the ellipsoid in meters.
    pub fn new(longitude: Angle, latitude: Angle, altitude: Meter) -> Self {
        let site = Site { longitude, latitude, altitude };
        if !site.is_valid() {
            log::debug!("Site::new: implausible site {site}");
        }
        site
    }

    /// New site from GPS-style decimal degrees and meters. WGS84 coordinates are
    /// treated as GRS80; the two ellipsoids agree to a fraction of a millimeter.
    pub fn from_gps(latitude_deg: f64, longitude_deg: f64, altitude: Meter) -> Self {
        Site::new(
            Angle::from_degrees(longitude_deg),
            Angle::from_degrees(latitude_deg),
            altitude,
        )
    }

    /// Recover a geodetic site from an Earth-fixed cartesian position.
    ///
    /// Uses the classic fixed-point iteration on the geodetic latitude, which
    /// converges to sub-millimeter in a handful of rounds for any terrestrial
    /// point.
    pub fn from_xyz(pos: &Position) -> Self {
        let v = pos.vector();
        let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
        let p = (v.x * v.x + v.y * v.y).sqrt();

        let longitude = Angle::new(v.y.atan2(v.x));

        if p == 0.0 {
            // On the polar axis the longitude is arbitrary.
            let lat = if v.z >= 0.0 { HALF_PI } else { -HALF_PI };
            let alt = v.z.abs() - EARTH_MAJOR_AXIS * (1.0 - EARTH_FLATTENING);
            return Site::new(Angle::new(0.0), Angle::new(lat), alt);
        }

        let mut lat = (v.z / (p * (1.0 - e2))).atan();
        let mut n = EARTH_MAJOR_AXIS;
        for _ in 0..8 {
            let s = lat.sin();
            n = EARTH_MAJOR_AXIS / (1.0 - e2 * s * s).sqrt();
            lat = (v.z + e2 * n * s).atan2(p);
        }
        let altitude = p / lat.cos() - n;

        Site::new(longitude, Angle::new(lat), altitude)
    }

    /// The Earth-fixed cartesian position of the site.
    pub fn xyz(&self) -> Position {
        let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
        let (slat, clat) = (self.latitude.sin(), self.latitude.cos());
        let (slon, clon) = (self.longitude.sin(), self.longitude.cos());
        let n = EARTH_MAJOR_AXIS / (1.0 - e2 * slat * slat).sqrt();

        Position::new(
            (n + self.altitude) * clat * clon,
            (n + self.altitude) * clat * slon,
            (n * (1.0 - e2) + self.altitude) * slat,
        )
    }

    /// Geodetic longitude, east positive.
    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    /// Geodetic latitude.
    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    /// Altitude above the ellipsoid.
    pub fn altitude(&self) -> Distance {
        Distance::new(self.altitude)
    }

    /// Valid when both angles are valid, |latitude| ≤ 90° and the altitude is in
    /// the −10 km … +100 km band of plausible observing sites.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_valid()
            && self.latitude.is_valid()
            && self.latitude.rad().abs() <= HALF_PI
            && self.altitude.is_finite()
            && (MIN_ALTITUDE..=MAX_ALTITUDE).contains(&self.altitude)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {:.0} m",
            self.longitude.to_dms_string(Separator::Letter, 1),
            self.latitude.to_dms_string(Separator::Letter, 1),
            self.altitude
        )
    }
}

/// Where the observation is made from.
#[derive(Debug, Clone, PartialEq)]
pub enum Observer {
    /// At the geocenter, or on a geocentric orbit with the given GCRS state.
    Geocentric { pos: Position, vel: Velocity },
    /// Anywhere in the solar system, with a barycentric ICRS state.
    SolarSystem { pos: Position, vel: Velocity },
    /// Fixed to (or moving over) a geodetic site on Earth.
    Geodetic { site: Site, vel: Velocity, eop: Eop },
}

impl Observer {
    /// A virtual observer at the geocenter.
    pub fn at_geocenter() -> Observer {
        Observer::Geocentric { pos: Position::origin(), vel: Velocity::stationary() }
    }

    /// An Earth-orbiting observer with the given geocentric state.
    pub fn in_earth_orbit(pos: Position, vel: Velocity) -> Observer {
        Observer::Geocentric { pos, vel }
    }

    /// A virtual observer at the solar system barycenter.
    pub fn at_ssb() -> Observer {
        Observer::SolarSystem { pos: Position::origin(), vel: Velocity::stationary() }
    }

    /// An observer anywhere in the solar system with a barycentric state.
    pub fn in_solar_system(pos: Position, vel: Velocity) -> Observer {
        Observer::SolarSystem { pos, vel }
    }

    /// A stationary observer at a geodetic site.
    pub fn on_earth(site: Site, eop: Eop) -> Observer {
        Observer::Geodetic { site, vel: Velocity::stationary(), eop }
    }

    /// An airborne observer over a geodetic site, moving with the given velocity
    /// relative to the rotating Earth.
    pub fn on_earth_airborne(site: Site, vel: Velocity, eop: Eop) -> Observer {
        Observer::Geodetic { site, vel, eop }
    }

    /// Whether this observer is pinned to a geodetic site. Horizon-based
    /// operations (rise, set, transit, horizontal projections) require this.
    pub fn is_geodetic(&self) -> bool {
        matches!(self, Observer::Geodetic { .. })
    }

    /// Whether this observer's state is expressed relative to the geocenter.
    pub fn is_geocentric(&self) -> bool {
        matches!(self, Observer::Geocentric { .. })
    }

    /// The observing site, when there is one.
    pub fn site(&self) -> Option<&Site> {
        match self {
            Observer::Geodetic { site, .. } => Some(site),
            _ => None,
        }
    }

    /// The observer's own EOP record, when it has one (geodetic observers only).
    pub fn eop(&self) -> Option<&Eop> {
        match self {
            Observer::Geodetic { eop, .. } => Some(eop),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Observer::Geocentric { pos, vel } | Observer::SolarSystem { pos, vel } => {
                pos.is_valid() && vel.is_valid()
            }
            Observer::Geodetic { site, vel, eop } => {
                site.is_valid() && vel.is_valid() && eop.is_valid()
            }
        }
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observer::Geocentric { pos, .. } => {
                if pos.distance().m() == 0.0 {
                    write!(f, "geocenter")
                } else {
                    write!(f, "Earth orbit at {}", pos.distance())
                }
            }
            Observer::SolarSystem { pos, .. } => {
                write!(f, "solar system at {}", pos.distance())
            }
            Observer::Geodetic { site, .. } => write!(f, "site {site}"),
        }
    }
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_site_xyz_equator() {
        let site = Site::from_gps(0.0, 0.0, 0.0);
        let p = site.xyz();
        assert_relative_eq!(p.vector().x, EARTH_MAJOR_AXIS, epsilon = 1e-6);
        assert_relative_eq!(p.vector().y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.vector().z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_site_xyz_pole() {
        let site = Site::from_gps(90.0, 0.0, 0.0);
        let p = site.xyz();
        assert_relative_eq!(
            p.vector().z,
            EARTH_MAJOR_AXIS * (1.0 - EARTH_FLATTENING),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_site_round_trip() {
        let site = Site::from_gps(-42.0, 15.0, 1500.0);
        let back = Site::from_xyz(&site.xyz());
        assert_relative_eq!(back.latitude().deg(), -42.0, epsilon = 1e-9);
        assert_relative_eq!(back.longitude().deg(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(back.altitude().m(), 1500.0, epsilon = 1e-3);
    }

    #[test]
    fn test_site_validity() {
        assert!(Site::from_gps(45.0, 7.0, 4810.0).is_valid());
        assert!(!Site::from_gps(45.0, 7.0, 200_000.0).is_valid());
        assert!(!Site::from_gps(45.0, 7.0, -20_000.0).is_valid());
        assert!(!Site::new(Angle::new(0.0), Angle::new(f64::NAN), 0.0).is_valid());
    }

    #[test]
    fn test_observer_capabilities() {
        let geo = Observer::at_geocenter();
        assert!(geo.is_geocentric());
        assert!(!geo.is_geodetic());
        assert!(geo.site().is_none());

        let site = Site::from_gps(30.0, 45.0, 1500.0);
        let obs = Observer::on_earth(site, Eop::new(37, 0.1, 0.2, 0.3));
        assert!(obs.is_geodetic());
        assert!(!obs.is_geocentric());
        assert_eq!(obs.eop().unwrap().leap_seconds(), 37);

        assert!(Observer::at_ssb().is_valid());
    }
}
