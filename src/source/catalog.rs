//! Catalog star entries: an equatorial position at a catalog epoch plus the usual
//! kinematic annotations (proper motion, parallax or distance, radial velocity or
//! redshift). The annotations are added fluently and the entry re-validates after
//! every step.

use std::fmt;

use crate::constants::{JULIAN_YEAR_DAYS, RADMAS};
use crate::equinox::Equinox;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::quantity::speed::Speed;
use crate::spherical::Equatorial;
use crate::time::{Time, Timescale};

/// A catalog source entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    name: String,
    catalog: String,
    number: Option<u64>,
    position: Equatorial,
    /// Proper motion in RA (including the cos δ factor), mas/yr.
    pm_ra: f64,
    /// Proper motion in Dec, mas/yr.
    pm_dec: f64,
    rv: Speed,
    valid: bool,
}

impl CatalogEntry {
    /// New entry from a named equatorial position. Kinematic fields start at zero
    /// and the distance at the catalog default until the fluent calls set them.
    pub fn new(name: &str, position: Equatorial) -> Self {
        let mut entry = CatalogEntry {
            name: name.into(),
            catalog: String::new(),
            number: None,
            position,
            pm_ra: 0.0,
            pm_dec: 0.0,
            rv: Speed::new(0.0),
            valid: false,
        };
        entry.revalidate();
        entry
    }

    /// New entry from sexagesimal coordinate strings (HMS right ascension, DMS
    /// declination). A string that does not parse yields an invalid entry.
    pub fn from_strings(name: &str, ra: &str, dec: &str, system: &Equinox) -> Self {
        CatalogEntry::new(name, Equatorial::from_string(ra, dec, system))
    }

    fn revalidate(&mut self) {
        self.valid = self.position.is_valid()
            && self.pm_ra.is_finite()
            && self.pm_dec.is_finite()
            && self.rv.is_valid();
        if !self.valid {
            log::debug!("CatalogEntry: entry {:?} is invalid", self.name);
        }
    }

    /// Attach the catalog designation (catalog name and running number).
    pub fn catalog(mut self, catalog: &str, number: u64) -> Self {
        self.catalog = catalog.into();
        self.number = Some(number);
        self
    }

    /// Set the proper motion in mas/yr; the RA component includes the cos δ factor.
    pub fn proper_motion(mut self, pm_ra: f64, pm_dec: f64) -> Self {
        self.pm_ra = pm_ra;
        self.pm_dec = pm_dec;
        self.revalidate();
        self
    }

    /// Set the distance from an annual parallax. A non-positive or invalid
    /// parallax falls back to the default catalog distance.
    pub fn parallax(mut self, parallax: Angle) -> Self {
        self.position = Equatorial::new(
            self.position.ra(),
            self.position.dec(),
            Distance::from_parallax(&parallax),
            self.position.system(),
        );
        self.revalidate();
        self
    }

    /// Set the distance directly.
    pub fn distance(mut self, distance: Distance) -> Self {
        self.position = Equatorial::new(
            self.position.ra(),
            self.position.dec(),
            distance,
            self.position.system(),
        );
        self.revalidate();
        self
    }

    /// Set the radial velocity.
    pub fn radial_velocity(mut self, rv: Speed) -> Self {
        self.rv = rv;
        self.revalidate();
        self
    }

    /// Set the radial velocity from a redshift.
    pub fn redshift(self, z: f64) -> Self {
        self.radial_velocity(Speed::from_redshift(z))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog
    }

    pub fn number(&self) -> Option<u64> {
        self.number
    }

    /// The catalog position, at the catalog epoch.
    pub fn position(&self) -> &Equatorial {
        &self.position
    }

    /// Proper motion (RA·cos δ, Dec) in mas/yr.
    pub fn proper_motion_mas(&self) -> (f64, f64) {
        (self.pm_ra, self.pm_dec)
    }

    pub fn rv(&self) -> Speed {
        self.rv
    }

    /// The catalog position propagated by proper motion to the given moment.
    /// The epoch is the defining date of the entry's equatorial system.
    pub fn position_at(&self, time: &Time) -> Equatorial {
        let years =
            (time.jd(Timescale::Tt) - self.position.system().jd()) / JULIAN_YEAR_DAYS;
        let dec = self.position.dec();
        let ra = TimeAngle::new(
            self.position.ra().rad() + self.pm_ra * RADMAS * years / dec.cos(),
        );
        let dec = Angle::new(dec.rad() + self.pm_dec * RADMAS * years);
        Equatorial::new(ra, dec, self.position.distance(), self.position.system())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_empty() {
            write!(f, "{} {}", self.name, self.position)
        } else {
            write!(
                f,
                "{} ({} {}) {}",
                self.name,
                self.catalog,
                self.number.unwrap_or(0),
                self.position
            )
        }
    }
}
