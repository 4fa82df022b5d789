//! # Observable sources
//!
//! A [`Source`] is anything whose place on the sky can be asked for: a catalog
//! star, a major solar system body, an ephemeris-keyed object, or a body given by
//! Keplerian elements. The place queries ([`Source::apparent`],
//! [`Source::geometric`]) go through the frame's numerical provider; a provider
//! failure yields an invalid product, never a panic.
//!
//! ## Rise, set and transit
//!
//! The horizon event searches need a geodetic observer and look one day ahead of
//! the frame's moment. A source that never crosses in that window (circumpolar or
//! never rising) yields an invalid [`Time`], which callers can detect with
//! [`Time::is_valid`].

pub mod apparent;
pub mod catalog;
pub mod geometric;
pub mod planet;

pub use apparent::Apparent;
pub use catalog::CatalogEntry;
pub use geometric::Geometric;
pub use planet::Planet;

use std::fmt;

use crate::equinox::Equinox;
use crate::frame::Frame;
use crate::orbital::Orbital;
use crate::provider::Crossing;
use crate::quantity::angle::Angle;
use crate::skyframe_errors::SkyframeError;
use crate::spherical::separation;
use crate::time::{Time, Timescale};

/// An observable source.
#[derive(Debug, Clone)]
pub enum Source {
    /// A sidereal source from a catalog.
    Catalog(CatalogEntry),
    /// A major solar system body.
    Planet(Planet),
    /// A solar system body keyed into the provider's ephemeris data.
    Ephemeris { name: String, id: i64 },
    /// A body propagated from Keplerian elements.
    Orbital { name: String, orbit: Orbital },
}

impl Source {
    pub fn name(&self) -> &str {
        match self {
            Source::Catalog(entry) => entry.name(),
            Source::Planet(planet) => planet.name(),
            Source::Ephemeris { name, .. } => name,
            Source::Orbital { name, .. } => name,
        }
    }

    /// Whether the source definition itself is usable. Planet and ephemeris
    /// variants are always well defined; catalog and orbital ones carry their own
    /// validity.
    pub fn is_valid(&self) -> bool {
        match self {
            Source::Catalog(entry) => entry.is_valid(),
            Source::Planet(_) | Source::Ephemeris { .. } => true,
            Source::Orbital { orbit, .. } => orbit.is_valid(),
        }
    }

    /// The apparent place of this source in the given frame and celestial system.
    /// A provider failure yields an invalid place.
    pub fn apparent(&self, frame: &Frame, system: &Equinox) -> Apparent {
        match frame.provider().apparent_place(self, frame, system) {
            Ok((ra, dec, distance, rv)) => Apparent::new(frame, system, ra, dec, distance, rv),
            Err(e) => {
                log::debug!("Source::apparent: {} failed: {e}", self.name());
                Apparent::invalid(frame, system)
            }
        }
    }

    /// The geometric observer-relative state of this source in the given frame and
    /// celestial system. A provider failure yields an invalid state.
    pub fn geometric(&self, frame: &Frame, system: &Equinox) -> Geometric {
        match frame.provider().geometric_posvel(self, frame, system) {
            Ok((pos, vel)) => Geometric::new(frame, system, pos, vel),
            Err(e) => {
                log::debug!("Source::geometric: {} failed: {e}", self.name());
                Geometric::invalid(frame, system)
            }
        }
    }

    fn crossing(
        &self,
        frame: &Frame,
        elevation: Angle,
        event: Crossing,
    ) -> Result<Time, SkyframeError> {
        let jd = frame
            .provider()
            .horizon_crossing(self, frame, elevation, event)?;
        // NaN means no crossing within a day; it reads back as an invalid Time.
        Ok(Time::from_jd(Timescale::Tt, jd, frame.time().eop()))
    }

    /// The next moment, within a day of the frame's time, when this source rises
    /// above the given elevation. Requires a geodetic observer.
    pub fn rises_above(&self, elevation: Angle, frame: &Frame) -> Result<Time, SkyframeError> {
        self.crossing(frame, elevation, Crossing::Rise)
    }

    /// The next moment, within a day of the frame's time, when this source sets
    /// below the given elevation. Requires a geodetic observer.
    pub fn sets_below(&self, elevation: Angle, frame: &Frame) -> Result<Time, SkyframeError> {
        self.crossing(frame, elevation, Crossing::Set)
    }

    /// The next upper culmination of this source, within a day of the frame's
    /// time. Requires a geodetic observer.
    pub fn transits(&self, frame: &Frame) -> Result<Time, SkyframeError> {
        self.crossing(frame, Angle::new(0.0), Crossing::Transit)
    }

    /// The apparent angular separation between this source and another, as seen in
    /// the given frame. NaN when either place is invalid.
    pub fn angle_to(&self, other: &Source, frame: &Frame) -> Angle {
        let a = self.apparent(frame, Equinox::icrs());
        let b = other.apparent(frame, Equinox::icrs());
        if !a.is_valid() || !b.is_valid() {
            return Angle::new(f64::NAN);
        }
        separation(a.ra().rad(), a.dec().rad(), b.ra().rad(), b.dec().rad())
    }

    /// Apparent angular distance to the Sun.
    pub fn sun_angle(&self, frame: &Frame) -> Angle {
        self.angle_to(&Source::Planet(Planet::Sun), frame)
    }

    /// Apparent angular distance to the Moon.
    pub fn moon_angle(&self, frame: &Frame) -> Angle {
        self.angle_to(&Source::Planet(Planet::Moon), frame)
    }
}

impl From<Planet> for Source {
    fn from(planet: Planet) -> Source {
        Source::Planet(planet)
    }
}

impl From<CatalogEntry> for Source {
    fn from(entry: CatalogEntry) -> Source {
        Source::Catalog(entry)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Catalog(entry) => write!(f, "{entry}"),
            Source::Planet(planet) => write!(f, "{planet}"),
            Source::Ephemeris { name, id } => write!(f, "{name} (NAIF {id})"),
            Source::Orbital { name, orbit } => write!(f, "{name} [{orbit}]"),
        }
    }
}
