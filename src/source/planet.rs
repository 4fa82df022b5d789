//! Major solar system bodies with the conventional ephemeris numbering: 0 is the
//! solar system barycenter, 1–9 the planets out to Pluto, then the Sun, the Moon
//! and the Earth-Moon barycenter.

use std::fmt;

use crate::constants::{AU, SOLAR_CONSTANT};
use crate::frame::Frame;
use crate::quantity::distance::Distance;

/// A major solar system body, identified by its ephemeris number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Ssb,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Sun,
    Moon,
    Emb,
}

/// All bodies in ephemeris-number order.
pub const ALL_PLANETS: [Planet; 13] = [
    Planet::Ssb,
    Planet::Mercury,
    Planet::Venus,
    Planet::Earth,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Uranus,
    Planet::Neptune,
    Planet::Pluto,
    Planet::Sun,
    Planet::Moon,
    Planet::Emb,
];

impl Planet {
    /// The conventional ephemeris number of the body.
    pub fn id(&self) -> u8 {
        match self {
            Planet::Ssb => 0,
            Planet::Mercury => 1,
            Planet::Venus => 2,
            Planet::Earth => 3,
            Planet::Mars => 4,
            Planet::Jupiter => 5,
            Planet::Saturn => 6,
            Planet::Uranus => 7,
            Planet::Neptune => 8,
            Planet::Pluto => 9,
            Planet::Sun => 10,
            Planet::Moon => 11,
            Planet::Emb => 12,
        }
    }

    /// The body with the given ephemeris number, if any.
    pub fn from_id(id: u8) -> Option<Planet> {
        ALL_PLANETS.get(id as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Ssb => "SSB",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Emb => "EMB",
        }
    }

    /// Whether this entry is a barycenter rather than a physical body.
    pub fn is_barycenter(&self) -> bool {
        matches!(self, Planet::Ssb | Planet::Emb)
    }

    /// Body mass in kilograms. The solar system barycenter has none (NaN); the
    /// Earth-Moon barycenter carries the combined mass.
    pub fn mass(&self) -> f64 {
        match self {
            Planet::Ssb => f64::NAN,
            Planet::Mercury => 3.301_1e23,
            Planet::Venus => 4.867_5e24,
            Planet::Earth => 5.972_2e24,
            Planet::Mars => 6.417_1e23,
            Planet::Jupiter => 1.898_2e27,
            Planet::Saturn => 5.683_4e26,
            Planet::Uranus => 8.681_0e25,
            Planet::Neptune => 1.024_13e26,
            Planet::Pluto => 1.303e22,
            Planet::Sun => 1.988_5e30,
            Planet::Moon => 7.342e22,
            Planet::Emb => 5.972_2e24 + 7.342e22,
        }
    }

    /// Volumetric mean radius in meters; NaN for the barycenters.
    pub fn mean_radius(&self) -> f64 {
        match self {
            Planet::Ssb | Planet::Emb => f64::NAN,
            Planet::Mercury => 2.439_7e6,
            Planet::Venus => 6.051_8e6,
            Planet::Earth => 6.371_008_4e6,
            Planet::Mars => 3.389_5e6,
            Planet::Jupiter => 6.991_1e7,
            Planet::Saturn => 5.823_2e7,
            Planet::Uranus => 2.536_2e7,
            Planet::Neptune => 2.462_2e7,
            Planet::Pluto => 1.188_3e6,
            Planet::Sun => 6.957e8,
            Planet::Moon => 1.737_4e6,
        }
    }

    /// Distance from the Sun at the frame's time, via the frame's provider.
    /// Invalid (NaN) when either body state is unavailable.
    pub fn helio_distance(&self, frame: &Frame) -> Distance {
        if *self == Planet::Sun {
            return Distance::new(0.0);
        }
        let provider = frame.provider();
        let states = provider
            .body_state(*self, frame.time(), frame.accuracy())
            .and_then(|(p, _)| {
                provider
                    .body_state(Planet::Sun, frame.time(), frame.accuracy())
                    .map(|(s, _)| (p, s))
            });
        match states {
            Ok((p, s)) => (p - s).distance(),
            Err(e) => {
                log::debug!("helio_distance({self}): provider failure: {e}");
                Distance::new(f64::NAN)
            }
        }
    }

    /// Incident solar irradiance at the body in W/m², scaled by the inverse square
    /// of the heliocentric distance at the frame's time.
    pub fn solar_power(&self, frame: &Frame) -> f64 {
        let d = self.helio_distance(frame);
        SOLAR_CONSTANT * (AU / d.m()).powi(2)
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod planet_test {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for planet in ALL_PLANETS {
            assert_eq!(Planet::from_id(planet.id()), Some(planet));
        }
        assert_eq!(Planet::from_id(13), None);
    }

    #[test]
    fn test_ids() {
        assert_eq!(Planet::Ssb.id(), 0);
        assert_eq!(Planet::Earth.id(), 3);
        assert_eq!(Planet::Sun.id(), 10);
        assert_eq!(Planet::Emb.id(), 12);
    }

    #[test]
    fn test_barycenters() {
        assert!(Planet::Ssb.is_barycenter());
        assert!(Planet::Emb.is_barycenter());
        assert!(!Planet::Moon.is_barycenter());
        assert!(Planet::Ssb.mass().is_nan());
        assert!(Planet::Emb.mass() > Planet::Earth.mass());
    }

    #[test]
    fn test_mass_ordering() {
        assert!(Planet::Sun.mass() > Planet::Jupiter.mass());
        assert!(Planet::Jupiter.mass() > Planet::Earth.mass());
        assert!(Planet::Earth.mass() > Planet::Moon.mass());
    }
}
