//! The apparent place of a source: where it reads on the sky for a specific frame,
//! as a spherical tuple tagged with the system it was computed in.

use std::fmt;

use crate::equinox::Equinox;
use crate::frame::Frame;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::quantity::speed::Speed;
use crate::quantity::weather::Weather;
use crate::provider::Refraction;
use crate::skyframe_errors::SkyframeError;
use crate::spherical::{Ecliptic, Equatorial, Galactic, Horizontal};
use crate::time::Timescale;

/// A computed apparent position. Produced by
/// [`Source::apparent`](crate::source::Source::apparent), never persisted.
#[derive(Debug, Clone)]
pub struct Apparent {
    frame: Frame,
    system: Equinox,
    ra: TimeAngle,
    dec: Angle,
    distance: Distance,
    rv: Speed,
    valid: bool,
}

impl Apparent {
    pub(crate) fn new(
        frame: &Frame,
        system: &Equinox,
        ra: TimeAngle,
        dec: Angle,
        distance: Distance,
        rv: Speed,
    ) -> Self {
        let valid = frame.is_valid()
            && system.is_valid()
            && ra.is_valid()
            && dec.is_valid()
            && distance.is_valid()
            && rv.is_valid();
        Apparent { frame: frame.clone(), system: system.clone(), ra, dec, distance, rv, valid }
    }

    /// The invalid sentinel returned when the provider fails.
    pub(crate) fn invalid(frame: &Frame, system: &Equinox) -> Self {
        Apparent {
            frame: frame.clone(),
            system: system.clone(),
            ra: TimeAngle::new(f64::NAN),
            dec: Angle::new(f64::NAN),
            distance: Distance::new(f64::NAN),
            rv: Speed::new(f64::NAN),
            valid: false,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn system(&self) -> &Equinox {
        &self.system
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

    /// Radial velocity, positive receding.
    pub fn rv(&self) -> Speed {
        self.rv
    }

    /// The place as an equatorial coordinate value.
    pub fn equatorial(&self) -> Equatorial {
        Equatorial::new(self.ra, self.dec, self.distance, &self.system)
    }

    /// The place in ecliptic coordinates of the same system.
    pub fn ecliptic(&self) -> Ecliptic {
        self.equatorial().to_ecliptic()
    }

    /// The place in galactic coordinates.
    pub fn galactic(&self) -> Galactic {
        self.equatorial().to_galactic()
    }

    /// The same place re-expressed in another celestial system.
    pub fn to_system(&self, system: &Equinox) -> Apparent {
        let eq = self.equatorial().to_system(system);
        Apparent::new(&self.frame, system, eq.ra(), eq.dec(), eq.distance(), self.rv)
    }

    /// The place in the horizontal frame of the frame's observing site, without
    /// refraction. Requires a geodetic observer.
    pub fn horizontal(&self) -> Result<Horizontal, SkyframeError> {
        let site = self
            .frame
            .observer()
            .site()
            .ok_or(SkyframeError::ObserverNotGeodetic)?;

        // Hour angle against the true equinox of date.
        let tod = Equinox::true_of_date(self.frame.time().jd(Timescale::Tt));
        let eq = self.equatorial().to_system(&tod);
        let h = self.frame.time().gst().rad() + site.longitude().rad() - eq.ra().rad();

        let (lat, dec) = (site.latitude().rad(), eq.dec().rad());
        let sin_el = lat.sin() * dec.sin() + lat.cos() * dec.cos() * h.cos();
        let east = -dec.cos() * h.sin();
        let north = dec.sin() * lat.cos() - dec.cos() * h.cos() * lat.sin();

        Ok(Horizontal::new(
            TimeAngle::new(east.atan2(north)),
            Angle::new(sin_el.asin()),
            self.distance,
        ))
    }

    /// Like [`Apparent::horizontal`] but with a refraction correction applied for
    /// the given conditions.
    pub fn horizontal_refracted(
        &self,
        model: &dyn Refraction,
        weather: &Weather,
    ) -> Result<Horizontal, SkyframeError> {
        let h = self.horizontal()?;
        Ok(Horizontal::new(
            h.az(),
            h.el() + model.correction(h.el(), weather),
            h.distance(),
        ))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for Apparent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.equatorial(), self.frame.time())
    }
}
