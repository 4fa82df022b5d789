//! The geometric place of a source: an observer-relative cartesian state tagged
//! with the reference system it is expressed in, including the Earth-fixed kinds
//! no equinox can represent.

use std::fmt;

use nalgebra::Matrix3;

use crate::equinox::{Equinox, ReferenceSystem};
use crate::frame::Frame;
use crate::ref_system::{polar_motion, rotation_between, tirs_from_cirs};
use crate::skyframe_errors::SkyframeError;
use crate::spherical::Equatorial;
use crate::time::{Eop, Timescale};
use crate::vectors::{Position, Velocity};

/// A computed observer-relative cartesian state.
///
/// Celestial products carry the defining [`Equinox`]; Earth-fixed products (TIRS,
/// ITRS) are tagged by [`ReferenceSystem`] kind alone, dated implicitly by the
/// frame's time.
#[derive(Debug, Clone)]
pub struct Geometric {
    frame: Frame,
    system: ReferenceSystem,
    /// The defining equinox for celestial systems; the invalid sentinel for the
    /// Earth-fixed kinds.
    equinox: Equinox,
    pos: Position,
    vel: Velocity,
    valid: bool,
}

impl Geometric {
    pub(crate) fn new(frame: &Frame, equinox: &Equinox, pos: Position, vel: Velocity) -> Self {
        let valid = frame.is_valid() && equinox.is_valid() && pos.is_valid() && vel.is_valid();
        Geometric {
            frame: frame.clone(),
            system: equinox.system(),
            equinox: equinox.clone(),
            pos,
            vel,
            valid,
        }
    }

    fn earth_fixed(frame: &Frame, system: ReferenceSystem, pos: Position, vel: Velocity) -> Self {
        let valid = frame.is_valid() && pos.is_valid() && vel.is_valid();
        Geometric {
            frame: frame.clone(),
            system,
            equinox: Equinox::invalid().clone(),
            pos,
            vel,
            valid,
        }
    }

    /// The invalid sentinel returned when the provider fails.
    pub(crate) fn invalid(frame: &Frame, equinox: &Equinox) -> Self {
        Geometric {
            frame: frame.clone(),
            system: equinox.system(),
            equinox: equinox.clone(),
            pos: Position::new(f64::NAN, f64::NAN, f64::NAN),
            vel: Velocity::new(f64::NAN, f64::NAN, f64::NAN),
            valid: false,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The reference-system kind the state is expressed in.
    pub fn system(&self) -> ReferenceSystem {
        self.system
    }

    /// The defining equinox; the invalid sentinel for Earth-fixed products.
    pub fn equinox(&self) -> &Equinox {
        &self.equinox
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn velocity(&self) -> &Velocity {
        &self.vel
    }

    /// The spherical reading of the position, for celestial products.
    pub fn equatorial(&self) -> Equatorial {
        Equatorial::from_position(&self.pos, &self.equinox)
    }

    /// The rotation taking this product's system to ICRS at the given frame.
    fn to_icrs(&self, frame: &Frame, eop: &Eop) -> Matrix3<f64> {
        let jd_tt = frame.time().jd(Timescale::Tt);
        let jd_ut1 = frame.time().jd(Timescale::Ut1);
        match self.system {
            ReferenceSystem::Tirs => {
                rotation_between(&Equinox::cirs(jd_tt), Equinox::icrs())
                    * tirs_from_cirs(jd_ut1).transpose()
            }
            ReferenceSystem::Itrs => {
                rotation_between(&Equinox::cirs(jd_tt), Equinox::icrs())
                    * tirs_from_cirs(jd_ut1).transpose()
                    * polar_motion(eop.xp(), eop.yp()).transpose()
            }
            _ => rotation_between(&self.equinox, Equinox::icrs()),
        }
    }

    /// Re-express this state in another reference system.
    ///
    /// Celestial targets take the target equinox at the frame's own date.
    /// Earth-fixed targets need an Earth-orientation source: the explicit `eop`
    /// if given, otherwise a geodetic observer's own record; with neither the
    /// operation fails. When an explicit record is supplied, the frame is first
    /// re-stamped with it.
    pub fn in_system(
        &self,
        target: ReferenceSystem,
        eop: Option<&Eop>,
    ) -> Result<Geometric, SkyframeError> {
        if target == self.system {
            return Ok(self.clone());
        }

        let needs_earth = matches!(target, ReferenceSystem::Tirs | ReferenceSystem::Itrs)
            || matches!(self.system, ReferenceSystem::Tirs | ReferenceSystem::Itrs);

        // Resolve the EOP source and the frame to do the work in.
        let (frame, eop) = if needs_earth {
            match eop {
                Some(eop) => (self.frame.with_eop(eop), *eop),
                None => {
                    let own = self
                        .frame
                        .observer()
                        .eop()
                        .copied()
                        .ok_or(SkyframeError::MissingEarthOrientation)?;
                    (self.frame.clone(), own)
                }
            }
        } else {
            (self.frame.clone(), *self.frame.time().eop())
        };

        let jd_tt = frame.time().jd(Timescale::Tt);
        let jd_ut1 = frame.time().jd(Timescale::Ut1);

        let from_icrs = match target {
            ReferenceSystem::Tirs => {
                tirs_from_cirs(jd_ut1)
                    * rotation_between(Equinox::icrs(), &Equinox::cirs(jd_tt))
            }
            ReferenceSystem::Itrs => {
                polar_motion(eop.xp(), eop.yp())
                    * tirs_from_cirs(jd_ut1)
                    * rotation_between(Equinox::icrs(), &Equinox::cirs(jd_tt))
            }
            _ => rotation_between(
                Equinox::icrs(),
                &Equinox::for_reference_system(target, jd_tt),
            ),
        };

        let rot = from_icrs * self.to_icrs(&frame, &eop);
        let pos = Position::from_vector(rot * self.pos.vector());
        let vel = Velocity::from_vector(rot * self.vel.vector());

        Ok(match target {
            ReferenceSystem::Tirs | ReferenceSystem::Itrs => {
                Geometric::earth_fixed(&frame, target, pos, vel)
            }
            _ => Geometric::new(
                &frame,
                &Equinox::for_reference_system(target, jd_tt),
                pos,
                vel,
            ),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for Geometric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} @ {}", self.system, self.pos, self.vel)
    }
}
