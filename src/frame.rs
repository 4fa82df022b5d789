//! # Observing frames
//!
//! A [`Frame`] bundles the three things every position computation needs: an
//! [`Observer`], a [`Time`], and the requested [`Accuracy`], together with the
//! physical state the numerical provider derived from them (barycentric Earth, Sun
//! and observer states, sidereal angles, polar motion). Every source product is
//! computed against a frame.
//!
//! ## Validity
//!
//! A frame is valid only when the observer, the time and the provider call are all
//! good. Polar motion is a geodetic-only correction: for any non-geodetic observer
//! the `xp`/`yp` fields of the state are forced to NaN, whatever the provider
//! returned.

use std::fmt;
use std::sync::Arc;

use crate::constants::{ArcSec, L_B, L_G};
use crate::observer::Observer;
use crate::provider::NumericalProvider;
use crate::quantity::angle::TimeAngle;
use crate::skyframe_errors::SkyframeError;
use crate::time::{tdb_rate, Eop, Time, Timescale};
use crate::vectors::{Position, Velocity};

/// Accuracy requested from the numerical provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// Full-precision models (sub-mas regime).
    Full,
    /// Reduced models, faster and good to the mas level.
    Reduced,
}

/// The physical state of a frame, as computed by the provider: barycentric ICRS
/// states, sidereal angles, and the polar motion in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Barycentric ICRS state of the geocenter.
    pub earth_pos: Position,
    pub earth_vel: Velocity,
    /// Barycentric ICRS position of the Sun.
    pub sun_pos: Position,
    /// Barycentric ICRS state of the observer.
    pub obs_pos: Position,
    pub obs_vel: Velocity,
    /// Greenwich apparent sidereal time at the frame's moment.
    pub gast: TimeAngle,
    /// Earth rotation angle at the frame's moment.
    pub era: TimeAngle,
    /// Polar motion in arcseconds; NaN for non-geodetic observers.
    pub xp: ArcSec,
    pub yp: ArcSec,
}

impl FrameState {
    /// The all-NaN sentinel used when the provider call fails.
    pub fn invalid() -> FrameState {
        let nan_pos = Position::new(f64::NAN, f64::NAN, f64::NAN);
        let nan_vel = Velocity::new(f64::NAN, f64::NAN, f64::NAN);
        FrameState {
            earth_pos: nan_pos,
            earth_vel: nan_vel,
            sun_pos: nan_pos,
            obs_pos: nan_pos,
            obs_vel: nan_vel,
            gast: TimeAngle::new(f64::NAN),
            era: TimeAngle::new(f64::NAN),
            xp: f64::NAN,
            yp: f64::NAN,
        }
    }

    /// Whether the dynamical state is usable. The polar-motion fields are excluded:
    /// they are NaN by design for non-geodetic observers.
    pub fn is_valid(&self) -> bool {
        self.earth_pos.is_valid()
            && self.earth_vel.is_valid()
            && self.sun_pos.is_valid()
            && self.obs_pos.is_valid()
            && self.obs_vel.is_valid()
            && self.gast.is_valid()
            && self.era.is_valid()
    }
}

/// The (observer, time, accuracy) bundle every position product is computed in.
#[derive(Clone)]
pub struct Frame {
    observer: Observer,
    time: Time,
    accuracy: Accuracy,
    provider: Arc<dyn NumericalProvider>,
    state: FrameState,
    valid: bool,
}

impl Frame {
    /// New frame. The provider is asked for the physical state immediately; a
    /// provider failure yields a constructible but invalid frame.
    pub fn new(
        observer: Observer,
        time: Time,
        accuracy: Accuracy,
        provider: Arc<dyn NumericalProvider>,
    ) -> Frame {
        let (state, provided) = match provider.frame_state(&observer, &time, accuracy) {
            Ok(mut state) => {
                if !observer.is_geodetic() {
                    // Polar motion never applies off the ground.
                    state.xp = f64::NAN;
                    state.yp = f64::NAN;
                }
                (state, true)
            }
            Err(e) => {
                log::debug!("Frame::new: provider failure: {e}");
                (FrameState::invalid(), false)
            }
        };

        let valid = provided && observer.is_valid() && time.is_valid() && state.is_valid();
        Frame { observer, time, accuracy, provider, state, valid }
    }

    /// The same observer and accuracy at another moment.
    pub fn at_time(&self, time: Time) -> Frame {
        Frame::new(self.observer.clone(), time, self.accuracy, self.provider.clone())
    }

    /// The same frame re-stamped with other Earth orientation parameters: the time
    /// keeps its TT reading, and a geodetic observer adopts the new record.
    pub fn with_eop(&self, eop: &Eop) -> Frame {
        let time = Time::from_jd(Timescale::Tt, self.time.jd(Timescale::Tt), eop);
        let observer = match &self.observer {
            Observer::Geodetic { site, vel, .. } => Observer::Geodetic {
                site: *site,
                vel: *vel,
                eop: *eop,
            },
            other => other.clone(),
        };
        Frame::new(observer, time, self.accuracy, self.provider.clone())
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    pub fn provider(&self) -> &Arc<dyn NumericalProvider> {
        &self.provider
    }

    /// The instantaneous rate difference d(scale)/d(TT) − 1 of a timescale against
    /// TT, in s/s.
    ///
    /// UTC, TAI and TT tick at the TT rate (leap seconds are steps, not a rate);
    /// TCG and TCB run fast by their defining constants; TDB oscillates with the
    /// annual relativistic term. UT1 has no usable rate model and is reported as
    /// unsupported rather than approximated.
    pub fn clock_skew(&self, scale: Timescale) -> Result<f64, SkyframeError> {
        let jd_tt = self.time.jd(Timescale::Tt);
        match scale {
            Timescale::Utc | Timescale::Tai | Timescale::Tt => Ok(0.0),
            Timescale::Tcg => Ok(L_G / (1.0 - L_G)),
            Timescale::Tdb => Ok(tdb_rate(jd_tt)),
            Timescale::Tcb => Ok((1.0 + tdb_rate(jd_tt)) / (1.0 - L_B) - 1.0),
            Timescale::Ut1 => Err(SkyframeError::UnsupportedTimescale(Timescale::Ut1)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("observer", &self.observer)
            .field("time", &self.time)
            .field("accuracy", &self.accuracy)
            .field("state", &self.state)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.observer, self.time)
    }
}
