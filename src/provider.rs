//! # The numerical provider seam
//!
//! [`NumericalProvider`] is the boundary between this crate's typed domain model
//! and the numerical machinery behind it. Only one method is required: the
//! barycentric state of a major body. Everything else has a default built on it —
//! observer frame states from the geodetic chain, geometric and apparent places by
//! differencing barycentric states, Kepler propagation for element sets, and a
//! scan-and-bisect horizon crossing search. A production provider backed by a real
//! ephemeris overrides whichever defaults its data can improve on.
//!
//! [`Refraction`] is the companion seam for the horizontal refraction model, with
//! [`StandardRefraction`] as the bundled weather-scaled standard model.
//!
//! ## Failure policy
//!
//! Every trait method returns `Result`; the domain types map an `Err` to an
//! invalid product plus a `log::debug!` trace, so a provider failure never
//! panics and never silently yields numbers.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{EARTH_ANGVEL, RADEG, JD};
use crate::equinox::Equinox;
use crate::frame::{Accuracy, Frame, FrameState};
use crate::observer::Observer;
use crate::orbital::Orbital;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::quantity::speed::Speed;
use crate::quantity::weather::Weather;
use crate::ref_system::{polar_motion, rotation_between, rotmt, tirs_from_cirs};
use crate::skyframe_errors::SkyframeError;
use crate::source::{Planet, Source};
use crate::time::{Time, Timescale};
use crate::vectors::{Position, Velocity};

/// The horizon event a crossing search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Elevation crossing the threshold upward.
    Rise,
    /// Elevation crossing the threshold downward.
    Set,
    /// Upper culmination (hour angle crossing zero).
    Transit,
}

/// An apparent place: the spherical reading of a source as seen by an observer.
pub type Place = (TimeAngle, Angle, Distance, Speed);

/// The external numerical engine interface.
///
/// Implementors must be shareable across threads; the trait object is held in an
/// `Arc` by every [`Frame`].
pub trait NumericalProvider: Send + Sync {
    /// Barycentric ICRS state of a major solar system body.
    fn body_state(
        &self,
        body: Planet,
        time: &Time,
        accuracy: Accuracy,
    ) -> Result<(Position, Velocity), SkyframeError>;

    /// Barycentric ICRS state of an ephemeris-keyed source. No default data is
    /// bundled; providers with ephemeris files override this.
    fn ephemeris_state(
        &self,
        name: &str,
        id: i64,
        _time: &Time,
        _accuracy: Accuracy,
    ) -> Result<(Position, Velocity), SkyframeError> {
        Err(SkyframeError::ProviderFailure(format!(
            "no ephemeris data for {name} ({id})"
        )))
    }

    /// The physical state of an observer at a moment: barycentric Earth, Sun and
    /// observer states plus the sidereal angles and polar motion.
    ///
    /// The default composes the Earth state with the observer's own geometry; a
    /// geodetic site is carried from ITRS to the celestial frame through polar
    /// motion, Earth rotation and the CIRS chain.
    fn frame_state(
        &self,
        observer: &Observer,
        time: &Time,
        accuracy: Accuracy,
    ) -> Result<FrameState, SkyframeError> {
        let (earth_pos, earth_vel) = self.body_state(Planet::Earth, time, accuracy)?;
        let (sun_pos, _) = self.body_state(Planet::Sun, time, accuracy)?;

        let (obs_pos, obs_vel, xp, yp) = match observer {
            Observer::SolarSystem { pos, vel } => (*pos, *vel, f64::NAN, f64::NAN),
            Observer::Geocentric { pos, vel } => {
                (earth_pos + *pos, earth_vel + *vel, f64::NAN, f64::NAN)
            }
            Observer::Geodetic { site, vel, eop } => {
                let jd_tt = time.jd(Timescale::Tt);
                let jd_ut1 = time.jd(Timescale::Ut1);

                // ITRS -> TIRS -> CIRS -> ICRS
                let w = polar_motion(eop.xp(), eop.yp());
                let celestial =
                    rotation_between(&Equinox::cirs(jd_tt), Equinox::icrs())
                        * tirs_from_cirs(jd_ut1).transpose();

                let x_tirs = w.transpose() * site.xyz().vector();
                let v_tirs = Vector3::new(-EARTH_ANGVEL * x_tirs.y, EARTH_ANGVEL * x_tirs.x, 0.0)
                    + w.transpose() * vel.vector();

                (
                    earth_pos + Position::from_vector(celestial * x_tirs),
                    earth_vel + Velocity::from_vector(celestial * v_tirs),
                    eop.xp(),
                    eop.yp(),
                )
            }
        };

        Ok(FrameState {
            earth_pos,
            earth_vel,
            sun_pos,
            obs_pos,
            obs_vel,
            gast: time.gst(),
            era: time.era(),
            xp,
            yp,
        })
    }

    /// Observer-relative position and velocity of a source in the given celestial
    /// system.
    ///
    /// The default differences barycentric states without light-time or
    /// aberration; an ephemeris-backed provider overrides it with the full
    /// reduction.
    fn geometric_posvel(
        &self,
        source: &Source,
        frame: &Frame,
        system: &Equinox,
    ) -> Result<(Position, Velocity), SkyframeError> {
        let time = frame.time();
        let accuracy = frame.accuracy();

        let (pos_b, vel_b) = match source {
            Source::Planet(planet) => self.body_state(*planet, time, accuracy)?,
            Source::Ephemeris { name, id } => {
                self.ephemeris_state(name, *id, time, accuracy)?
            }
            Source::Orbital { orbit, .. } => {
                let (rel_pos, rel_vel) = self.orbit_posvel(orbit, time)?;
                let (c_pos, c_vel) =
                    self.body_state(orbit.system().center(), time, accuracy)?;
                let rot = self.orientation(orbit.system().system(), Equinox::icrs());
                (
                    c_pos + Position::from_vector(rot * rel_pos.vector()),
                    c_vel + Velocity::from_vector(rot * rel_vel.vector()),
                )
            }
            Source::Catalog(entry) => {
                if !entry.is_valid() {
                    return Err(SkyframeError::ProviderFailure(format!(
                        "catalog entry {} is invalid",
                        entry.name()
                    )));
                }
                let icrs = entry.position_at(time).to_system(Equinox::icrs());
                let pos = icrs.position();
                (pos, entry.rv().to_velocity(pos.vector()))
            }
        };

        let rel_pos = pos_b - frame.state().obs_pos;
        let rel_vel = vel_b - frame.state().obs_vel;
        let rot = self.orientation(Equinox::icrs(), system);
        Ok((
            Position::from_vector(rot * rel_pos.vector()),
            Velocity::from_vector(rot * rel_vel.vector()),
        ))
    }

    /// Apparent place of a source in the given celestial system.
    ///
    /// The default is the spherical reading of the geometric state; providers
    /// with full reductions add light-time, aberration and deflection.
    fn apparent_place(
        &self,
        source: &Source,
        frame: &Frame,
        system: &Equinox,
    ) -> Result<Place, SkyframeError> {
        let (pos, vel) = self.geometric_posvel(source, frame, system)?;
        let (ra, dec, distance) = pos.as_spherical();
        Ok((ra, dec, distance, vel.projection_on(&pos)))
    }

    /// Propagate a Keplerian element set to the given moment: position and
    /// velocity relative to the center body, in the element set's equatorial
    /// system.
    ///
    /// The default solves the Kepler equation by Newton iteration for bound
    /// orbits; unbound element sets are rejected.
    fn orbit_posvel(
        &self,
        orbit: &Orbital,
        time: &Time,
    ) -> Result<(Position, Velocity), SkyframeError> {
        if !orbit.is_valid() || !time.is_valid() {
            return Err(SkyframeError::ProviderFailure(
                "orbital elements or time invalid".into(),
            ));
        }
        let e = orbit.ecc();
        if e >= 1.0 {
            return Err(SkyframeError::NoConvergence("unbound orbit"));
        }

        let m = orbit.mean_anomaly_at(time).rad();
        let mut u = if e < 0.8 { m } else { std::f64::consts::PI };
        let mut converged = false;
        for _ in 0..50 {
            let du = -(u - e * u.sin() - m) / (1.0 - e * u.cos());
            u += du;
            if du.abs() < 1e-14 {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(SkyframeError::NoConvergence("Kepler equation"));
        }

        let a = orbit.semi_major_axis().m();
        let n = orbit.mean_motion();
        let (su, cu) = u.sin_cos();
        let root = (1.0 - e * e).sqrt();
        let r_over_a = 1.0 - e * cu;

        // Perifocal state, then periapsis/inclination/node into the reference
        // plane, then the plane tilt into the system equator.
        let pos_pf = Vector3::new(a * (cu - e), a * root * su, 0.0);
        let vel_pf = Vector3::new(-a * n * su / r_over_a, a * n * root * cu / r_over_a, 0.0);

        let sys = orbit.system();
        let orient = rotmt(sys.node().rad(), 2)
            * rotmt(sys.obliquity().rad(), 0)
            * rotmt(orbit.node_at(time).rad(), 2)
            * rotmt(orbit.inclination_angle().rad(), 0)
            * rotmt(orbit.periapsis_at(time).rad(), 2);

        Ok((
            Position::from_vector(orient * pos_pf),
            Velocity::from_vector(orient * vel_pf),
        ))
    }

    /// Search for the next horizon event of a source after the frame's moment,
    /// within one day.
    ///
    /// Returns the TT Julian Date of the event, or NaN when the source never
    /// crosses (circumpolar or never-rising cases). Requires a geodetic observer.
    ///
    /// The default samples the objective (elevation offset, or hour angle for a
    /// transit) every 15 minutes and bisects the first bracketing pair.
    fn horizon_crossing(
        &self,
        source: &Source,
        frame: &Frame,
        elevation: Angle,
        event: Crossing,
    ) -> Result<JD, SkyframeError> {
        let site = frame
            .observer()
            .site()
            .ok_or(SkyframeError::ObserverNotGeodetic)?;
        let (lat, lon) = (site.latitude().rad(), site.longitude().rad());

        let objective = |f: &Frame| -> Result<f64, SkyframeError> {
            let tod = Equinox::true_of_date(f.time().jd(Timescale::Tt));
            let (ra, dec, _, _) = self.apparent_place(source, f, &tod)?;
            let h = f.time().gst().rad() + lon - ra.rad();
            match event {
                Crossing::Transit => Ok(Angle::new(h).rad()),
                Crossing::Rise | Crossing::Set => {
                    let sin_el =
                        lat.sin() * dec.sin() + lat.cos() * dec.cos() * h.cos();
                    Ok(sin_el.asin() - elevation.rad())
                }
            }
        };

        const STEPS: usize = 96;
        let jd0 = frame.time().jd(Timescale::Tt);
        let step = 1.0 / STEPS as f64;

        let frame_at = |jd: JD| frame.at_time(Time::from_jd(Timescale::Tt, jd, frame.time().eop()));

        let mut prev = objective(frame)?;
        let mut bracket = None;
        for i in 1..=STEPS {
            let jd = jd0 + i as f64 * step;
            let next = objective(&frame_at(jd))?;
            let crosses = match event {
                Crossing::Rise => prev < 0.0 && next >= 0.0,
                Crossing::Set => prev > 0.0 && next <= 0.0,
                // Skip the ±π wrap discontinuity of the hour angle.
                Crossing::Transit => {
                    prev < 0.0 && next >= 0.0 && (next - prev) < std::f64::consts::PI
                }
            };
            if crosses {
                bracket = Some((jd - step, jd));
                break;
            }
            prev = next;
        }

        let Some((mut lo, mut hi)) = bracket else {
            return Ok(f64::NAN);
        };

        let f_lo = objective(&frame_at(lo))?;
        for _ in 0..40 {
            let mid = 0.5 * (lo + hi);
            let f_mid = objective(&frame_at(mid))?;
            if (f_mid > 0.0) == (f_lo > 0.0) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }

    /// The rotation between two celestial systems, `x_to = R · x_from`. Backed by
    /// the crate's own orientation kernels; providers with better precession or
    /// nutation models may override.
    fn orientation(&self, from: &Equinox, to: &Equinox) -> Matrix3<f64> {
        rotation_between(from, to)
    }
}

/// The horizontal refraction seam.
pub trait Refraction: Send + Sync {
    /// Refraction correction to add to an unrefracted elevation.
    fn correction(&self, elevation: Angle, weather: &Weather) -> Angle;
}

/// The standard weather-scaled optical refraction model: good to a couple of
/// arcminutes down to the horizon, vanishing above.
pub struct StandardRefraction;

impl Refraction for StandardRefraction {
    fn correction(&self, elevation: Angle, weather: &Weather) -> Angle {
        let el = elevation.deg();
        if !elevation.is_valid() || !weather.is_valid() || el < -1.0 {
            return Angle::new(0.0);
        }
        let p_mbar = weather.pressure().pa() / 100.0;
        let t_c = weather.temperature().celsius();
        let r = 0.016_667 / ((el + 7.31 / (el + 4.4)) * RADEG).tan()
            * (0.28 * p_mbar / (t_c + 273.0));
        Angle::from_degrees(r)
    }
}

#[cfg(test)]
mod provider_test {
    use super::*;
    use crate::observer::Site;
    use crate::orbital::{OrbitalSystem, ReferencePlane};
    use crate::quantity::interval::Interval;
    use crate::ref_system::obleq;
    use crate::time::Eop;
    use approx::assert_abs_diff_eq;

    /// A provider with no ephemeris data at all; only the default Kepler
    /// propagation is usable.
    struct KeplerOnly;

    impl NumericalProvider for KeplerOnly {
        fn body_state(
            &self,
            body: Planet,
            _time: &Time,
            _accuracy: Accuracy,
        ) -> Result<(Position, Velocity), SkyframeError> {
            Err(SkyframeError::ProviderFailure(format!("no data for {body}")))
        }
    }

    #[test]
    fn test_orbit_plane_tilt() {
        // A circular orbit in the ecliptic plane, started at the ascending node:
        // a quarter period later the body stands at RA 6h, dec +obliquity.
        let eop = Eop::default();
        let epoch = Time::from_jd(Timescale::Tt, 2_460_000.5, &eop);
        let sys = OrbitalSystem::new(Planet::Sun, ReferencePlane::Ecliptic, Equinox::j2000());
        let orbit = Orbital::new(
            &sys,
            &epoch,
            Distance::from_au(1.0),
            Angle::new(0.0),
            &Interval::from_days(365.25),
        );
        let quarter = epoch.shifted(&Interval::from_days(365.25 / 4.0));
        let (pos, _) = KeplerOnly.orbit_posvel(&orbit, &quarter).unwrap();
        let (ra, dec, dist) = pos.as_spherical();
        let eps = obleq(Equinox::j2000().jd());
        assert_abs_diff_eq!(ra.hours(), 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dec.rad(), eps, epsilon = 1e-9);
        assert_abs_diff_eq!(dist.au(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_standard_refraction_horizon() {
        let site = Site::from_gps(45.0, 0.0, 0.0);
        let weather = Weather::guess(&site);
        // Near the horizon the standard model gives about half a degree.
        let r = StandardRefraction.correction(Angle::new(0.0), &weather);
        assert!(r.deg() > 0.4 && r.deg() < 0.6, "r = {}", r.deg());
        // And it falls below an arcminute high in the sky.
        let high = StandardRefraction.correction(Angle::from_degrees(80.0), &weather);
        assert!(high.deg() < 1.0 / 60.0);
    }

    #[test]
    fn test_refraction_guards() {
        let site = Site::from_gps(45.0, 0.0, 0.0);
        let weather = Weather::guess(&site);
        let below = StandardRefraction.correction(Angle::from_degrees(-5.0), &weather);
        assert_abs_diff_eq!(below.rad(), 0.0);
        let invalid = StandardRefraction.correction(Angle::new(f64::NAN), &weather);
        assert_abs_diff_eq!(invalid.rad(), 0.0);
    }
}
