//! # Quadratic trajectory tracks
//!
//! A [`Track`] is a short-lived quadratic model of a moving source: one
//! [`Motion`] (value, rate, acceleration) per spherical axis, fit around a
//! reference moment and declared valid over a stated time range. Tracks are for
//! interpolating between full provider calls, not for long-arc propagation.
//!
//! ## Range vs. value validity
//!
//! Evaluating a track outside its declared range is allowed and returns a real
//! extrapolated value; [`Track::is_valid_at`] is the separate predicate that tells
//! the caller the extrapolation has left the fit window and a re-fit is due.

use std::fmt;

use crate::constants::DPI;
use crate::equinox::Equinox;
use crate::quantity::angle::{Angle, TimeAngle};
use crate::quantity::distance::Distance;
use crate::quantity::interval::Interval;
use crate::spherical::{Equatorial, Horizontal};
use crate::time::Time;

/// A quadratic motion model for one scalar axis: `value + t·rate + t²·accel`,
/// with `t` in seconds from the reference moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    value: f64,
    rate: f64,
    accel: f64,
}

impl Motion {
    pub fn new(value: f64, rate: f64, accel: f64) -> Self {
        Motion { value, rate, accel }
    }

    /// The modeled value `dt` seconds from the reference moment.
    pub fn at(&self, dt: f64) -> f64 {
        self.value + dt * (self.rate + dt * self.accel)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// First derivative at the reference moment, per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Half the second derivative, per second squared.
    pub fn accel(&self) -> f64 {
        self.accel
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_finite() && self.rate.is_finite() && self.accel.is_finite()
    }
}

/// A spherical trajectory model around a reference time: one [`Motion`] each for
/// longitude, latitude and distance, plus the declared validity range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    ref_time: Time,
    range: Interval,
    lon: Motion,
    lat: Motion,
    dist: Motion,
    valid: bool,
}

impl Track {
    /// A track from explicit per-axis motions. The range is the half-width of the
    /// validity window around the reference time.
    pub fn new(ref_time: &Time, range: &Interval, lon: Motion, lat: Motion, dist: Motion) -> Self {
        let valid = ref_time.is_valid()
            && range.is_valid()
            && range.seconds() >= 0.0
            && lon.is_valid()
            && lat.is_valid()
            && dist.is_valid();
        Track { ref_time: *ref_time, range: *range, lon, lat, dist, valid }
    }

    /// Fit a track to three places sampled at `ref_time − step`, `ref_time` and
    /// `ref_time + step`, by central differences. The longitude samples are
    /// unwrapped around the middle one, so a track straddling the 0/2π seam fits
    /// the short way round.
    pub fn fit(
        ref_time: &Time,
        range: &Interval,
        step: &Interval,
        samples: &[(TimeAngle, Angle, Distance); 3],
    ) -> Self {
        let h = step.tt_seconds();

        let l1 = samples[1].0.rad();
        let unwrap = |l: f64| {
            let mut l = l;
            while l - l1 > std::f64::consts::PI {
                l -= DPI;
            }
            while l1 - l > std::f64::consts::PI {
                l += DPI;
            }
            l
        };
        let (l0, l2) = (unwrap(samples[0].0.rad()), unwrap(samples[2].0.rad()));
        let (b0, b1, b2) = (samples[0].1.rad(), samples[1].1.rad(), samples[2].1.rad());
        let (d0, d1, d2) = (samples[0].2.m(), samples[1].2.m(), samples[2].2.m());

        let motion = |v0: f64, v1: f64, v2: f64| {
            Motion::new(v1, (v2 - v0) / (2.0 * h), (v0 - 2.0 * v1 + v2) / (2.0 * h * h))
        };

        Track::new(
            ref_time,
            range,
            motion(l0, l1, l2),
            motion(b0, b1, b2),
            motion(d0, d1, d2),
        )
    }

    pub fn ref_time(&self) -> &Time {
        &self.ref_time
    }

    pub fn range(&self) -> &Interval {
        &self.range
    }

    pub fn longitude(&self) -> &Motion {
        &self.lon
    }

    pub fn latitude(&self) -> &Motion {
        &self.lat
    }

    pub fn distance(&self) -> &Motion {
        &self.dist
    }

    /// Whether the given moment falls inside the declared fit window. This is a
    /// range check, not a value check: evaluation outside the window still works.
    pub fn is_valid_at(&self, time: &Time) -> bool {
        self.valid && (*time - self.ref_time).tt_seconds().abs() <= self.range.seconds()
    }

    /// The modeled spherical place at a moment, wrapped back onto the standard
    /// angle ranges. `None` when the track itself is invalid.
    pub fn place_at(&self, time: &Time) -> Option<(TimeAngle, Angle, Distance)> {
        if !self.valid || !time.is_valid() {
            return None;
        }
        let dt = (*time - self.ref_time).tt_seconds();
        Some((
            TimeAngle::new(self.lon.at(dt)),
            Angle::new(self.lat.at(dt)),
            Distance::new(self.dist.at(dt)),
        ))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "track @ {} (±{:.0} s)",
            self.ref_time,
            self.range.seconds()
        )
    }
}

/// A [`Track`] of equatorial coordinates, tagged with the system it was fit in.
#[derive(Debug, Clone)]
pub struct EquatorialTrack {
    system: Equinox,
    track: Track,
}

impl EquatorialTrack {
    pub fn new(system: &Equinox, track: Track) -> Self {
        EquatorialTrack { system: system.clone(), track }
    }

    pub fn system(&self) -> &Equinox {
        &self.system
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn is_valid_at(&self, time: &Time) -> bool {
        self.system.is_valid() && self.track.is_valid_at(time)
    }

    /// The modeled equatorial place at a moment; `None` when the track or its
    /// system is invalid. Range validity is checked separately.
    pub fn projected_at(&self, time: &Time) -> Option<Equatorial> {
        if !self.system.is_valid() {
            return None;
        }
        let (ra, dec, dist) = self.track.place_at(time)?;
        Some(Equatorial::new(ra, dec, dist, &self.system))
    }
}

/// A [`Track`] of horizontal coordinates for a fixed observing site.
#[derive(Debug, Clone)]
pub struct HorizontalTrack {
    track: Track,
}

impl HorizontalTrack {
    pub fn new(track: Track) -> Self {
        HorizontalTrack { track }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn is_valid_at(&self, time: &Time) -> bool {
        self.track.is_valid_at(time)
    }

    /// The modeled horizontal place at a moment; `None` when the track is
    /// invalid. Range validity is checked separately.
    pub fn projected_at(&self, time: &Time) -> Option<Horizontal> {
        let (az, el, dist) = self.track.place_at(time)?;
        Some(Horizontal::new(az, el, dist))
    }
}

#[cfg(test)]
mod track_test {
    use super::*;
    use crate::time::{Eop, Timescale};
    use approx::assert_relative_eq;

    fn t0() -> Time {
        Time::from_jd(Timescale::Tt, 2_460_000.5, &Eop::default())
    }

    // Offsets go through the split-day shift, so the evaluated dt is exact.
    fn shifted(base: &Time, seconds: f64) -> Time {
        base.shifted(&Interval::from_seconds(seconds))
    }

    #[test]
    fn test_fit_reproduces_quadratic() {
        // Samples taken from lat(t) = 0.3 + 1e-5 t + 2e-9 t^2 with h = 100 s.
        let quad = |t: f64| 0.3 + 1e-5 * t + 2e-9 * t * t;
        let base = t0();
        let samples = [
            (TimeAngle::new(1.0), Angle::new(quad(-100.0)), Distance::new(1.0e11)),
            (TimeAngle::new(1.0), Angle::new(quad(0.0)), Distance::new(1.0e11)),
            (TimeAngle::new(1.0), Angle::new(quad(100.0)), Distance::new(1.0e11)),
        ];
        let track = Track::fit(
            &base,
            &Interval::from_seconds(300.0),
            &Interval::from_seconds(100.0),
            &samples,
        );
        assert!(track.is_valid());
        assert_relative_eq!(track.latitude().rate(), 1e-5, epsilon = 1e-15);
        assert_relative_eq!(track.latitude().accel(), 2e-9, epsilon = 1e-18);
        let (_, lat, _) = track.place_at(&shifted(&base, 250.0)).unwrap();
        assert_relative_eq!(lat.rad(), quad(250.0), epsilon = 1e-12);
    }

    #[test]
    fn test_range_check_is_separate() {
        let base = t0();
        let track = Track::new(
            &base,
            &Interval::from_seconds(60.0),
            Motion::new(1.0, 1e-6, 0.0),
            Motion::new(0.5, 0.0, 0.0),
            Motion::new(1.0e11, 0.0, 0.0),
        );
        let late = shifted(&base, 120.0);
        assert!(!track.is_valid_at(&late));
        // Out of range but still evaluable.
        let (lon, _, _) = track.place_at(&late).unwrap();
        assert_relative_eq!(lon.rad(), 1.0 + 120.0 * 1e-6, epsilon = 1e-12);
        assert!(track.is_valid_at(&shifted(&base, 59.0)));
    }

    #[test]
    fn test_longitude_unwraps_across_seam() {
        // 359°, 0°, 1°: the fit must see a steady +1°/h, not a 2π jump.
        let base = t0();
        let deg = std::f64::consts::PI / 180.0;
        let samples = [
            (TimeAngle::new(359.0 * deg), Angle::new(0.0), Distance::new(1.0e11)),
            (TimeAngle::new(0.0), Angle::new(0.0), Distance::new(1.0e11)),
            (TimeAngle::new(1.0 * deg), Angle::new(0.0), Distance::new(1.0e11)),
        ];
        let track = Track::fit(
            &base,
            &Interval::from_seconds(7200.0),
            &Interval::from_seconds(3600.0),
            &samples,
        );
        assert_relative_eq!(track.longitude().rate(), deg / 3600.0, epsilon = 1e-15);
        assert_relative_eq!(track.longitude().accel(), 0.0, epsilon = 1e-15);
        // Half an hour on: 0.5 degrees, wrapped into [0, 2π).
        let (lon, _, _) = track.place_at(&shifted(&base, 1800.0)).unwrap();
        assert_relative_eq!(lon.deg(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_projections_return_none_when_invalid() {
        let base = t0();
        let bad = Track::new(
            &base,
            &Interval::from_seconds(60.0),
            Motion::new(f64::NAN, 0.0, 0.0),
            Motion::new(0.0, 0.0, 0.0),
            Motion::new(1.0, 0.0, 0.0),
        );
        assert!(!bad.is_valid());
        assert!(EquatorialTrack::new(Equinox::icrs(), bad).projected_at(&base).is_none());
        assert!(HorizontalTrack::new(bad).projected_at(&base).is_none());
    }
}
