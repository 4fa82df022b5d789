//! # Earth orientation parameters
//!
//! [`Eop`] bundles the measured quantities that connect the celestial and
//! terrestrial frames: the accumulated leap-second count, the UT1−UTC offset, and
//! the polar-motion coordinates. Values come from IERS bulletins; the library only
//! consumes them.
//!
//! Two derived records are available: [`Eop::itrf_transformed`] re-expresses the
//! parameters in a different ITRF realization, and [`Eop::diurnal_corrected`] adds
//! the sub-daily tidal variations at a given moment. Both retain the leap-second
//! count unchanged, since leap seconds are a property of UTC, not of the frame.

use crate::constants::ArcSec;
use crate::time::Time;

/// Earth rotation rate in milliarcseconds of rotation per second of UT1, used to
/// convert a frame rotation about the pole into a UT1 shift.
const SPIN_MAS_PER_S: f64 = 15_041.067;

/// Rotation offsets (R1, R2, R3) of an ITRF realization relative to ITRF2014, in
/// milliarcseconds. Modern realizations are aligned in rotation by construction;
/// only the early ones carry an offset, with ITRF93 the well-known outlier.
fn itrf_rotation(year: i32) -> (f64, f64, f64) {
    match year {
        y if y >= 2000 => (0.0, 0.0, 0.0),
        1993 => (-2.81, -3.38, 0.40),
        _ => (0.0, 0.0, 0.26),
    }
}

/// Earth orientation parameters at some moment, as published by the IERS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eop {
    leap: i32,
    dut1: f64,
    xp: ArcSec,
    yp: ArcSec,

    // Previously applied diurnal corrections, so that repeated calls to
    // diurnal_corrected() replace rather than accumulate. [arcsec, arcsec, s]
    dxp: f64,
    dyp: f64,
    ddt: f64,
}

impl Eop {
    /// New parameter set.
    ///
    /// Arguments
    /// ---------
    /// * `leap`: accumulated leap seconds (TAI − UTC).
    /// * `dut1`: UT1 − UTC in seconds.
    /// * `xp`, `yp`: polar motion coordinates in arcseconds.
    ///
    /// Non-finite inputs are stored as given; they surface as invalidity of any
    /// [`Time`] built with this record.
    pub fn new(leap: i32, dut1: f64, xp: ArcSec, yp: ArcSec) -> Self {
        if !(dut1.is_finite() && xp.is_finite() && yp.is_finite()) {
            log::debug!("Eop::new: non-finite parameters (dut1={dut1}, xp={xp}, yp={yp})");
        }
        Eop { leap, dut1, xp, yp, dxp: 0.0, dyp: 0.0, ddt: 0.0 }
    }

    /// Accumulated leap seconds (TAI − UTC).
    pub fn leap_seconds(&self) -> i32 {
        self.leap
    }

    /// UT1 − UTC in seconds.
    pub fn dut1(&self) -> f64 {
        self.dut1
    }

    /// Polar motion x-coordinate in arcseconds.
    pub fn xp(&self) -> ArcSec {
        self.xp
    }

    /// Polar motion y-coordinate in arcseconds.
    pub fn yp(&self) -> ArcSec {
        self.yp
    }

    /// All numeric parameters are finite.
    pub fn is_valid(&self) -> bool {
        self.dut1.is_finite() && self.xp.is_finite() && self.yp.is_finite()
    }

    /// Re-express these parameters in another ITRF realization.
    ///
    /// A realization differs from another by a small rigid rotation of the
    /// terrestrial frame: the equatorial components shift the pole coordinates and
    /// the polar component shifts UT1. The leap-second count is retained.
    pub fn itrf_transformed(&self, from_year: i32, to_year: i32) -> Eop {
        let (f1, f2, f3) = itrf_rotation(from_year);
        let (t1, t2, t3) = itrf_rotation(to_year);
        let (r1, r2, r3) = (f1 - t1, f2 - t2, f3 - t3);

        let mut out = *self;
        out.xp = self.xp + r2 * 1e-3;
        out.yp = self.yp + r1 * 1e-3;
        out.dut1 = self.dut1 - r3 / SPIN_MAS_PER_S;
        out
    }

    /// Apply the sub-daily tidal variations of the Earth orientation at the given
    /// moment: the leading ocean-tide constituents folded to once and twice the
    /// Earth rotation angle.
    ///
    /// The correction replaces any previously applied diurnal correction, so the
    /// method can be called repeatedly on the updated record as time advances. The
    /// leap-second count is retained.
    pub fn diurnal_corrected(&self, time: &Time) -> Eop {
        let theta = time.era().rad();
        let (s1, c1) = theta.sin_cos();
        let (s2, c2) = (2.0 * theta).sin_cos();

        // Leading diurnal and semidiurnal terms, amplitudes in mas / ms.
        let dxp = (0.141 * s1 - 0.099 * c1 + 0.204 * s2 + 0.061 * c2) * 1e-3;
        let dyp = (-0.099 * s1 - 0.141 * c1 + 0.061 * s2 - 0.204 * c2) * 1e-3;
        let ddt = (0.020 * s2 - 0.012 * c2) * 1e-3;

        let mut out = *self;
        out.xp = self.xp + dxp - self.dxp;
        out.yp = self.yp + dyp - self.dyp;
        out.dut1 = self.dut1 + ddt - self.ddt;
        out.dxp = dxp;
        out.dyp = dyp;
        out.ddt = ddt;
        out
    }
}

impl Default for Eop {
    /// A zero parameter set with the leap-second count of the 2017-01-01 epoch.
    fn default() -> Self {
        Eop::new(37, 0.0, 0.0, 0.0)
    }
}
