//! # Astronomical time
//!
//! [`Time`] is a single moment stored canonically on the TT timescale as an integer
//! Julian Day plus a day fraction, with the conversion offsets to the other supported
//! timescales cached at construction:
//!
//! - **UTC / TAI / UT1** differ from TT by the leap-second count and ΔUT1 of the
//!   [`Eop`] record the time was built with;
//! - **TDB** differs from TT by the periodic relativistic term (≤ 1.7 ms);
//! - **TCB / TCG** run at different rates, tied to TT at the 1977-01-01 TAI origin.
//!
//! ## Validity
//!
//! A time built from a non-finite date, a |ΔUT1| > 1 s, or a non-finite EOP record
//! is constructible but invalid, and every derived quantity is NaN.

pub mod calendar;
pub mod eop;

pub use calendar::{Calendar, CalendarDate};
pub use eop::Eop;

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::constants::{
    JD_J2000, JD_MJD0, JD_TAI77, JULIAN_YEAR_DAYS, L_B, L_G, RADEG, SECONDS_PER_DAY,
    TT_MINUS_TAI, JD, MJD,
};
use crate::quantity::angle::TimeAngle;
use crate::quantity::interval::Interval;
use crate::ref_system;
use crate::skyframe_errors::SkyframeError;

/// TDB − TCB at the 1977-01-01 TAI origin, in seconds.
const TDB0: f64 = -6.55e-5;

/// The astronomical timescales supported by [`Time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timescale {
    /// Coordinated Universal Time.
    Utc,
    /// International Atomic Time.
    Tai,
    /// Terrestrial Time (the canonical scale of this crate).
    Tt,
    /// Barycentric Dynamical Time.
    Tdb,
    /// Barycentric Coordinate Time.
    Tcb,
    /// Geocentric Coordinate Time.
    Tcg,
    /// Universal Time, tied to the Earth rotation angle.
    Ut1,
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timescale::Utc => "UTC",
            Timescale::Tai => "TAI",
            Timescale::Tt => "TT",
            Timescale::Tdb => "TDB",
            Timescale::Tcb => "TCB",
            Timescale::Tcg => "TCG",
            Timescale::Ut1 => "UT1",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Timescale {
    type Err = SkyframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UTC" => Ok(Timescale::Utc),
            "TAI" => Ok(Timescale::Tai),
            "TT" => Ok(Timescale::Tt),
            "TDB" => Ok(Timescale::Tdb),
            "TCB" => Ok(Timescale::Tcb),
            "TCG" => Ok(Timescale::Tcg),
            "UT1" => Ok(Timescale::Ut1),
            other => Err(SkyframeError::InvalidTimescaleName(other.into())),
        }
    }
}

/// The periodic TDB − TT term in seconds (two-term approximation, good to ~30 µs).
fn tdb_minus_tt(jd_tt: JD) -> f64 {
    let d = jd_tt - JD_J2000;
    let g = (357.53 + 0.985_600_28 * d) * RADEG;
    let l = (246.11 + 0.902_517_92 * d) * RADEG;
    1.657e-3 * g.sin() + 2.2e-5 * l.sin()
}

/// Instantaneous d(TDB − TT)/dt in s/s, the analytic derivative of the term above.
pub(crate) fn tdb_rate(jd_tt: JD) -> f64 {
    let d = jd_tt - JD_J2000;
    let g = (357.53 + 0.985_600_28 * d) * RADEG;
    let l = (246.11 + 0.902_517_92 * d) * RADEG;
    let per_day = 1.657e-3 * g.cos() * 0.985_600_28 * RADEG
        + 2.2e-5 * l.cos() * 0.902_517_92 * RADEG;
    per_day / SECONDS_PER_DAY
}

/// A single astronomical moment, stored on the TT timescale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    /// Integer part of the TT Julian Date.
    ijd: i64,
    /// Fractional day in [0, 1).
    fjd: f64,
    /// Cached TT − UT1 in seconds (= 32.184 + leap − ΔUT1).
    ut1_to_tt: f64,
    /// Cached TDB − TT in seconds at this moment.
    tt_to_tdb: f64,
    eop: Eop,
    valid: bool,
}

impl Time {
    fn invalid(eop: &Eop) -> Time {
        Time {
            ijd: 0,
            fjd: f64::NAN,
            ut1_to_tt: f64::NAN,
            tt_to_tdb: f64::NAN,
            eop: *eop,
            valid: false,
        }
    }

    fn from_jd_tt(jd_tt: JD, eop: &Eop) -> Time {
        let ijd = jd_tt.floor();
        Time {
            ijd: ijd as i64,
            fjd: jd_tt - ijd,
            ut1_to_tt: TT_MINUS_TAI + eop.leap_seconds() as f64 - eop.dut1(),
            tt_to_tdb: tdb_minus_tt(jd_tt),
            eop: *eop,
            valid: true,
        }
    }

    /// New time from a Julian Date on any supported timescale.
    ///
    /// Invalid when the date is non-finite, the EOP record is non-finite, or
    /// |ΔUT1| exceeds one second (a bulletin value can never do that).
    pub fn from_jd(scale: Timescale, jd: JD, eop: &Eop) -> Time {
        if !jd.is_finite() || !eop.is_valid() || eop.dut1().abs() > 1.0 {
            log::debug!("Time::from_jd: invalid input (jd={jd}, scale={scale})");
            return Time::invalid(eop);
        }

        let leap = eop.leap_seconds() as f64;
        let jd_tt = match scale {
            Timescale::Tt => jd,
            Timescale::Tai => jd + TT_MINUS_TAI / SECONDS_PER_DAY,
            Timescale::Utc => jd + (TT_MINUS_TAI + leap) / SECONDS_PER_DAY,
            Timescale::Ut1 => {
                jd + (TT_MINUS_TAI + leap - eop.dut1()) / SECONDS_PER_DAY
            }
            Timescale::Tdb => jd - tdb_minus_tt(jd) / SECONDS_PER_DAY,
            Timescale::Tcg => jd - L_G * (jd - JD_TAI77),
            Timescale::Tcb => {
                let jd_tdb = jd - L_B * (jd - JD_TAI77) + TDB0 / SECONDS_PER_DAY;
                jd_tdb - tdb_minus_tt(jd_tdb) / SECONDS_PER_DAY
            }
        };

        Time::from_jd_tt(jd_tt, eop)
    }

    /// New time from a Modified Julian Date on any supported timescale.
    pub fn from_mjd(scale: Timescale, mjd: MJD, eop: &Eop) -> Time {
        Time::from_jd(scale, mjd + JD_MJD0, eop)
    }

    /// The current moment from the system clock, paired with the given EOP record.
    pub fn now(eop: &Eop) -> Time {
        match hifitime::Epoch::now() {
            Ok(epoch) => Time::from_mjd(Timescale::Utc, epoch.to_mjd_utc_days(), eop),
            Err(e) => {
                log::debug!("Time::now: system clock unavailable: {e}");
                Time::invalid(eop)
            }
        }
    }

    /// The Julian Date on the requested timescale. NaN for an invalid time.
    pub fn jd(&self, scale: Timescale) -> JD {
        if !self.valid {
            return f64::NAN;
        }
        let tt = self.ijd as f64 + self.fjd;
        let leap = self.eop.leap_seconds() as f64;
        match scale {
            Timescale::Tt => tt,
            Timescale::Tai => tt - TT_MINUS_TAI / SECONDS_PER_DAY,
            Timescale::Utc => tt - (TT_MINUS_TAI + leap) / SECONDS_PER_DAY,
            Timescale::Ut1 => tt - self.ut1_to_tt / SECONDS_PER_DAY,
            Timescale::Tdb => tt + self.tt_to_tdb / SECONDS_PER_DAY,
            Timescale::Tcg => (tt - L_G * JD_TAI77) / (1.0 - L_G),
            Timescale::Tcb => {
                let jd_tdb = tt + self.tt_to_tdb / SECONDS_PER_DAY;
                (jd_tdb - TDB0 / SECONDS_PER_DAY - L_B * JD_TAI77) / (1.0 - L_B)
            }
        }
    }

    /// The Modified Julian Date on the requested timescale.
    pub fn mjd(&self, scale: Timescale) -> MJD {
        self.jd(scale) - JD_MJD0
    }

    /// The EOP record this time was constructed with.
    pub fn eop(&self) -> &Eop {
        &self.eop
    }

    /// The Julian epoch year of this moment (TT).
    pub fn epoch(&self) -> f64 {
        2000.0 + (self.jd(Timescale::Tt) - JD_J2000) / JULIAN_YEAR_DAYS
    }

    /// Hours elapsed since the preceding UTC midnight.
    pub fn time_of_day(&self) -> f64 {
        let jd_utc = self.jd(Timescale::Utc);
        (jd_utc + 0.5 - (jd_utc + 0.5).floor()) * 24.0
    }

    /// Day of the week of the UTC date, 0 = Sunday … 6 = Saturday.
    pub fn day_of_week(&self) -> Option<u32> {
        if !self.valid {
            return None;
        }
        let jdn = (self.jd(Timescale::Utc) + 0.5).floor() as i64;
        Some((((jdn + 1) % 7 + 7) % 7) as u32)
    }

    /// The Earth Rotation Angle at this moment.
    pub fn era(&self) -> TimeAngle {
        TimeAngle::new(ref_system::era(self.jd(Timescale::Ut1)))
    }

    /// Greenwich Apparent Sidereal Time at this moment.
    pub fn gst(&self) -> TimeAngle {
        TimeAngle::new(ref_system::gast(self.jd(Timescale::Ut1), self.jd(Timescale::Tt)))
    }

    /// A new time displaced by the given interval. The EOP record is carried over;
    /// the TDB offset is re-evaluated at the new date.
    pub fn shifted(&self, dt: &Interval) -> Time {
        if !self.valid || !dt.is_valid() {
            return Time::invalid(&self.eop);
        }
        // Add on the fractional day and carry, so the shift keeps the full
        // split-day resolution instead of collapsing through a single f64 JD.
        let mut fjd = self.fjd + dt.tt_seconds() / SECONDS_PER_DAY;
        let carry = fjd.floor();
        fjd -= carry;
        let ijd = self.ijd + carry as i64;
        Time {
            ijd,
            fjd,
            ut1_to_tt: self.ut1_to_tt,
            tt_to_tdb: tdb_minus_tt(ijd as f64 + fjd),
            eop: self.eop,
            valid: true,
        }
    }

    /// Calendar date of this moment on the given timescale.
    pub fn to_calendar_date(&self, calendar: Calendar, scale: Timescale) -> CalendarDate {
        CalendarDate::from_jd(self.jd(scale), calendar)
    }

    /// ISO 8601 rendering of the UTC date, e.g. `"2025-08-23T12:34:56.789Z"`.
    pub fn iso_str(&self) -> String {
        if !self.valid {
            return "(invalid time)".into();
        }
        format!("{}Z", self.to_calendar_date(Calendar::Gregorian, Timescale::Utc))
    }

    /// Date rendering on an explicit timescale, e.g. `"2025-08-23T12:34:56.789 TDB"`.
    pub fn str_timescale(&self, scale: Timescale) -> String {
        if !self.valid {
            return "(invalid time)".into();
        }
        format!("{} {}", self.to_calendar_date(Calendar::Gregorian, scale), scale)
    }

    /// Julian epoch rendering, e.g. `"J2025.64"`.
    pub fn epoch_str(&self) -> String {
        if !self.valid {
            return "(invalid time)".into();
        }
        format!("J{:.2}", self.epoch())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Compare within an explicit tolerance in seconds, via the canonical TT scale.
    pub fn is_equal(&self, other: &Time, precision: f64) -> bool {
        (*self - *other).seconds().abs() <= precision
    }
}

impl Sub for Time {
    type Output = Interval;

    /// The elapsed TT interval between two moments. The integer and fractional day
    /// parts are differenced separately to keep sub-microsecond resolution over
    /// long baselines.
    fn sub(self, rhs: Time) -> Interval {
        if !self.valid || !rhs.valid {
            return Interval::from_seconds(f64::NAN);
        }
        let days = (self.ijd - rhs.ijd) as f64;
        let frac = self.fjd - rhs.fjd;
        Interval::from_seconds((days + frac) * SECONDS_PER_DAY)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_str())
    }
}
