//! # Calendar dates
//!
//! Conversion between Julian Dates and civil calendar dates, in three flavors:
//!
//! - [`Calendar::Gregorian`]: the proleptic Gregorian calendar for all dates;
//! - [`Calendar::RomanJulian`]: the Julian calendar for all dates;
//! - [`Calendar::Astronomical`]: Julian before the 1582 Gregorian reform,
//!   Gregorian from 1582-10-15 on, the convention of historical astronomy.
//!
//! A [`CalendarDate`] remembers the calendar it was expressed in, so converting it
//! back to a [`Time`] needs no further context beyond an EOP record and timescale.

use std::fmt;

use crate::constants::{JD_GREGORIAN_REFORM, JD};
use crate::time::{Eop, Time, Timescale};

/// Names of the twelve months.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Names of the days of the week, indexed 0 = Sunday.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// The civil calendar used to express a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Proleptic Gregorian calendar for all dates.
    Gregorian,
    /// Julian (old style) calendar for all dates.
    RomanJulian,
    /// Julian before the 1582 reform, Gregorian after.
    Astronomical,
}

/// Julian Day Number (at noon) of a Gregorian calendar date.
fn gregorian_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month).div_euclid(12);
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045
}

/// Julian Day Number (at noon) of a Julian calendar date.
fn julian_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month).div_euclid(12);
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - 32083
}

/// Gregorian calendar date of a Julian Day Number.
fn jdn_to_gregorian(jdn: i64) -> (i64, u32, u32) {
    let a = jdn + 32044;
    let b = (4 * a + 3).div_euclid(146097);
    let c = a - (146097 * b).div_euclid(4);
    split_julian_cycle(100 * b, c)
}

/// Julian calendar date of a Julian Day Number.
fn jdn_to_julian(jdn: i64) -> (i64, u32, u32) {
    jdn_to_gregorian_like(jdn + 32082)
}

fn jdn_to_gregorian_like(c: i64) -> (i64, u32, u32) {
    split_julian_cycle(0, c)
}

/// Common tail of the calendar inversion: `centuries` is the century count already
/// extracted (zero for the Julian calendar), `c` the remaining day count.
fn split_julian_cycle(centuries: i64, c: i64) -> (i64, u32, u32) {
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2).div_euclid(153);
    let day = e - (153 * m + 2).div_euclid(5) + 1;
    let month = m + 3 - 12 * m.div_euclid(10);
    let year = centuries + d - 4800 + m.div_euclid(10);
    (year, month as u32, day as u32)
}

/// A civil calendar date with a time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    calendar: Calendar,
    year: i64,
    month: u32,
    day: u32,
    /// Time of day in hours, [0, 24).
    hours: f64,
}

impl CalendarDate {
    /// New date in the given calendar. Out-of-range fields are stored as given and
    /// reported through `is_valid()`.
    pub fn new(calendar: Calendar, year: i64, month: u32, day: u32, hours: f64) -> Self {
        let date = CalendarDate { calendar, year, month, day, hours };
        if !date.is_valid() {
            log::debug!("CalendarDate::new: out-of-range date {year}-{month}-{day} {hours}h");
        }
        date
    }

    /// The calendar date of a Julian Date in the given calendar. A non-finite date
    /// yields an invalid value.
    pub fn from_jd(jd: JD, calendar: Calendar) -> Self {
        if !jd.is_finite() {
            log::debug!("CalendarDate::from_jd: non-finite date {jd}");
            return CalendarDate { calendar, year: 0, month: 0, day: 0, hours: f64::NAN };
        }

        let shifted = jd + 0.5;
        let jdn = shifted.floor();
        let hours = (shifted - jdn) * 24.0;
        let jdn = jdn as i64;

        let use_gregorian = match calendar {
            Calendar::Gregorian => true,
            Calendar::RomanJulian => false,
            Calendar::Astronomical => jd >= JD_GREGORIAN_REFORM,
        };
        let (year, month, day) = if use_gregorian {
            jdn_to_gregorian(jdn)
        } else {
            jdn_to_julian(jdn)
        };

        CalendarDate { calendar, year, month, day, hours }
    }

    /// The [`Time`] of this date read on the given timescale.
    pub fn to_time(&self, eop: &Eop, scale: Timescale) -> Time {
        if !self.is_valid() {
            return Time::from_jd(scale, f64::NAN, eop);
        }

        let (y, m, d) = (self.year, self.month as i64, self.day as i64);
        let jdn = match self.calendar {
            Calendar::Gregorian => gregorian_to_jdn(y, m, d),
            Calendar::RomanJulian => julian_to_jdn(y, m, d),
            Calendar::Astronomical => {
                let g = gregorian_to_jdn(y, m, d);
                if (g as f64) - 0.5 >= JD_GREGORIAN_REFORM {
                    g
                } else {
                    julian_to_jdn(y, m, d)
                }
            }
        };

        Time::from_jd(scale, jdn as f64 - 0.5 + self.hours / 24.0, eop)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    /// Month number, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The English month name.
    pub fn month_name(&self) -> Option<&'static str> {
        MONTH_NAMES.get(self.month.wrapping_sub(1) as usize).copied()
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Time of day in hours.
    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hours.is_finite()
            && (0.0..24.0).contains(&self.hours)
    }
}

impl fmt::Display for CalendarDate {
    /// ISO-like rendering with millisecond resolution,
    /// e.g. `"2025-08-23T12:34:56.789"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "(invalid date)");
        }
        let mut ms = (self.hours * 3_600_000.0).round() as i64;
        // Rounding must not spill into the next day.
        if ms >= 86_400_000 {
            ms = 86_399_999;
        }
        let h = ms / 3_600_000;
        let m = (ms / 60_000) % 60;
        let s = (ms / 1000) % 60;
        let milli = ms % 1000;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, h, m, s, milli
        )
    }
}

#[cfg(test)]
mod calendar_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn eop() -> Eop {
        Eop::new(37, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_j2000_date() {
        let d = CalendarDate::from_jd(2_451_545.0, Calendar::Gregorian);
        assert_eq!((d.year(), d.month(), d.day()), (2000, 1, 1));
        assert_abs_diff_eq!(d.hours(), 12.0, epsilon = 1e-9);
        assert_eq!(d.month_name(), Some("January"));
    }

    #[test]
    fn test_round_trip_modern() {
        let e = eop();
        let t = Time::from_jd(Timescale::Utc, 2_460_123.456_789, &e);
        let d = t.to_calendar_date(Calendar::Gregorian, Timescale::Utc);
        let back = d.to_time(&e, Timescale::Utc);
        assert!(t.is_equal(&back, 1e-4));
    }

    #[test]
    fn test_gregorian_reform_boundary() {
        // 1582-10-04 Julian is immediately followed by 1582-10-15 Gregorian.
        let before = CalendarDate::from_jd(JD_GREGORIAN_REFORM - 1.0 + 0.5, Calendar::Astronomical);
        assert_eq!((before.year(), before.month(), before.day()), (1582, 10, 4));

        let after = CalendarDate::from_jd(JD_GREGORIAN_REFORM + 0.5, Calendar::Astronomical);
        assert_eq!((after.year(), after.month(), after.day()), (1582, 10, 15));
    }

    #[test]
    fn test_round_trip_across_reform() {
        let e = eop();
        for jd in [JD_GREGORIAN_REFORM - 10.25, JD_GREGORIAN_REFORM + 10.25] {
            let t = Time::from_jd(Timescale::Tt, jd, &e);
            let d = t.to_calendar_date(Calendar::Astronomical, Timescale::Tt);
            let back = d.to_time(&e, Timescale::Tt);
            assert!(t.is_equal(&back, 1e-4), "round trip failed at jd {jd}");
        }
    }

    #[test]
    fn test_julian_vs_gregorian_offset() {
        // In 2000, the Julian calendar lags the Gregorian by 13 days.
        let g = CalendarDate::from_jd(2_451_545.0, Calendar::Gregorian);
        let j = CalendarDate::from_jd(2_451_545.0, Calendar::RomanJulian);
        assert_eq!((g.month(), g.day()), (1, 1));
        assert_eq!((j.year(), j.month(), j.day()), (1999, 12, 19));
    }

    #[test]
    fn test_display() {
        let d = CalendarDate::new(Calendar::Gregorian, 2025, 8, 23, 12.5);
        assert_eq!(format!("{d}"), "2025-08-23T12:30:00.000");
    }

    #[test]
    fn test_invalid_date() {
        let d = CalendarDate::new(Calendar::Gregorian, 2025, 13, 1, 0.0);
        assert!(!d.is_valid());
        assert!(!d.to_time(&eop(), Timescale::Utc).is_valid());
        assert!(!CalendarDate::from_jd(f64::NAN, Calendar::Gregorian).is_valid());
    }

    #[test]
    fn test_month_names_complete() {
        assert_eq!(MONTH_NAMES.len(), 12);
        assert_eq!(MONTH_NAMES[7], "August");
        assert_eq!(MONTH_NAMES[8], "September");
    }
}
