//! # Time intervals
//!
//! [`Interval`] is an elapsed duration tagged with the timescale whose seconds it
//! counts. Most timescales tick at the TT rate for interval purposes, but the
//! coordinate timescales TCB and TCG run fast relative to TT by the IAU rate
//! constants `L_B` and `L_G`; [`Interval::tt_seconds`] removes that rate so that
//! intervals from different scales combine consistently.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::constants::{JULIAN_CENTURY_DAYS, JULIAN_YEAR_DAYS, L_B, L_G, SECONDS_PER_DAY};
use crate::time::Timescale;

/// An elapsed duration in seconds of a given timescale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    seconds: f64,
    scale: Timescale,
}

impl Interval {
    /// New interval from seconds of the given timescale.
    pub fn new(seconds: f64, scale: Timescale) -> Self {
        Interval { seconds, scale }
    }

    /// New interval from seconds of TT.
    pub fn from_seconds(seconds: f64) -> Self {
        Interval::new(seconds, Timescale::Tt)
    }

    /// New interval from days of TT.
    pub fn from_days(days: f64) -> Self {
        Interval::from_seconds(days * SECONDS_PER_DAY)
    }

    /// The timescale whose seconds this interval counts.
    pub fn scale(&self) -> Timescale {
        self.scale
    }

    /// The raw duration in seconds of the tagged timescale.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// The duration converted to seconds of TT.
    ///
    /// TCB and TCG seconds are shorter than TT seconds by the `L_B` / `L_G` rates;
    /// all other supported scales tick at the TT rate as far as elapsed intervals
    /// are concerned (UTC leap seconds are steps, not rate changes).
    pub fn tt_seconds(&self) -> f64 {
        match self.scale {
            Timescale::Tcb => self.seconds * (1.0 - L_B),
            Timescale::Tcg => self.seconds * (1.0 - L_G),
            _ => self.seconds,
        }
    }

    pub fn milliseconds(&self) -> f64 {
        self.seconds * 1e3
    }

    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    pub fn hours(&self) -> f64 {
        self.seconds / 3600.0
    }

    pub fn days(&self) -> f64 {
        self.seconds / SECONDS_PER_DAY
    }

    /// Duration in Julian years (365.25 days).
    pub fn julian_years(&self) -> f64 {
        self.days() / JULIAN_YEAR_DAYS
    }

    /// Duration in Julian centuries (36525 days).
    pub fn julian_centuries(&self) -> f64 {
        self.days() / JULIAN_CENTURY_DAYS
    }

    pub fn is_valid(&self) -> bool {
        self.seconds.is_finite()
    }

    /// Compare within an explicit tolerance in seconds (after reduction to TT).
    pub fn is_equal(&self, other: &Interval, precision: f64) -> bool {
        (self.tt_seconds() - other.tt_seconds()).abs() <= precision
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s ({})", self.seconds, self.scale)
    }
}

impl Add for Interval {
    type Output = Interval;

    /// Sum of two intervals. Same-scale operands keep their scale; mixed scales
    /// are reduced to TT seconds first and the result is tagged TT.
    fn add(self, rhs: Interval) -> Interval {
        if self.scale == rhs.scale {
            Interval::new(self.seconds + rhs.seconds, self.scale)
        } else {
            Interval::from_seconds(self.tt_seconds() + rhs.tt_seconds())
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::new(-self.seconds, self.scale)
    }
}

#[cfg(test)]
mod interval_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accessors() {
        let i = Interval::from_days(36525.0);
        assert_relative_eq!(i.julian_centuries(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(i.julian_years(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(i.hours(), 36525.0 * 24.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tcb_rate() {
        let year_tcb = Interval::new(JULIAN_YEAR_DAYS * SECONDS_PER_DAY, Timescale::Tcb);
        let drift = year_tcb.seconds() - year_tcb.tt_seconds();
        // TCB gains about 0.489 s per year over TT
        assert_relative_eq!(drift, 0.489, epsilon = 1e-3);
    }

    #[test]
    fn test_mixed_scale_sum() {
        let a = Interval::new(1000.0, Timescale::Tcg);
        let b = Interval::from_seconds(1.0);
        let sum = a + b;
        assert_eq!(sum.scale(), Timescale::Tt);
        assert_relative_eq!(sum.seconds(), 1001.0 - 1000.0 * L_G, epsilon = 1e-9);
    }

    #[test]
    fn test_same_scale_sum_keeps_scale() {
        let a = Interval::new(10.0, Timescale::Tdb);
        let b = Interval::new(5.0, Timescale::Tdb);
        assert_eq!((a + b).scale(), Timescale::Tdb);
        assert_relative_eq!((a - b).seconds(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validity() {
        assert!(!Interval::from_seconds(f64::INFINITY).is_valid());
        assert!(Interval::from_seconds(0.0).is_valid());
    }
}
