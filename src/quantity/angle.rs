//! # Angular quantities
//!
//! This module provides the two angle types of the crate:
//!
//! - [`Angle`]: a signed angle stored in radians, wrapped to the (−π, π] range. This is
//!   the natural representation for latitudes, declinations, elevations and offsets.
//! - [`TimeAngle`]: a positive angle stored in radians, wrapped to [0, 2π). This is the
//!   natural representation for right ascensions, hour angles and azimuths.
//!
//! Both types parse sexagesimal strings (DMS or HMS, with `:`, whitespace, letter or
//! symbol separators) and render themselves back with a configurable separator style
//! and decimal count.
//!
//! ## Validity
//!
//! Construction never fails. Non-finite input, or a string that does not parse, yields
//! a value whose `is_valid()` reports `false`; NaN then propagates through arithmetic
//! so that downstream results are invalid too.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{Degree, Radian, DPI, RADEG, RADH, RADMAS, RADSEC};

/// Separator style for sexagesimal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `12:34:56.7`
    Colon,
    /// `12 34 56.7`
    Space,
    /// `12d34m56.7s` (or `12h34m56.7s` for time angles)
    Letter,
    /// `12°34'56.7"`
    Symbol,
}

/// Wrap an angle in radians to the (−π, π] range. NaN passes through.
fn wrap_signed(rad: f64) -> f64 {
    let mut r = rad % DPI;
    if r > std::f64::consts::PI {
        r -= DPI;
    } else if r <= -std::f64::consts::PI {
        r += DPI;
    }
    r
}

/// Wrap an angle in radians to the [0, 2π) range. NaN passes through.
fn wrap_positive(rad: f64) -> f64 {
    let mut r = rad % DPI;
    if r < 0.0 {
        r += DPI;
    }
    r
}

static SEXAGESIMAL: LazyLock<Regex> = LazyLock::new(|| {
    // sign, first field, then up to two more fields with :, whitespace, letter or
    // symbol separators. A trailing s/" on the last field is tolerated.
    Regex::new(
        r#"(?x)^\s*
        ([+-]?)\s*
        (\d+(?:\.\d*)?)
        (?:(?:\s*[:dDhH°]\s*|\s+)
            (\d+(?:\.\d*)?)
            (?:(?:\s*[:mM']\s*|\s+)
                (\d+(?:\.\d*)?)\s*[sS"]?
            )?\s*[mM']?
        )?\s*$"#,
    )
    .expect("sexagesimal regex is well formed")
});

/// Parse a sexagesimal string into a decimal value in the leading unit
/// (degrees for DMS input, hours for HMS input). Returns `None` when the
/// string does not match.
pub(crate) fn parse_sexagesimal(text: &str) -> Option<f64> {
    let caps = SEXAGESIMAL.captures(text)?;
    let sign = if &caps[1] == "-" { -1.0 } else { 1.0 };
    let whole: f64 = caps[2].parse().ok()?;
    let minutes: f64 = caps.get(3).map_or(Ok(0.0), |m| m.as_str().parse()).ok()?;
    let seconds: f64 = caps.get(4).map_or(Ok(0.0), |m| m.as_str().parse()).ok()?;
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    Some(sign * (whole + minutes / 60.0 + seconds / 3600.0))
}

/// Render a decimal value as a sexagesimal string in the given style.
///
/// `unit_letters` selects the letter set for [`Separator::Letter`]
/// (`['d', 'm', 's']` or `['h', 'm', 's']`).
pub(crate) fn format_sexagesimal(
    value: f64,
    sep: Separator,
    decimals: usize,
    unit_letters: [char; 2],
) -> String {
    if !value.is_finite() {
        return "(invalid)".into();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let total = value.abs();

    // Round at the seconds level first so that carries propagate upward.
    let scale = 10f64.powi(decimals as i32);
    let mut seconds = (total * 3600.0 * scale).round() / scale;
    let mut whole = (seconds / 3600.0).floor();
    seconds -= whole * 3600.0;
    let mut minutes = (seconds / 60.0).floor();
    seconds -= minutes * 60.0;
    // Guard against 60.0 seconds after rounding of the division above.
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        whole += 1.0;
    }

    let (s1, s2, s3): (String, String, String) = match sep {
        Separator::Colon => (":".into(), ":".into(), "".into()),
        Separator::Space => (" ".into(), " ".into(), "".into()),
        Separator::Letter => (unit_letters[0].to_string(), unit_letters[1].to_string(), "s".into()),
        Separator::Symbol => ("°".into(), "'".into(), "\"".into()),
    };

    let sec_width = if decimals == 0 { 2 } else { decimals + 3 };
    format!(
        "{sign}{whole:02}{s1}{minutes:02}{s2}{seconds:0sec_width$.decimals$}{s3}",
        whole = whole as i64,
        minutes = minutes as i64,
    )
}

/// A signed angle in radians, wrapped to (−π, π].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    rad: Radian,
}

impl Angle {
    /// New angle from radians, wrapped to (−π, π].
    pub fn new(rad: Radian) -> Self {
        Angle { rad: wrap_signed(rad) }
    }

    /// New angle from decimal degrees.
    pub fn from_degrees(deg: Degree) -> Self {
        Angle::new(deg * RADEG)
    }

    /// New angle from arcseconds.
    pub fn from_arcsec(arcsec: f64) -> Self {
        Angle::new(arcsec * RADSEC)
    }

    /// New angle from milliarcseconds.
    pub fn from_mas(mas: f64) -> Self {
        Angle::new(mas * RADMAS)
    }

    /// Parse a DMS sexagesimal string, e.g. `"-30:15:00"`, `"12 30 45.5"`,
    /// `"12d30m45s"` or `"12°30'45\""`.
    ///
    /// A string that does not parse yields an invalid angle (NaN payload) and a
    /// debug-level log trace.
    pub fn from_dms(text: &str) -> Self {
        match parse_sexagesimal(text) {
            Some(deg) => Angle::from_degrees(deg),
            None => {
                log::debug!("Angle::from_dms: cannot parse {text:?}");
                Angle { rad: f64::NAN }
            }
        }
    }

    /// The wrapped value in radians, in (−π, π].
    pub fn rad(&self) -> Radian {
        self.rad
    }

    /// The value in decimal degrees.
    pub fn deg(&self) -> Degree {
        self.rad / RADEG
    }

    /// The value in arcseconds.
    pub fn arcsec(&self) -> f64 {
        self.rad / RADSEC
    }

    /// The value in milliarcseconds.
    pub fn mas(&self) -> f64 {
        self.rad / RADMAS
    }

    /// Sine of the angle.
    pub fn sin(&self) -> f64 {
        self.rad.sin()
    }

    /// Cosine of the angle.
    pub fn cos(&self) -> f64 {
        self.rad.cos()
    }

    /// `false` when the angle was built from non-finite input or an unparseable string.
    pub fn is_valid(&self) -> bool {
        self.rad.is_finite()
    }

    /// Compare against another angle within an explicit tolerance in radians.
    ///
    /// The comparison is done on the shortest arc between the two angles, so values
    /// on either side of the ±π wrap point compare equal.
    pub fn is_equal(&self, other: &Angle, precision: Radian) -> bool {
        wrap_signed(self.rad - other.rad).abs() <= precision
    }

    /// Sexagesimal DMS rendering with the requested separator style and decimals
    /// on the seconds field.
    pub fn to_dms_string(&self, sep: Separator, decimals: usize) -> String {
        format_sexagesimal(self.deg(), sep, decimals, ['d', 'm'])
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dms_string(Separator::Colon, 1))
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::new(self.rad + rhs.rad)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::new(self.rad - rhs.rad)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle::new(-self.rad)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f64) -> Angle {
        Angle::new(self.rad * rhs)
    }
}

/// A positive angle in radians, wrapped to [0, 2π). Used for right ascension,
/// hour angle and azimuth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAngle {
    rad: Radian,
}

impl TimeAngle {
    /// New time angle from radians, wrapped to [0, 2π).
    pub fn new(rad: Radian) -> Self {
        TimeAngle { rad: wrap_positive(rad) }
    }

    /// New time angle from decimal hours.
    pub fn from_hours(hours: f64) -> Self {
        TimeAngle::new(hours * RADH)
    }

    /// New time angle from decimal degrees.
    pub fn from_degrees(deg: Degree) -> Self {
        TimeAngle::new(deg * RADEG)
    }

    /// Parse an HMS sexagesimal string, e.g. `"12:00:00.00"` or `"12h30m45s"`,
    /// interpreting the leading field as **hours**.
    ///
    /// A string that does not parse yields an invalid angle (NaN payload).
    pub fn from_hms(text: &str) -> Self {
        match parse_sexagesimal(text) {
            Some(hours) => TimeAngle::from_hours(hours),
            None => {
                log::debug!("TimeAngle::from_hms: cannot parse {text:?}");
                TimeAngle { rad: f64::NAN }
            }
        }
    }

    /// The wrapped value in radians, in [0, 2π).
    pub fn rad(&self) -> Radian {
        self.rad
    }

    /// The value in decimal hours, in [0, 24).
    pub fn hours(&self) -> f64 {
        self.rad / RADH
    }

    /// The value in decimal degrees, in [0, 360).
    pub fn deg(&self) -> Degree {
        self.rad / RADEG
    }

    pub fn sin(&self) -> f64 {
        self.rad.sin()
    }

    pub fn cos(&self) -> f64 {
        self.rad.cos()
    }

    pub fn is_valid(&self) -> bool {
        self.rad.is_finite()
    }

    /// Compare within an explicit tolerance in radians, across the 0/2π wrap point.
    pub fn is_equal(&self, other: &TimeAngle, precision: Radian) -> bool {
        wrap_signed(self.rad - other.rad).abs() <= precision
    }

    /// Sexagesimal HMS rendering.
    pub fn to_hms_string(&self, sep: Separator, decimals: usize) -> String {
        format_sexagesimal(self.hours(), sep, decimals, ['h', 'm'])
    }
}

impl fmt::Display for TimeAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hms_string(Separator::Colon, 2))
    }
}

impl From<Angle> for TimeAngle {
    fn from(a: Angle) -> Self {
        TimeAngle::new(a.rad())
    }
}

impl From<TimeAngle> for Angle {
    fn from(t: TimeAngle) -> Self {
        Angle::new(t.rad())
    }
}

impl Add<Angle> for TimeAngle {
    type Output = TimeAngle;
    fn add(self, rhs: Angle) -> TimeAngle {
        TimeAngle::new(self.rad + rhs.rad())
    }
}

impl Sub for TimeAngle {
    type Output = Angle;
    fn sub(self, rhs: TimeAngle) -> Angle {
        Angle::new(self.rad - rhs.rad)
    }
}

#[cfg(test)]
mod angle_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrapping() {
        assert_relative_eq!(Angle::from_degrees(190.0).deg(), -170.0, epsilon = 1e-12);
        assert_relative_eq!(Angle::from_degrees(-190.0).deg(), 170.0, epsilon = 1e-12);
        // π maps to itself, -π maps to +π: range is (−π, π]
        assert_relative_eq!(Angle::from_degrees(180.0).deg(), 180.0, epsilon = 1e-12);
        assert_relative_eq!(Angle::from_degrees(-180.0).deg(), 180.0, epsilon = 1e-12);

        assert_relative_eq!(TimeAngle::from_hours(25.0).hours(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(TimeAngle::from_hours(-1.0).hours(), 23.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_colon_dms() {
        let a = Angle::from_dms("-30:00:00");
        assert!(a.is_valid());
        assert_relative_eq!(a.deg(), -30.0, epsilon = 1e-12);

        let b = Angle::from_dms("12 30 45.5");
        assert_relative_eq!(b.deg(), 12.0 + 30.0 / 60.0 + 45.5 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_letter_and_symbol() {
        let a = Angle::from_dms("12d30m45s");
        assert_relative_eq!(a.deg(), 12.5125, epsilon = 1e-12);

        let b = Angle::from_dms("12°30'45\"");
        assert_relative_eq!(b.deg(), 12.5125, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_hms() {
        let ra = TimeAngle::from_hms("12:00:00.00");
        assert!(ra.is_valid());
        assert_relative_eq!(ra.hours(), 12.0, epsilon = 1e-12);
        assert_relative_eq!(ra.deg(), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_failures() {
        assert!(!Angle::from_dms("not an angle").is_valid());
        assert!(!Angle::from_dms("12:61:00").is_valid());
        assert!(!TimeAngle::from_hms("").is_valid());
    }

    #[test]
    fn test_format_round_trip() {
        let a = Angle::from_degrees(-30.254321);
        let s = a.to_dms_string(Separator::Colon, 2);
        let b = Angle::from_dms(&s);
        assert!(a.is_equal(&b, 0.005 * RADSEC));
    }

    #[test]
    fn test_format_carry() {
        // 59.9996" rounds up to the next minute at 3 decimals
        let a = Angle::from_degrees(0.0 + 59.0 / 60.0 + 59.99996 / 3600.0);
        assert_eq!(a.to_dms_string(Separator::Colon, 3), "01:00:00.000");
    }

    #[test]
    fn test_invalid_propagates() {
        let bad = Angle::new(f64::NAN);
        assert!(!bad.is_valid());
        assert!(!(bad + Angle::from_degrees(10.0)).is_valid());
    }

    #[test]
    fn test_is_equal_across_wrap() {
        let a = Angle::from_degrees(179.9999);
        let b = Angle::from_degrees(-179.9999);
        assert!(a.is_equal(&b, 1e-3 * RADEG));
    }
}
