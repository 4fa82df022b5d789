//! # Constants and type definitions for skyframe
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `skyframe` library.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (speed of light, GRS80 figure of the Earth)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ meters, pressure units)
//! - Standard epochs as Julian Dates (J2000.0, B1950.0, B1900.0, the Hipparcos epoch)
//! - Relativistic rate constants for the TCB/TCG coordinate timescales
//! - Core type aliases used across the crate
//!
//! All quantity types store canonical SI values internally (meters, seconds, radians,
//! pascals); the factors below convert user-facing units to and from that canonical form.

// -------------------------------------------------------------------------------------------------
// Mathematical constants
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// π/2, the pole latitude in radians
pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Speed of light in m/s (exact, SI definition)
pub const VLIGHT: f64 = 299_792_458.0;

/// Rate constant relating TCB to TDB / TT (IAU 2006 resolution B3)
pub const L_B: f64 = 1.550_519_768e-8;

/// Rate constant relating TCG to TT (IAU 2000 resolution B1.9)
pub const L_G: f64 = 6.969_290_134e-10;

/// TT − TAI offset in seconds (definition of Terrestrial Time)
pub const TT_MINUS_TAI: f64 = 32.184;

/// Earth equatorial radius in meters (GRS80)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth flattening (GRS80)
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_222_101;

/// Earth polar radius in meters, derived from the GRS80 ellipsoid
pub const EARTH_MINOR_AXIS: f64 = EARTH_MAJOR_AXIS * (1.0 - EARTH_FLATTENING);

/// Mean solar irradiance at 1 AU in W/m² (total solar irradiance, IAU 2015 nominal)
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Nominal Earth rotation rate in rad/s (IERS conventions)
pub const EARTH_ANGVEL: f64 = 7.292_115_0e-5;

// -------------------------------------------------------------------------------------------------
// Length units (meters)
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in meters (IAU 2012 exact definition)
pub const AU: f64 = 1.495_978_707e11;

/// Kilometer in meters
pub const KM: f64 = 1000.0;

/// Parsec in meters (exact, from the IAU definition of the AU and arcsecond)
pub const PARSEC: f64 = AU * 648_000.0 / std::f64::consts::PI;

/// Light-year in meters (Julian year of light travel)
pub const LIGHT_YEAR: f64 = VLIGHT * JULIAN_YEAR;

/// Default distance assigned to sources with no parallax information: 1 Gpc,
/// far enough that annual parallax vanishes at any achievable precision.
pub const DEFAULT_DISTANCE: f64 = 1e9 * PARSEC;

// -------------------------------------------------------------------------------------------------
// Time units (seconds / days)
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian year
pub const JULIAN_YEAR_DAYS: f64 = 365.25;

/// Days in a Julian century
pub const JULIAN_CENTURY_DAYS: f64 = 36_525.0;

/// Seconds in a Julian year
pub const JULIAN_YEAR: f64 = JULIAN_YEAR_DAYS * SECONDS_PER_DAY;

/// Days in a Besselian (tropical) year, used by B-prefixed epochs
pub const BESSELIAN_YEAR_DAYS: f64 = 365.242_198_781;

// -------------------------------------------------------------------------------------------------
// Angle conversions (to radians)
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcminutes → radians
pub const RADMIN: f64 = RADEG / 60.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648_000.0;

/// Milliarcseconds → radians
pub const RADMAS: f64 = RADSEC / 1000.0;

/// Microarcseconds → radians
pub const RADUAS: f64 = RADMAS / 1000.0;

/// Hours of right ascension → radians
pub const RADH: f64 = DPI / 24.0;

// -------------------------------------------------------------------------------------------------
// Pressure units (pascals)
// -------------------------------------------------------------------------------------------------

/// Hectopascal (= millibar) in Pa
pub const HPA: f64 = 100.0;

/// Bar in Pa
pub const BAR: f64 = 100_000.0;

/// Torr (mmHg) in Pa
pub const TORR: f64 = 133.322_387_415;

/// Standard atmosphere in Pa
pub const ATM: f64 = 101_325.0;

// -------------------------------------------------------------------------------------------------
// Standard epochs (Julian Dates, TT unless noted)
// -------------------------------------------------------------------------------------------------

/// JD of the J2000.0 epoch (2000-01-01 12:00:00 TT)
pub const JD_J2000: f64 = 2_451_545.0;

/// MJD of the J2000.0 epoch
pub const T2000: f64 = 51_544.5;

/// Conversion offset between Julian Date and Modified Julian Date
pub const JD_MJD0: f64 = 2_400_000.5;

/// JD of the B1950.0 Besselian epoch
pub const JD_B1950: f64 = 2_433_282.423_459_05;

/// JD of the B1900.0 Besselian epoch
pub const JD_B1900: f64 = 2_415_020.313_52;

/// JD of the Hipparcos catalog epoch (J1991.25)
pub const JD_HIP: f64 = 2_448_349.0625;

/// JD (TT) of 1977-01-01T00:00:00 TAI, the shared origin of TT, TCG and TCB
/// (the TAI reading of the same instant is 2_443_144.5)
pub const JD_TAI77: f64 = 2_443_144.500_372_5;

/// JD of the Gregorian calendar reform (1582-10-15 Gregorian = 1582-10-05 Julian)
pub const JD_GREGORIAN_REFORM: f64 = 2_299_160.5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_derived_lengths() {
        assert!((PARSEC / AU - 206_264.806_247_096_36).abs() < 1e-6);
        assert!((LIGHT_YEAR - 9.460_730_472_580_8e15).abs() < 1e3);
    }

    #[test]
    fn test_epoch_offsets() {
        assert_eq!(JD_J2000 - JD_MJD0, T2000);
    }

    #[test]
    fn test_earth_minor_axis() {
        assert!((EARTH_MINOR_AXIS - 6_356_752.314).abs() < 1e-2);
    }
}
