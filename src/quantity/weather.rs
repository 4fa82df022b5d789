//! # Atmospheric conditions
//!
//! [`Temperature`], [`Pressure`] and the combined [`Weather`] record used by the
//! optical refraction model. When no measured conditions are available,
//! [`Weather::guess`] estimates average conditions from the site altitude using an
//! exponential pressure profile with a 9.1 km scale height.

use std::fmt;

use crate::constants::{ATM, BAR, HPA, TORR};
use crate::observer::Site;

/// Absolute zero in °C; temperatures below this are invalid.
const ABSOLUTE_ZERO_C: f64 = -273.15;

/// Approximate scale height of the atmosphere in meters.
const SCALE_HEIGHT: f64 = 9.1e3;

/// An air temperature, stored in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    celsius: f64,
}

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Temperature { celsius }
    }

    pub fn from_kelvin(kelvin: f64) -> Self {
        Temperature { celsius: kelvin + ABSOLUTE_ZERO_C }
    }

    pub fn from_fahrenheit(f: f64) -> Self {
        Temperature { celsius: (f - 32.0) / 1.8 }
    }

    pub fn celsius(&self) -> f64 {
        self.celsius
    }

    pub fn kelvin(&self) -> f64 {
        self.celsius - ABSOLUTE_ZERO_C
    }

    pub fn fahrenheit(&self) -> f64 {
        self.celsius * 1.8 + 32.0
    }

    /// Valid when finite and at or above absolute zero.
    pub fn is_valid(&self) -> bool {
        self.celsius.is_finite() && self.celsius >= ABSOLUTE_ZERO_C
    }

    pub fn is_equal(&self, other: &Temperature, precision: f64) -> bool {
        (self.celsius - other.celsius).abs() <= precision
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.celsius)
    }
}

/// An atmospheric pressure, stored in pascals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pressure {
    pa: f64,
}

impl Pressure {
    pub fn from_pa(pa: f64) -> Self {
        Pressure { pa }
    }

    /// From millibar (= hPa).
    pub fn from_mbar(mbar: f64) -> Self {
        Pressure { pa: mbar * HPA }
    }

    pub fn from_bar(bar: f64) -> Self {
        Pressure { pa: bar * BAR }
    }

    pub fn from_torr(torr: f64) -> Self {
        Pressure { pa: torr * TORR }
    }

    pub fn from_atm(atm: f64) -> Self {
        Pressure { pa: atm * ATM }
    }

    pub fn pa(&self) -> f64 {
        self.pa
    }

    pub fn mbar(&self) -> f64 {
        self.pa / HPA
    }

    pub fn bar(&self) -> f64 {
        self.pa / BAR
    }

    pub fn torr(&self) -> f64 {
        self.pa / TORR
    }

    pub fn atm(&self) -> f64 {
        self.pa / ATM
    }

    /// Valid when finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.pa.is_finite() && self.pa >= 0.0
    }

    pub fn is_equal(&self, other: &Pressure, precision: f64) -> bool {
        (self.pa - other.pa).abs() <= precision
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mbar", self.mbar())
    }
}

/// Local atmospheric conditions for refraction corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weather {
    temperature: Temperature,
    pressure: Pressure,
    humidity: f64,
}

impl Weather {
    /// New weather record. `humidity` is a relative humidity percentage in [0, 100];
    /// values outside that range make the record invalid.
    pub fn new(temperature: Temperature, pressure: Pressure, humidity: f64) -> Self {
        Weather { temperature, pressure, humidity }
    }

    /// Crude estimate of average conditions at a site: 10 °C, dry air, and
    /// pressure falling off exponentially with altitude.
    pub fn guess(site: &Site) -> Self {
        let h = site.altitude().m();
        Weather {
            temperature: Temperature::from_celsius(10.0),
            pressure: Pressure::from_mbar(1010.0 * (-h / SCALE_HEIGHT).exp()),
            humidity: 0.0,
        }
    }

    pub fn temperature(&self) -> &Temperature {
        &self.temperature
    }

    pub fn pressure(&self) -> &Pressure {
        &self.pressure
    }

    /// Relative humidity as a percentage.
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Relative humidity as a fraction in [0, 1].
    pub fn humidity_fraction(&self) -> f64 {
        0.01 * self.humidity
    }

    pub fn is_valid(&self) -> bool {
        self.temperature.is_valid()
            && self.pressure.is_valid()
            && self.humidity.is_finite()
            && (0.0..=100.0).contains(&self.humidity)
    }
}

#[cfg(test)]
mod weather_test {
    use super::*;
    use crate::quantity::angle::Angle;
    use approx::assert_relative_eq;

    #[test]
    fn test_temperature_scales() {
        let t = Temperature::from_celsius(20.0);
        assert_relative_eq!(t.kelvin(), 293.15, epsilon = 1e-12);
        assert_relative_eq!(t.fahrenheit(), 68.0, epsilon = 1e-12);
        assert!(!Temperature::from_kelvin(-1.0).is_valid());
    }

    #[test]
    fn test_pressure_units() {
        let p = Pressure::from_atm(1.0);
        assert_relative_eq!(p.mbar(), 1013.25, epsilon = 1e-9);
        assert_relative_eq!(p.torr(), 760.0, epsilon = 1e-3);
        assert!(!Pressure::from_pa(-5.0).is_valid());
    }

    #[test]
    fn test_humidity_range() {
        let t = Temperature::from_celsius(15.0);
        let p = Pressure::from_mbar(1000.0);
        assert!(Weather::new(t, p, 55.0).is_valid());
        assert!(!Weather::new(t, p, 101.0).is_valid());
        assert!(!Weather::new(t, p, -1.0).is_valid());
    }

    #[test]
    fn test_guess_falls_with_altitude() {
        let sea = Site::new(Angle::from_degrees(15.0), Angle::from_degrees(-42.0), 0.0);
        let high = Site::new(Angle::from_degrees(15.0), Angle::from_degrees(-42.0), 1500.0);
        let w0 = Weather::guess(&sea);
        let w1 = Weather::guess(&high);
        assert_relative_eq!(w0.pressure().mbar(), 1010.0, epsilon = 1e-9);
        assert_relative_eq!(
            w1.pressure().mbar(),
            1010.0 * (-1500.0f64 / 9.1e3).exp(),
            epsilon = 1e-9
        );
        assert_relative_eq!(w1.temperature().celsius(), 10.0, epsilon = 1e-12);
    }
}
