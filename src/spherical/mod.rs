//! # Spherical coordinate frames
//!
//! Sky positions expressed on the celestial sphere, one type per frame family:
//!
//! - [`Equatorial`]: right ascension and declination in some [`Equinox`];
//! - [`Ecliptic`]: ecliptic longitude and latitude, referred to the mean ecliptic
//!   of the same equinox family;
//! - [`Galactic`]: the fixed IAU 1958 galactic frame, tied to ICRS;
//! - [`Horizontal`]: azimuth and elevation at an observing site.
//!
//! Conversions preserve the distance and route through the equatorial frame:
//! ecliptic to galactic, for instance, is ecliptic → equatorial → galactic. An
//! invalid input system poisons the result with NaN rather than failing.

pub mod ecliptic;
pub mod equatorial;
pub mod galactic;
pub mod horizontal;

pub use ecliptic::Ecliptic;
pub use equatorial::Equatorial;
pub use galactic::Galactic;
pub use horizontal::Horizontal;

use crate::quantity::angle::Angle;

/// Great-circle separation between two directions given as (longitude, latitude)
/// pairs in radians. Uses the atan2 form, which stays accurate for both tiny and
/// near-antipodal separations.
pub(crate) fn separation(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Angle {
    let (s1, c1) = lat1.sin_cos();
    let (s2, c2) = lat2.sin_cos();
    let (sd, cd) = (lon2 - lon1).sin_cos();
    let cross = ((c2 * sd).powi(2) + (c1 * s2 - s1 * c2 * cd).powi(2)).sqrt();
    let dot = s1 * s2 + c1 * c2 * cd;
    Angle::new(cross.atan2(dot))
}

#[cfg(test)]
mod spherical_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_separation() {
        assert_abs_diff_eq!(
            separation(0.0, 0.0, 90.0 * RADEG, 0.0).deg(),
            90.0,
            epsilon = 1e-12
        );
        // Same longitude, pole to pole.
        assert_abs_diff_eq!(
            separation(1.0, 90.0 * RADEG, 1.0, -90.0 * RADEG).deg(),
            180.0,
            epsilon = 1e-12
        );
        // Tiny separations do not lose precision.
        let small = separation(0.0, 0.0, 1e-9, 0.0);
        assert_abs_diff_eq!(small.rad(), 1e-9, epsilon = 1e-15);
    }
}
