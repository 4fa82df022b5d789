//! # Orientation kernels
//!
//! The rotation machinery behind every coordinate-system conversion in the crate:
//!
//! - IAU 1976 precession and mean obliquity
//! - IAU 1980 nutation (leading terms of the series, consistent to a few mas)
//! - Earth rotation angle, GMST and apparent sidereal time
//! - the fixed ICRS frame bias and ICRS ↔ galactic rotations
//! - [`rotation_between`], which chains the kernels through the J2000 mean frame to
//!   connect any two equinox-bearing systems
//!
//! All matrices are orthonormal, so the inverse of any step is its transpose.
//! Functions take TT Julian Dates except where a UT1 date is explicitly named.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{ArcSec, Radian, DPI, JD_J2000, JD_MJD0, RADEG, RADMAS, RADSEC, JD};
use crate::equinox::{Equinox, ReferenceSystem};

/// Compute the mean obliquity of the ecliptic (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `jd_tt`: Julian Date (TT scale).
///
/// Return
/// ------
/// * Mean obliquity of the ecliptic in radians.
pub fn obleq(jd_tt: JD) -> Radian {
    // Obliquity polynomial coefficients, arcseconds
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (jd_tt - JD_J2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Construct a right-handed rotation matrix around one of the principal axes.
///
/// `alpha` is the rotation angle in radians (positive = trigonometric sense) and
/// `k` selects the axis: 0 → X, 1 → Y, 2 → Z. The result is an active rotation,
/// `x' = R · x`, orthonormal by construction.
///
/// Panics when `k > 2`; the axis index is always a literal at call sites.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0,1,2)"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Precession matrix from the J2000 mean frame to the mean equator and equinox of
/// date (IAU 1976 model).
///
/// Returns `P` such that `x_mean(jd) = P · x_J2000`.
pub fn prec(jd_tt: JD) -> Matrix3<f64> {
    // Linear coefficients of the precession angles, degrees per century
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = (jd_tt - JD_J2000) / 36525.0;

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    let r1 = rotmt(-zeta, 2);
    let r2 = rotmt(theta, 1);
    let r3 = rotmt(-z, 2);

    (r1 * r2) * r3
}

/// Leading terms of the IAU 1980 nutation series.
///
/// Columns: multiples of (D, M, M', F, Ω), then the longitude coefficient and its
/// per-century rate, then the obliquity coefficient and its rate, all in units of
/// 0.0001 arcsec. The retained terms reproduce the full series to a few mas, which
/// matches the accuracy of the rest of the orientation model.
#[rustfmt::skip]
const NUT80_TERMS: [(i8, i8, i8, i8, i8, f64, f64, f64, f64); 20] = [
    ( 0,  0,  0,  0,  1, -171996.0, -174.2,  92025.0,   8.9),
    (-2,  0,  0,  2,  2,  -13187.0,   -1.6,   5736.0,  -3.1),
    ( 0,  0,  0,  2,  2,   -2274.0,   -0.2,    977.0,  -0.5),
    ( 0,  0,  0,  0,  2,    2062.0,    0.2,   -895.0,   0.5),
    ( 0,  1,  0,  0,  0,    1426.0,   -3.4,     54.0,  -0.1),
    ( 0,  0,  1,  0,  0,     712.0,    0.1,     -7.0,   0.0),
    (-2,  1,  0,  2,  2,    -517.0,    1.2,    224.0,  -0.6),
    ( 0,  0,  0,  2,  1,    -386.0,   -0.4,    200.0,   0.0),
    ( 0,  0,  1,  2,  2,    -301.0,    0.0,    129.0,  -0.1),
    (-2, -1,  0,  2,  2,     217.0,   -0.5,    -95.0,   0.3),
    (-2,  0,  1,  0,  0,    -158.0,    0.0,      0.0,   0.0),
    (-2,  0,  0,  2,  1,     129.0,    0.1,    -70.0,   0.0),
    ( 0,  0, -1,  2,  2,     123.0,    0.0,    -53.0,   0.0),
    ( 2,  0,  0,  0,  0,      63.0,    0.0,      0.0,   0.0),
    ( 0,  0,  1,  0,  1,      63.0,    0.1,    -33.0,   0.0),
    ( 2,  0, -1,  2,  2,     -59.0,    0.0,     26.0,   0.0),
    ( 0,  0, -1,  0,  1,     -58.0,   -0.1,     32.0,   0.0),
    ( 0,  0,  1,  2,  1,     -51.0,    0.0,     27.0,   0.0),
    (-2,  0,  2,  0,  0,      48.0,    0.0,      0.0,   0.0),
    ( 0,  0, -2,  2,  1,      46.0,    0.0,    -24.0,   0.0),
];

/// Compute the nutation angles in longitude and obliquity (IAU 1980 model,
/// truncated series).
///
/// Arguments
/// ---------
/// * `jd_tt`: Julian Date (TT scale).
///
/// Return
/// ------
/// * `(Δψ, Δε)` in arcseconds.
pub fn nutn80(jd_tt: JD) -> (ArcSec, ArcSec) {
    let t = (jd_tt - JD_J2000) / 36525.0;
    let t2 = t * t;
    let t3 = t2 * t;

    // Fundamental lunisolar arguments, degrees
    let d = 297.85036 + 445_267.111480 * t - 0.0019142 * t2 + t3 / 189_474.0;
    let m = 357.52772 + 35_999.050340 * t - 0.0001603 * t2 - t3 / 300_000.0;
    let mp = 134.96298 + 477_198.867398 * t + 0.0086972 * t2 + t3 / 56_250.0;
    let f = 93.27191 + 483_202.017538 * t - 0.0036825 * t2 + t3 / 327_270.0;
    let om = 125.04452 - 1_934.136261 * t + 0.0020708 * t2 + t3 / 450_000.0;

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for &(kd, km, kmp, kf, kom, psi, psi_t, eps, eps_t) in &NUT80_TERMS {
        let arg = (kd as f64 * d + km as f64 * m + kmp as f64 * mp + kf as f64 * f
            + kom as f64 * om)
            * RADEG;
        dpsi += (psi + psi_t * t) * arg.sin();
        deps += (eps + eps_t * t) * arg.cos();
    }

    // From 0.0001 arcsec to arcsec
    (dpsi * 1e-4, deps * 1e-4)
}

/// Nutation rotation from the mean to the true equator and equinox of date
/// (IAU 1980). Returns `N` such that `x_true = N · x_mean`.
pub fn rnut80(jd_tt: JD) -> Matrix3<f64> {
    let epsm = obleq(jd_tt);
    let (dpsi, deps) = nutn80(jd_tt);

    let dpsi = dpsi * RADSEC;
    let epst = epsm + deps * RADSEC;

    // Rotate to the ecliptic by ε, shift by −Δψ along it, rotate back by the
    // true obliquity.
    let r1 = rotmt(epsm, 0);
    let r2 = rotmt(-dpsi, 2);
    let r3 = rotmt(-epst, 0);

    (r1 * r2) * r3
}

/// The equation of the equinoxes: the angle between the true and mean equinox of
/// date along the equator, in radians.
pub fn equequ(jd_tt: JD) -> Radian {
    let (dpsi, deps) = nutn80(jd_tt);
    let epst = obleq(jd_tt) + deps * RADSEC;
    dpsi * RADSEC * epst.cos()
}

/// Greenwich Mean Sidereal Time (IAU 1982 model).
///
/// Arguments
/// ---------
/// * `jd_ut1`: Julian Date (UT1 scale).
///
/// Return
/// ------
/// * GMST as an angle in radians, in [0, 2π).
pub fn gmst(jd_ut1: JD) -> Radian {
    // GMST at 0h UT1, polynomial coefficients in seconds of time
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of the sidereal to the solar day
    const RAP: f64 = 1.00273790934;

    let tjm = jd_ut1 - JD_MJD0;
    let itjm = tjm.floor();
    let t = (itjm - (JD_J2000 - JD_MJD0)) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    let h = tjm.fract() * DPI;
    let mut gmst = gmst0 + h * RAP;

    let mut i: i64 = (gmst / DPI).floor() as i64;
    if gmst < 0.0 {
        i -= 1;
    }
    gmst -= i as f64 * DPI;

    gmst
}

/// Earth Rotation Angle (IAU 2000 definition).
///
/// Arguments
/// ---------
/// * `jd_ut1`: Julian Date (UT1 scale).
///
/// Return
/// ------
/// * ERA in radians, in [0, 2π).
pub fn era(jd_ut1: JD) -> Radian {
    let t = jd_ut1 - JD_J2000;
    let turns = 0.779_057_273_264_0 + 1.002_737_811_911_354_48 * t;
    let mut angle = (turns - turns.floor()) * DPI;
    if angle < 0.0 {
        angle += DPI;
    }
    angle
}

/// Greenwich Apparent Sidereal Time: GMST corrected by the equation of the
/// equinoxes.
pub fn gast(jd_ut1: JD, jd_tt: JD) -> Radian {
    let mut g = gmst(jd_ut1) + equequ(jd_tt);
    if g >= DPI {
        g -= DPI;
    } else if g < 0.0 {
        g += DPI;
    }
    g
}

/// The equation of the origins: the angle from the Celestial Intermediate Origin
/// to the true equinox of date, ERA − GAST.
///
/// The difference is insensitive to the TT/UT1 distinction, so a single TT date
/// serves both terms.
pub fn equation_of_origins(jd_tt: JD) -> Radian {
    let mut eo = era(jd_tt) - gast(jd_tt, jd_tt);
    // Keep the small angle near zero rather than near 2π.
    if eo > std::f64::consts::PI {
        eo -= DPI;
    } else if eo < -std::f64::consts::PI {
        eo += DPI;
    }
    eo
}

/// The fixed frame-bias rotation between the ICRS axes and the J2000 mean dynamical
/// frame. Returns `B` such that `x_J2000 = B · x_ICRS`.
pub fn frame_bias() -> Matrix3<f64> {
    // ICRS pole and RA offsets, milliarcseconds
    let xi0 = -16.6170 * RADMAS;
    let eta0 = -6.8192 * RADMAS;
    let da0 = -14.6 * RADMAS;

    // First-order small-angle rotation; orthonormal to well below the model
    // accuracy.
    Matrix3::new(
        1.0, da0, -xi0, //
        -da0, 1.0, -eta0, //
        xi0, eta0, 1.0,
    )
}

/// The fixed rotation from ICRS equatorial to galactic coordinates. The rows are
/// the galactic axes expressed in ICRS, so `x_gal = G · x_icrs` and the inverse is
/// the transpose.
pub fn icrs_to_galactic() -> Matrix3<f64> {
    Matrix3::new(
        -0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2, //
        0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9, //
        -0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9,
    )
}

/// The rotation taking coordinates of this system to the J2000 mean frame,
/// `x_J2000 = M · x_sys`. Only equinox-bearing systems reach here.
fn to_j2000(eq: &Equinox) -> Matrix3<f64> {
    match eq.system() {
        ReferenceSystem::Gcrs | ReferenceSystem::Icrs => frame_bias(),
        ReferenceSystem::J2000 => Matrix3::identity(),
        ReferenceSystem::MeanOfDate => prec(eq.jd()).transpose(),
        ReferenceSystem::TrueOfDate => {
            prec(eq.jd()).transpose() * rnut80(eq.jd()).transpose()
        }
        ReferenceSystem::Cirs => {
            // CIRS differs from the true system of date by the equation of the
            // origins along the equator.
            let eo = equation_of_origins(eq.jd());
            prec(eq.jd()).transpose() * rnut80(eq.jd()).transpose() * rotmt(-eo, 2)
        }
        // Earth-fixed systems never carry a valid Equinox; treat as unreachable
        // input and poison the result.
        ReferenceSystem::Tirs | ReferenceSystem::Itrs => Matrix3::from_element(f64::NAN),
    }
}

/// Compute the rotation matrix between two equatorial reference systems.
///
/// The rotation is assembled by chaining precession, nutation and the fixed frame
/// rotations through the J2000 mean frame as the canonical intermediate, so any
/// pair of equinox-bearing systems is connected. An invalid input system poisons
/// the output with NaN.
///
/// Return
/// ------
/// * `R` such that `x₂ = R · x₁` for a vector `x₁` in `from` and `x₂` in `to`.
pub fn rotation_between(from: &Equinox, to: &Equinox) -> Matrix3<f64> {
    if !from.is_valid() || !to.is_valid() {
        log::debug!("rotation_between: invalid system ({from} -> {to})");
        return Matrix3::from_element(f64::NAN);
    }
    if from == to {
        return Matrix3::identity();
    }
    to_j2000(to).transpose() * to_j2000(from)
}

/// Earth-rotation matrix from CIRS to TIRS at the given UT1 date:
/// `x_TIRS = R · x_CIRS`.
pub fn tirs_from_cirs(jd_ut1: JD) -> Matrix3<f64> {
    rotmt(-era(jd_ut1), 2)
}

/// Polar-motion rotation from TIRS to ITRS for pole coordinates in arcseconds:
/// `x_ITRS = W · x_TIRS`.
pub fn polar_motion(xp: ArcSec, yp: ArcSec) -> Matrix3<f64> {
    rotmt(-yp * RADSEC, 0) * rotmt(-xp * RADSEC, 1)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_orthonormal(r: &Matrix3<f64>, tol: f64) {
        let prod = r * r.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(prod[(i, j)], expected, epsilon = tol);
            }
        }
    }

    #[test]
    fn test_obliquity_at_j2000() {
        assert_abs_diff_eq!(obleq(JD_J2000), 0.409_092_804_222_329, epsilon = 1e-15);
    }

    #[test]
    fn test_nutn80_at_j2000() {
        let (dpsi, deps) = nutn80(JD_J2000);
        // Truncated series: a few mas from the full model values of
        // (-13.923, -5.774) arcsec.
        assert_abs_diff_eq!(dpsi, -13.923, epsilon = 0.05);
        assert_abs_diff_eq!(deps, -5.774, epsilon = 0.05);
    }

    #[test]
    fn test_matrices_orthonormal() {
        let jd = 2_460_000.5;
        assert_orthonormal(&prec(jd), 1e-12);
        assert_orthonormal(&rnut80(jd), 1e-12);
        assert_orthonormal(&frame_bias(), 1e-8);
        assert_orthonormal(&icrs_to_galactic(), 1e-9);
        assert_orthonormal(&tirs_from_cirs(jd), 1e-12);
        assert_orthonormal(&polar_motion(0.2, 0.3), 1e-12);
    }

    #[test]
    fn test_prec_identity_at_j2000() {
        let p = prec(JD_J2000);
        assert_abs_diff_eq!(p[(0, 0)], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p[(0, 1)], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rotation_between_identity() {
        let r = rotation_between(Equinox::icrs(), Equinox::icrs());
        assert_eq!(r, Matrix3::identity());
    }

    #[test]
    fn test_rotation_between_round_trip() {
        let tod = Equinox::true_of_date(2_460_000.5);
        let pairs = [
            (Equinox::icrs().clone(), Equinox::j2000().clone()),
            (Equinox::j2000().clone(), Equinox::mean_of_date(2_460_000.5)),
            (tod.clone(), Equinox::cirs(2_460_000.5)),
            (Equinox::icrs().clone(), tod),
        ];
        for (a, b) in &pairs {
            let prod = rotation_between(b, a) * rotation_between(a, b);
            for i in 0..3 {
                for j in 0..3 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(prod[(i, j)], expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_rotation_between_invalid_poisons() {
        let r = rotation_between(Equinox::invalid(), Equinox::icrs());
        assert!(r[(0, 0)].is_nan());
    }

    #[test]
    fn test_era_and_gst_agree_roughly() {
        // The equation of the origins is below a hundredth of a radian for
        // decades around J2000.
        let jd = 2_460_000.5;
        let eo = equation_of_origins(jd);
        assert!(eo.abs() < 0.01, "eo = {eo}");
    }

    #[test]
    fn test_era_range() {
        for jd in [2_451_545.0, 2_455_000.25, 2_460_000.75] {
            let a = era(jd);
            assert!((0.0..DPI).contains(&a));
        }
    }

    #[test]
    fn test_galactic_pole() {
        // The ICRS north galactic pole maps to +z in galactic coordinates.
        let ngp_ra = 192.859_48 * RADEG;
        let ngp_dec = 27.128_25 * RADEG;
        let icrs = Vector3::new(
            ngp_dec.cos() * ngp_ra.cos(),
            ngp_dec.cos() * ngp_ra.sin(),
            ngp_dec.sin(),
        );
        let gal = icrs_to_galactic() * icrs;
        assert_abs_diff_eq!(gal.z, 1.0, epsilon = 1e-6);
    }
}
