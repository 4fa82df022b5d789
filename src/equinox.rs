//! # Equatorial reference systems
//!
//! An [`Equinox`] identifies the equatorial coordinate system a position is expressed
//! in: the kind of system (ICRS family, mean or true equator of date, CIRS, …) together
//! with the TT Julian Date of its equator/equinox. Two positions are directly
//! comparable only when their `Equinox` values are equal; everything else goes through
//! a rotation (see [`crate::ref_system`]).
//!
//! ## Naming
//!
//! Every equinox carries a display name. Catalog systems keep their conventional names
//! (`"ICRS"`, `"FK4"`, `"HIP"`); systems built from a date derive a name from the epoch
//! year with trailing zeros trimmed (`"J1991.25"`, `"TOD J2025.3"`, `"B1950"`).
//!
//! ## Canonical singletons
//!
//! The common systems (`icrs()`, `j2000()`, `hip()`, `b1950()`, `b1900()`) are
//! process-wide statics, so equality against them is cheap and allocation-free.

use std::fmt;
use std::sync::LazyLock;

use crate::constants::{
    BESSELIAN_YEAR_DAYS, JD_B1950, JD_HIP, JD_J2000, JD_MJD0, JULIAN_YEAR_DAYS, JD, MJD,
};

/// The kind of celestial reference system an [`Equinox`] designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSystem {
    /// Geocentric Celestial Reference System (ICRS axes at the geocenter).
    Gcrs,
    /// International Celestial Reference System.
    Icrs,
    /// Mean equator and equinox of J2000.0.
    J2000,
    /// Mean equator and equinox of date (precession only).
    MeanOfDate,
    /// True equator and equinox of date (precession and nutation).
    TrueOfDate,
    /// Celestial Intermediate Reference System (true equator, CIO origin).
    Cirs,
    /// Terrestrial Intermediate Reference System (Earth-rotating, no polar motion).
    Tirs,
    /// International Terrestrial Reference System (Earth-fixed).
    Itrs,
}

impl ReferenceSystem {
    /// Whether coordinates in this system are tied to an equinox (or CIO) on the
    /// celestial sphere. The Earth-fixed systems are not.
    pub fn is_celestial(&self) -> bool {
        !matches!(self, ReferenceSystem::Tirs | ReferenceSystem::Itrs)
    }
}

static ICRS: LazyLock<Equinox> = LazyLock::new(|| Equinox {
    name: "ICRS".into(),
    system: ReferenceSystem::Icrs,
    jd_tt: JD_J2000,
    valid: true,
});

static GCRS: LazyLock<Equinox> = LazyLock::new(|| Equinox {
    name: "GCRS".into(),
    system: ReferenceSystem::Gcrs,
    jd_tt: JD_J2000,
    valid: true,
});

static J2000: LazyLock<Equinox> = LazyLock::new(|| Equinox {
    name: "J2000".into(),
    system: ReferenceSystem::J2000,
    jd_tt: JD_J2000,
    valid: true,
});

static HIP: LazyLock<Equinox> = LazyLock::new(|| Equinox::mean_of_date(JD_HIP));

static B1950: LazyLock<Equinox> = LazyLock::new(|| Equinox::mod_at_besselian_epoch(1950.0));

static B1900: LazyLock<Equinox> = LazyLock::new(|| Equinox::mod_at_besselian_epoch(1900.0));

static INVALID: LazyLock<Equinox> = LazyLock::new(|| Equinox {
    name: "(invalid)".into(),
    system: ReferenceSystem::Icrs,
    jd_tt: f64::NAN,
    valid: false,
});

/// An equatorial coordinate system: a [`ReferenceSystem`] kind plus the TT Julian
/// Date of its equator and equinox.
#[derive(Debug, Clone)]
pub struct Equinox {
    name: String,
    system: ReferenceSystem,
    jd_tt: JD,
    valid: bool,
}

/// Render a fractional year with up to 6 decimals, trailing zeros trimmed, so that
/// `2000.0` prints as `"2000"` and `1991.25` as `"1991.25"`.
fn year_string(year: f64) -> String {
    let s = format!("{year:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl Equinox {
    /// The ICRS singleton.
    pub fn icrs() -> &'static Equinox {
        &ICRS
    }

    /// The GCRS singleton.
    pub fn gcrs() -> &'static Equinox {
        &GCRS
    }

    /// The mean equator and equinox of J2000.0.
    pub fn j2000() -> &'static Equinox {
        &J2000
    }

    /// The Hipparcos catalog system (mean of date at J1991.25).
    pub fn hip() -> &'static Equinox {
        &HIP
    }

    /// The B1950.0 mean system (FK4 catalogs).
    pub fn b1950() -> &'static Equinox {
        &B1950
    }

    /// The B1900.0 mean system.
    pub fn b1900() -> &'static Equinox {
        &B1900
    }

    /// The invalid placeholder system.
    pub fn invalid() -> &'static Equinox {
        &INVALID
    }

    /// Mean equator and equinox of the given TT Julian Date.
    pub fn mean_of_date(jd_tt: JD) -> Equinox {
        if !jd_tt.is_finite() {
            log::debug!("Equinox::mean_of_date: non-finite date {jd_tt}");
            return INVALID.clone();
        }
        let epoch = 2000.0 + (jd_tt - JD_J2000) / JULIAN_YEAR_DAYS;
        Equinox {
            name: format!("J{}", year_string(epoch)),
            system: ReferenceSystem::MeanOfDate,
            jd_tt,
            valid: true,
        }
    }

    /// Mean equator and equinox at a Besselian (tropical-year) epoch, e.g. 1950.0.
    /// The derived name uses the `B` prefix.
    pub fn mod_at_besselian_epoch(year: f64) -> Equinox {
        if !year.is_finite() {
            log::debug!("Equinox::mod_at_besselian_epoch: non-finite year {year}");
            return INVALID.clone();
        }
        let jd_tt = JD_B1950 + (year - 1950.0) * BESSELIAN_YEAR_DAYS;
        Equinox {
            name: format!("B{}", year_string(year)),
            system: ReferenceSystem::MeanOfDate,
            jd_tt,
            valid: true,
        }
    }

    /// True equator and equinox of the given TT Julian Date.
    pub fn true_of_date(jd_tt: JD) -> Equinox {
        if !jd_tt.is_finite() {
            log::debug!("Equinox::true_of_date: non-finite date {jd_tt}");
            return INVALID.clone();
        }
        let epoch = 2000.0 + (jd_tt - JD_J2000) / JULIAN_YEAR_DAYS;
        Equinox {
            name: format!("TOD J{}", year_string(epoch)),
            system: ReferenceSystem::TrueOfDate,
            jd_tt,
            valid: true,
        }
    }

    /// Celestial Intermediate Reference System at the given TT Julian Date.
    pub fn cirs(jd_tt: JD) -> Equinox {
        if !jd_tt.is_finite() {
            log::debug!("Equinox::cirs: non-finite date {jd_tt}");
            return INVALID.clone();
        }
        let epoch = 2000.0 + (jd_tt - JD_J2000) / JULIAN_YEAR_DAYS;
        Equinox {
            name: format!("CIRS J{}", year_string(epoch)),
            system: ReferenceSystem::Cirs,
            jd_tt,
            valid: true,
        }
    }

    /// Build the equinox for a [`ReferenceSystem`] kind at a TT Julian Date.
    ///
    /// The ICRS-family kinds (GCRS, ICRS, J2000) ignore the supplied date and pin to
    /// J2000.0. The Earth-fixed kinds (TIRS, ITRS) carry no equinox and yield the
    /// invalid placeholder, as does a non-finite date.
    pub fn for_reference_system(system: ReferenceSystem, jd_tt: JD) -> Equinox {
        match system {
            ReferenceSystem::Gcrs => GCRS.clone(),
            ReferenceSystem::Icrs => ICRS.clone(),
            ReferenceSystem::J2000 => J2000.clone(),
            ReferenceSystem::MeanOfDate => Equinox::mean_of_date(jd_tt),
            ReferenceSystem::TrueOfDate => Equinox::true_of_date(jd_tt),
            ReferenceSystem::Cirs => Equinox::cirs(jd_tt),
            ReferenceSystem::Tirs | ReferenceSystem::Itrs => {
                log::debug!("Equinox::for_reference_system: {system:?} carries no equinox");
                INVALID.clone()
            }
        }
    }

    /// Parse a catalog system designation.
    ///
    /// Recognized forms:
    /// - `"ICRS"`, or any name ending in `"CRS"` (GCRS, BCRS, …)
    /// - `"FK4"` (B1950), `"FK5"` / `"FK6"` (J2000), `"HIP"` (J1991.25)
    /// - `"TOD <epoch>"` and `"CIRS <epoch>"` with any epoch form below
    /// - `"J..."` / `"B..."` prefixed fractional years
    /// - a bare fractional year, read as Besselian before 1984.0 and Julian after
    pub fn from_string(text: &str) -> Option<Equinox> {
        let token = text.trim();
        let upper = token.to_ascii_uppercase();

        match upper.as_str() {
            "ICRS" => return Some(ICRS.clone()),
            "FK4" => return Some(B1950.clone()),
            "FK5" | "FK6" => {
                return Some(Equinox {
                    name: upper,
                    system: ReferenceSystem::J2000,
                    jd_tt: JD_J2000,
                    valid: true,
                })
            }
            "HIP" => return Some(HIP.clone()),
            _ => {}
        }

        if upper.ends_with("CRS") {
            return Some(Equinox {
                name: upper,
                system: ReferenceSystem::Gcrs,
                jd_tt: JD_J2000,
                valid: true,
            });
        }

        if let Some(rest) = upper.strip_prefix("TOD") {
            let jd = Self::parse_epoch_jd(rest.trim())?;
            return Some(Equinox::true_of_date(jd));
        }

        if let Some(rest) = upper.strip_prefix("CIRS") {
            let jd = Self::parse_epoch_jd(rest.trim())?;
            return Some(Equinox::cirs(jd));
        }

        let (year, besselian) = Self::parse_epoch(&upper)?;
        if besselian {
            return Some(Equinox::mod_at_besselian_epoch(year));
        }
        let jd = JD_J2000 + (year - 2000.0) * JULIAN_YEAR_DAYS;
        if jd == JD_J2000 {
            return Some(J2000.clone());
        }
        Some(Equinox::mean_of_date(jd))
    }

    /// Read an epoch token (`"J2000"`, `"B1950.5"`, `"2025.3"`) as a year plus its
    /// kind: `true` for Besselian. Bare years before 1984.0 are read as Besselian,
    /// per the FK4/FK5 convention.
    fn parse_epoch(token: &str) -> Option<(f64, bool)> {
        let (kind, digits) = match token.strip_prefix(['J', 'j']) {
            Some(rest) => ('J', rest),
            None => match token.strip_prefix(['B', 'b']) {
                Some(rest) => ('B', rest),
                None => ('?', token),
            },
        };
        let year: f64 = digits.trim().parse().ok()?;
        if !year.is_finite() {
            return None;
        }
        Some((year, kind == 'B' || (kind == '?' && year < 1984.0)))
    }

    /// Resolve an epoch token to a TT Julian Date.
    fn parse_epoch_jd(token: &str) -> Option<JD> {
        let (year, besselian) = Self::parse_epoch(token)?;
        Some(if besselian {
            JD_B1950 + (year - 1950.0) * BESSELIAN_YEAR_DAYS
        } else {
            JD_J2000 + (year - 2000.0) * JULIAN_YEAR_DAYS
        })
    }

    /// The display name of the system.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of reference system.
    pub fn system(&self) -> ReferenceSystem {
        self.system
    }

    /// TT Julian Date of the equator/equinox of this system.
    pub fn jd(&self) -> JD {
        self.jd_tt
    }

    /// TT Modified Julian Date of the equator/equinox.
    pub fn mjd(&self) -> MJD {
        self.jd_tt - JD_MJD0
    }

    /// The Julian epoch year of this system's date.
    pub fn epoch(&self) -> f64 {
        2000.0 + (self.jd_tt - JD_J2000) / JULIAN_YEAR_DAYS
    }

    /// The Besselian epoch year of this system's date.
    pub fn besselian_epoch(&self) -> f64 {
        1950.0 + (self.jd_tt - JD_B1950) / BESSELIAN_YEAR_DAYS
    }

    /// Whether this system belongs to the non-rotating ICRS family.
    pub fn is_icrs(&self) -> bool {
        matches!(self.system, ReferenceSystem::Gcrs | ReferenceSystem::Icrs)
    }

    /// Whether this is a mean-equinox system (precession only).
    pub fn is_mod(&self) -> bool {
        matches!(self.system, ReferenceSystem::J2000 | ReferenceSystem::MeanOfDate)
    }

    /// Whether this is a true-equator system (precession and nutation).
    pub fn is_true(&self) -> bool {
        matches!(self.system, ReferenceSystem::TrueOfDate | ReferenceSystem::Cirs)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl PartialEq for Equinox {
    /// Exact identity on kind, name and date. Two systems that differ in any of the
    /// three are distinct, and coordinates tagged with them require a transformation
    /// before comparison.
    fn eq(&self, other: &Self) -> bool {
        self.system == other.system
            && self.name == other.name
            && (self.jd_tt == other.jd_tt || (self.jd_tt.is_nan() && other.jd_tt.is_nan()))
            && self.valid == other.valid
    }
}

impl fmt::Display for Equinox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
