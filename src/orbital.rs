//! # Keplerian orbital elements
//!
//! [`OrbitalSystem`] names the frame an element set is expressed in: a center body
//! and the orientation of the orbital reference plane relative to an equatorial
//! system. [`Orbital`] carries the elements themselves, built fluently: the base
//! constructor yields a valid circular orbit, and each subsequent call adds a
//! parameter and re-validates, so a half-built set degrades to invalid instead of
//! failing.
//!
//! Propagation to a position or velocity is delegated to a
//! [`NumericalProvider`](crate::provider::NumericalProvider); the default provider
//! implementation solves the Kepler equation for bound orbits.

use std::fmt;
use std::sync::LazyLock;

use crate::constants::DPI;
use crate::equinox::Equinox;
use crate::provider::NumericalProvider;
use crate::quantity::angle::Angle;
use crate::quantity::distance::Distance;
use crate::quantity::interval::Interval;
use crate::source::Planet;
use crate::ref_system::obleq;
use crate::time::Time;
use crate::vectors::{Position, Velocity};

/// The plane an element set's inclination and node are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePlane {
    /// The mean ecliptic of the equatorial system's epoch.
    Ecliptic,
    /// The equator of the equatorial system itself.
    Equatorial,
}

static HELIOCENTRIC: LazyLock<OrbitalSystem> = LazyLock::new(|| {
    OrbitalSystem::new(Planet::Sun, ReferencePlane::Ecliptic, Equinox::icrs())
});

/// The frame of a Keplerian element set: center body plus the orientation of the
/// reference plane against an equatorial system.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalSystem {
    center: Planet,
    plane: ReferencePlane,
    system: Equinox,
    /// Tilt of the reference plane from the system's equator.
    obliquity: Angle,
    /// Node of the reference plane on the system's equator.
    node: Angle,
}

impl OrbitalSystem {
    /// New orbital system with a standard reference plane. The ecliptic plane tilt
    /// is the mean obliquity at the equatorial system's own date.
    pub fn new(center: Planet, plane: ReferencePlane, system: &Equinox) -> Self {
        let obliquity = match plane {
            ReferencePlane::Ecliptic => Angle::new(obleq(system.jd())),
            ReferencePlane::Equatorial => Angle::new(0.0),
        };
        OrbitalSystem {
            center,
            plane,
            system: system.clone(),
            obliquity,
            node: Angle::new(0.0),
        }
    }

    /// New orbital system with an explicit plane orientation, for bodies whose
    /// elements are published against their own equator (planetary satellites).
    pub fn tilted(center: Planet, system: &Equinox, node: Angle, obliquity: Angle) -> Self {
        OrbitalSystem {
            center,
            plane: ReferencePlane::Equatorial,
            system: system.clone(),
            obliquity,
            node,
        }
    }

    /// The Sun-centered ecliptic ICRS system minor-planet elements are usually
    /// published in.
    pub fn heliocentric() -> &'static OrbitalSystem {
        &HELIOCENTRIC
    }

    pub fn center(&self) -> Planet {
        self.center
    }

    pub fn plane(&self) -> ReferencePlane {
        self.plane
    }

    pub fn system(&self) -> &Equinox {
        &self.system
    }

    pub fn obliquity(&self) -> Angle {
        self.obliquity
    }

    pub fn node(&self) -> Angle {
        self.node
    }

    pub fn is_valid(&self) -> bool {
        self.system.is_valid() && self.obliquity.is_valid() && self.node.is_valid()
    }
}

impl fmt::Display for OrbitalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plane = match self.plane {
            ReferencePlane::Ecliptic => "ecliptic",
            ReferencePlane::Equatorial => "equatorial",
        };
        write!(f, "{} {} ({})", self.center, plane, self.system.name())
    }
}

/// A Keplerian element set.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbital {
    system: OrbitalSystem,
    epoch: Time,
    a: Distance,
    m0: Angle,
    /// Mean motion in rad/s.
    n: f64,
    e: f64,
    /// Argument of periapsis at the epoch.
    periapsis: Angle,
    inclination: Angle,
    ascending_node: Angle,
    /// Apsis precession rate in rad/s.
    apsis_rate: f64,
    /// Node precession rate in rad/s.
    node_rate: f64,
    valid: bool,
}

impl Orbital {
    /// New circular orbit from the minimal element set: system, epoch, semi-major
    /// axis, mean anomaly at the epoch, and orbital period. The result is valid on
    /// its own; the fluent calls below refine it.
    pub fn new(
        system: &OrbitalSystem,
        epoch: &Time,
        a: Distance,
        m0: Angle,
        period: &Interval,
    ) -> Self {
        Orbital::with_mean_motion(system, epoch, a, m0, DPI / period.seconds())
    }

    /// Like [`Orbital::new`] but with the mean motion in rad/s instead of the
    /// period.
    pub fn with_mean_motion(
        system: &OrbitalSystem,
        epoch: &Time,
        a: Distance,
        m0: Angle,
        n: f64,
    ) -> Self {
        let mut orbit = Orbital {
            system: system.clone(),
            epoch: *epoch,
            a,
            m0,
            n,
            e: 0.0,
            periapsis: Angle::new(0.0),
            inclination: Angle::new(0.0),
            ascending_node: Angle::new(0.0),
            apsis_rate: 0.0,
            node_rate: 0.0,
            valid: false,
        };
        orbit.revalidate();
        orbit
    }

    fn revalidate(&mut self) {
        self.valid = self.system.is_valid()
            && self.epoch.is_valid()
            && self.a.is_valid()
            && self.a.m() > 0.0
            && self.n.is_finite()
            && self.n > 0.0
            && self.e.is_finite()
            && self.e >= 0.0
            && self.m0.is_valid()
            && self.periapsis.is_valid()
            && self.inclination.is_valid()
            && self.ascending_node.is_valid()
            && self.apsis_rate.is_finite()
            && self.node_rate.is_finite();
        if !self.valid {
            log::debug!("Orbital: element set is invalid: {self:?}");
        }
    }

    /// Set the eccentricity and the argument of periapsis. A negative or
    /// non-finite eccentricity flips validity off while keeping the value.
    pub fn eccentricity(mut self, e: f64, periapsis: Angle) -> Self {
        self.e = e;
        self.periapsis = periapsis;
        self.revalidate();
        self
    }

    /// Set the inclination and the longitude of the ascending node, measured in
    /// the system's reference plane.
    pub fn inclination(mut self, inclination: Angle, node: Angle) -> Self {
        self.inclination = inclination;
        self.ascending_node = node;
        self.revalidate();
        self
    }

    /// Set the apsis precession through its period (one full revolution of the
    /// periapsis).
    pub fn apsis_period(self, period: &Interval) -> Self {
        self.apsis_rate(DPI / period.seconds())
    }

    /// Set the apsis precession rate directly, in rad/s.
    pub fn apsis_rate(mut self, rate: f64) -> Self {
        self.apsis_rate = rate;
        self.revalidate();
        self
    }

    /// Set the nodal precession through its period.
    pub fn node_period(self, period: &Interval) -> Self {
        self.node_rate(DPI / period.seconds())
    }

    /// Set the nodal precession rate directly, in rad/s.
    pub fn node_rate(mut self, rate: f64) -> Self {
        self.node_rate = rate;
        self.revalidate();
        self
    }

    pub fn system(&self) -> &OrbitalSystem {
        &self.system
    }

    pub fn epoch(&self) -> &Time {
        &self.epoch
    }

    pub fn semi_major_axis(&self) -> Distance {
        self.a
    }

    /// Mean motion in rad/s.
    pub fn mean_motion(&self) -> f64 {
        self.n
    }

    /// The orbital period.
    pub fn period(&self) -> Interval {
        Interval::from_seconds(DPI / self.n)
    }

    pub fn ecc(&self) -> f64 {
        self.e
    }

    /// Mean anomaly at the given time, from the epoch value and the mean motion.
    pub fn mean_anomaly_at(&self, time: &Time) -> Angle {
        let dt = (*time - self.epoch).tt_seconds();
        Angle::new(self.m0.rad() + self.n * dt)
    }

    /// Argument of periapsis at the given time, including the apsis precession.
    pub fn periapsis_at(&self, time: &Time) -> Angle {
        let dt = (*time - self.epoch).tt_seconds();
        Angle::new(self.periapsis.rad() + self.apsis_rate * dt)
    }

    /// Longitude of the ascending node at the given time, including the nodal
    /// precession.
    pub fn node_at(&self, time: &Time) -> Angle {
        let dt = (*time - self.epoch).tt_seconds();
        Angle::new(self.ascending_node.rad() + self.node_rate * dt)
    }

    pub fn inclination_angle(&self) -> Angle {
        self.inclination
    }

    /// Position relative to the center body at the given time, in the system's
    /// equatorial frame. Invalid on propagation failure.
    pub fn position(&self, time: &Time, provider: &dyn NumericalProvider) -> Position {
        match provider.orbit_posvel(self, time) {
            Ok((pos, _)) => pos,
            Err(e) => {
                log::debug!("Orbital::position: propagation failure: {e}");
                Position::new(f64::NAN, f64::NAN, f64::NAN)
            }
        }
    }

    /// Velocity relative to the center body at the given time, in the system's
    /// equatorial frame. Invalid on propagation failure.
    pub fn velocity(&self, time: &Time, provider: &dyn NumericalProvider) -> Velocity {
        match provider.orbit_posvel(self, time) {
            Ok((_, vel)) => vel,
            Err(e) => {
                log::debug!("Orbital::velocity: propagation failure: {e}");
                Velocity::new(f64::NAN, f64::NAN, f64::NAN)
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for Orbital {
    /// A one-line element summary: semi-major axis, eccentricity, inclination,
    /// period and the orbital system.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a={:.6} au e={:.4} i={:.3} deg P={:.4} d, {}",
            self.a.au(),
            self.e,
            self.inclination.deg(),
            self.period().days(),
            self.system
        )
    }
}

#[cfg(test)]
mod orbital_test {
    use super::*;
    use crate::constants::AU;
    use crate::time::{Eop, Timescale};
    use approx::assert_relative_eq;

    fn epoch() -> Time {
        Time::from_jd(Timescale::Tt, 2_460_000.5, &Eop::default())
    }

    fn base() -> Orbital {
        Orbital::new(
            OrbitalSystem::heliocentric(),
            &epoch(),
            Distance::from_au(1.0),
            Angle::new(0.0),
            &Interval::from_days(365.25),
        )
    }

    #[test]
    fn test_circular_orbit_is_valid() {
        let orbit = base();
        assert!(orbit.is_valid());
        assert_relative_eq!(orbit.period().days(), 365.25, epsilon = 1e-9);
        assert_relative_eq!(orbit.semi_major_axis().m(), AU, epsilon = 1e-3);
    }

    #[test]
    fn test_builder_degradation() {
        let orbit = base().eccentricity(-0.1, Angle::new(0.0));
        assert!(!orbit.is_valid());
        assert_eq!(orbit.ecc(), -0.1);

        // Fixing the field restores validity.
        let fixed = orbit.eccentricity(0.1, Angle::new(0.0));
        assert!(fixed.is_valid());
    }

    #[test]
    fn test_period_mean_motion_reciprocity() {
        let orbit = base();
        assert_relative_eq!(
            orbit.mean_motion() * orbit.period().seconds(),
            DPI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mean_anomaly_advance() {
        let orbit = base();
        let later = epoch().shifted(&Interval::from_days(365.25 / 4.0));
        let m = orbit.mean_anomaly_at(&later);
        assert_relative_eq!(m.deg(), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_precession_rates() {
        let century = Interval::from_days(36_525.0);
        let orbit = base()
            .eccentricity(0.1, Angle::new(0.0))
            .apsis_period(&century)
            .node_period(&century);
        assert!(orbit.is_valid());
        let later = epoch().shifted(&Interval::from_days(36_525.0 / 2.0));
        assert_relative_eq!(orbit.periapsis_at(&later).deg().abs(), 180.0, epsilon = 1e-6);
        assert_relative_eq!(orbit.node_at(&later).deg().abs(), 180.0, epsilon = 1e-6);
    }

    #[test]
    fn test_display_summary() {
        let orbit = base().eccentricity(0.1, Angle::new(0.0));
        let s = format!("{orbit}");
        assert!(s.contains("a=1.000000 au"), "{s}");
        assert!(s.contains("e=0.1000"), "{s}");
        assert!(s.contains("Sun ecliptic (ICRS)"), "{s}");
    }

    #[test]
    fn test_invalid_epoch_invalidates() {
        let bad_epoch = Time::from_jd(Timescale::Tt, f64::NAN, &Eop::default());
        let orbit = Orbital::new(
            OrbitalSystem::heliocentric(),
            &bad_epoch,
            Distance::from_au(1.0),
            Angle::new(0.0),
            &Interval::from_days(365.25),
        );
        assert!(!orbit.is_valid());
    }
}
