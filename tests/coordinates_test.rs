mod common;

use approx::assert_relative_eq;
use skyframe::equinox::{Equinox, ReferenceSystem};
use skyframe::frame::{Accuracy, Frame};
use skyframe::observer::{Observer, Site};
use skyframe::skyframe_errors::SkyframeError;
use skyframe::source::{CatalogEntry, Source};
use skyframe::spherical::Equatorial;
use skyframe::time::Eop;

fn test_star() -> Source {
    Source::Catalog(CatalogEntry::from_strings(
        "test star",
        "12:00:00.00",
        "-30:00:00",
        Equinox::icrs(),
    ))
}

#[test]
fn test_sexagesimal_parsing() {
    let eq = Equatorial::from_string("12:00:00.00", "-30:00:00", Equinox::icrs());
    assert!(eq.is_valid());
    assert_relative_eq!(eq.ra().hours(), 12.0, epsilon = 1e-13);
    assert_relative_eq!(eq.dec().deg(), -30.0, epsilon = 1e-13);

    assert!(!Equatorial::from_string("not a coordinate", "-30:00:00", Equinox::icrs()).is_valid());
}

#[test]
fn test_celestial_round_trips() {
    let eq = Equatorial::from_string("06:45:08.92", "-16:42:58.0", Equinox::icrs());

    let back = eq.to_galactic().to_equatorial(Equinox::icrs());
    assert!(eq.ra().is_equal(&back.ra(), 1e-10));
    assert!(eq.dec().is_equal(&back.dec(), 1e-10));

    let tod = Equinox::true_of_date(common::epoch().jd(skyframe::Timescale::Tt));
    let back = eq.to_system(&tod).to_system(Equinox::icrs());
    assert!(eq.ra().is_equal(&back.ra(), 1e-12));
    assert!(eq.dec().is_equal(&back.dec(), 1e-12));

    let back = eq.to_ecliptic().to_equatorial();
    assert!(eq.ra().is_equal(&back.ra(), 1e-12));
    assert!(eq.dec().is_equal(&back.dec(), 1e-12));
}

#[test]
fn test_earth_fixed_needs_orientation_data() {
    let frame = common::geocentric_frame();
    let geometric = test_star().geometric(&frame, Equinox::icrs());
    assert!(geometric.is_valid());

    // A geocentric observer carries no EOP record, so ITRS needs an explicit one.
    assert_eq!(
        geometric.in_system(ReferenceSystem::Itrs, None).unwrap_err(),
        SkyframeError::MissingEarthOrientation
    );

    let eop = Eop::new(37, 0.1, 0.05, 0.3);
    let itrs = geometric.in_system(ReferenceSystem::Itrs, Some(&eop)).unwrap();
    assert!(itrs.is_valid());
    assert_eq!(itrs.system(), ReferenceSystem::Itrs);
    // Rotations preserve the range.
    assert_relative_eq!(
        itrs.position().distance().m(),
        geometric.position().distance().m(),
        max_relative = 1e-12
    );

    // And back, with the same record.
    let back = itrs.in_system(ReferenceSystem::Icrs, Some(&eop)).unwrap();
    assert!(back
        .position()
        .is_equal(geometric.position(), 1e-3 * geometric.position().distance().m()));
}

#[test]
fn test_geodetic_observer_provides_its_own_eop() {
    let eop = Eop::new(37, 0.0, 0.1, 0.2);
    let frame = Frame::new(
        Observer::on_earth(Site::from_gps(43.9, 5.7, 650.0), eop),
        common::epoch(),
        Accuracy::Reduced,
        common::provider(),
    );
    let geometric = test_star().geometric(&frame, Equinox::icrs());
    let itrs = geometric.in_system(ReferenceSystem::Itrs, None).unwrap();
    assert!(itrs.is_valid());
}

#[test]
fn test_identity_conversion_is_exact() {
    let frame = common::geocentric_frame();
    let geometric = test_star().geometric(&frame, Equinox::icrs());
    let same = geometric.in_system(ReferenceSystem::Icrs, None).unwrap();
    assert!(same.position().is_equal(geometric.position(), 0.0));
}
