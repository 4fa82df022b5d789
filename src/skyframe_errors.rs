use thiserror::Error;

use crate::equinox::ReferenceSystem;
use crate::time::Timescale;

/// Error taxonomy of the crate.
///
/// Only two of the four failure families of the library surface here: unsupported
/// operations and parse failures. Construction from out-of-range input and numerical
/// provider failures are reported as *values* whose `is_valid()` is `false`, with a
/// `log::debug!` trace emitted at the point of failure.
#[derive(Error, Debug, Clone)]
pub enum SkyframeError {
    #[error("Timescale {0} is not supported for this operation")]
    UnsupportedTimescale(Timescale),

    #[error("Reference system {0:?} is not supported for this operation")]
    UnsupportedReferenceSystem(ReferenceSystem),

    #[error("Operation requires a geodetic (Earth-based) observer")]
    ObserverNotGeodetic,

    #[error("Earth orientation parameters required but not available")]
    MissingEarthOrientation,

    #[error("Invalid timescale name: {0}")]
    InvalidTimescaleName(String),

    #[error("Numerical provider failure: {0}")]
    ProviderFailure(String),

    #[error("Iteration failed to converge: {0}")]
    NoConvergence(&'static str),
}

impl PartialEq for SkyframeError {
    fn eq(&self, other: &Self) -> bool {
        use SkyframeError::*;
        match (self, other) {
            (UnsupportedTimescale(a), UnsupportedTimescale(b)) => a == b,
            (UnsupportedReferenceSystem(a), UnsupportedReferenceSystem(b)) => a == b,
            (ObserverNotGeodetic, ObserverNotGeodetic) => true,
            (MissingEarthOrientation, MissingEarthOrientation) => true,
            (InvalidTimescaleName(a), InvalidTimescaleName(b)) => a == b,
            (ProviderFailure(a), ProviderFailure(b)) => a == b,
            (NoConvergence(a), NoConvergence(b)) => a == b,
            _ => false,
        }
    }
}
