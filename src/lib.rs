pub mod constants;
pub mod equinox;
pub mod frame;
pub mod observer;
pub mod orbital;
pub mod provider;
pub mod quantity;
pub mod ref_system;
pub mod skyframe_errors;
pub mod source;
pub mod spherical;
pub mod time;
pub mod track;
pub mod vectors;

pub use crate::equinox::{Equinox, ReferenceSystem};
pub use crate::frame::{Accuracy, Frame, FrameState};
pub use crate::observer::{Observer, Site};
pub use crate::provider::{Crossing, NumericalProvider, Refraction, StandardRefraction};
pub use crate::skyframe_errors::SkyframeError;
pub use crate::source::{Apparent, CatalogEntry, Geometric, Planet, Source};
pub use crate::time::{Eop, Time, Timescale};
