//! # Scalar quantities
//!
//! Unit-carrying scalar types: angles, distances, time intervals, speeds and
//! atmospheric conditions. All of them store a canonical SI value internally and
//! follow the crate-wide validity convention: constructors never fail, and a value
//! built from out-of-range or non-finite input reports `is_valid() == false` while
//! NaN propagates through arithmetic.

pub mod angle;
pub mod distance;
pub mod interval;
pub mod speed;
pub mod weather;

pub use angle::{Angle, Separator, TimeAngle};
pub use distance::Distance;
pub use interval::Interval;
pub use speed::Speed;
pub use weather::{Pressure, Temperature, Weather};
