use std::sync::Arc;

use skyframe::constants::{AU, DPI, JD_J2000, KM, SECONDS_PER_DAY};
use skyframe::frame::{Accuracy, Frame};
use skyframe::observer::Observer;
use skyframe::provider::NumericalProvider;
use skyframe::skyframe_errors::SkyframeError;
use skyframe::source::Planet;
use skyframe::time::{Eop, Time, Timescale};
use skyframe::vectors::{Position, Velocity};

/// A deterministic analytic stand-in for a real ephemeris: the Sun sits at the
/// barycenter, the Earth rides a circular one-year orbit in the ICRS xy-plane,
/// and the Moon a circular one-month orbit around the Earth. Every other body is
/// a provider failure, which the tests use to exercise the invalid-product path.
pub struct CircularModel;

fn circular(radius: f64, period_days: f64, jd_tt: f64) -> (Position, Velocity) {
    let theta = DPI * (jd_tt - JD_J2000) / period_days;
    let omega = DPI / (period_days * SECONDS_PER_DAY);
    let (s, c) = theta.sin_cos();
    (
        Position::new(radius * c, radius * s, 0.0),
        Velocity::new(-radius * omega * s, radius * omega * c, 0.0),
    )
}

impl NumericalProvider for CircularModel {
    fn body_state(
        &self,
        body: Planet,
        time: &Time,
        _accuracy: Accuracy,
    ) -> Result<(Position, Velocity), SkyframeError> {
        let jd_tt = time.jd(Timescale::Tt);
        match body {
            Planet::Sun | Planet::Ssb => {
                Ok((Position::origin(), Velocity::stationary()))
            }
            Planet::Earth => Ok(circular(AU, 365.25, jd_tt)),
            Planet::Moon => {
                let (e_pos, e_vel) = circular(AU, 365.25, jd_tt);
                let (m_pos, m_vel) = circular(384_400.0 * KM, 27.321_661, jd_tt);
                Ok((e_pos + m_pos, e_vel + m_vel))
            }
            other => Err(SkyframeError::ProviderFailure(format!(
                "no model for {other}"
            ))),
        }
    }
}

pub fn provider() -> Arc<dyn NumericalProvider> {
    Arc::new(CircularModel)
}

pub fn epoch() -> Time {
    Time::from_jd(Timescale::Tt, JD_J2000 + 9_000.0, &Eop::default())
}

pub fn geocentric_frame() -> Frame {
    Frame::new(Observer::at_geocenter(), epoch(), Accuracy::Reduced, provider())
}
