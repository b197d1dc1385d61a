//! Battery aging: calendar and cyclic degradation driven by a half-cycle
//! detector.

pub mod calendar;
pub mod cycle_detector;
pub mod cyclic;
pub mod model;

pub use calendar::CalendarDegradation;
pub use cycle_detector::{HalfCycle, HalfCycleDetector};
pub use cyclic::CyclicDegradation;
pub use model::DegradationModel;

/// Incremental change of the state of health over one update.
///
/// `soh_q` is negative for capacity loss, `soh_r` positive for resistance
/// increase, both in p.u.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SohDelta {
    pub soh_q: f64,
    pub soh_r: f64,
}

impl SohDelta {
    pub const ZERO: Self = Self { soh_q: 0.0, soh_r: 0.0 };

    pub fn new(soh_q: f64, soh_r: f64) -> Self {
        Self { soh_q, soh_r }
    }
}
