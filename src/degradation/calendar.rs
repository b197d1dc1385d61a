use crate::battery::BatteryState;

use super::SohDelta;

/// Calendar aging: degradation over time, depending on temperature and SOC.
pub trait CalendarDegradation {
    /// Computes the degradation increment for a timestep of `dt` seconds.
    fn update(&mut self, state: &BatteryState, dt: f64) -> SohDelta;
}

/// Calendar model that never ages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendarDegradation;

impl CalendarDegradation for NoCalendarDegradation {
    fn update(&mut self, _state: &BatteryState, _dt: f64) -> SohDelta {
        SohDelta::ZERO
    }
}
