use crate::battery::BatteryState;

use super::SohDelta;
use super::cycle_detector::HalfCycle;

/// Cyclic aging: degradation per completed half-cycle, depending on its
/// depth, C-rate and mean SOC.
pub trait CyclicDegradation {
    /// Computes the degradation increment for a completed half-cycle.
    fn update(&mut self, state: &BatteryState, half_cycle: &HalfCycle) -> SohDelta;
}

/// Cyclic model that never ages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCyclicDegradation;

impl CyclicDegradation for NoCyclicDegradation {
    fn update(&mut self, _state: &BatteryState, _half_cycle: &HalfCycle) -> SohDelta {
        SohDelta::ZERO
    }
}
