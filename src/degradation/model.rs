use tracing::trace;

use crate::battery::BatteryState;

use super::calendar::{CalendarDegradation, NoCalendarDegradation};
use super::cycle_detector::HalfCycleDetector;
use super::cyclic::{CyclicDegradation, NoCyclicDegradation};

/// Combines calendar and cyclic aging with a half-cycle detector.
///
/// Calendar aging applies on every update; cyclic aging applies whenever
/// the detector reports a completed half-cycle.
pub struct DegradationModel {
    calendar: Box<dyn CalendarDegradation>,
    cyclic: Box<dyn CyclicDegradation>,
    cycle_detector: HalfCycleDetector,
}

impl DegradationModel {
    pub fn new(
        calendar: Box<dyn CalendarDegradation>,
        cyclic: Box<dyn CyclicDegradation>,
        initial_soc: f64,
    ) -> Self {
        Self {
            calendar,
            cyclic,
            cycle_detector: HalfCycleDetector::new(initial_soc),
        }
    }

    /// Model with calendar aging only.
    pub fn calendar_only(calendar: Box<dyn CalendarDegradation>, initial_soc: f64) -> Self {
        Self::new(calendar, Box::new(NoCyclicDegradation), initial_soc)
    }

    /// Model with cyclic aging only.
    pub fn cyclic_only(cyclic: Box<dyn CyclicDegradation>, initial_soc: f64) -> Self {
        Self::new(Box::new(NoCalendarDegradation), cyclic, initial_soc)
    }

    /// Applies one timestep of aging to `state` in place.
    pub fn update(&mut self, state: &mut BatteryState, dt: f64) {
        let calendar = self.calendar.update(state, dt);
        state.soh_q += calendar.soh_q;
        state.soh_r += calendar.soh_r;

        if self.cycle_detector.update(state.soc, dt)
            && let Some(half_cycle) = self.cycle_detector.last_cycle().copied()
        {
            let cyclic = self.cyclic.update(state, &half_cycle);
            state.soh_q += cyclic.soh_q;
            state.soh_r += cyclic.soh_r;
            trace!(
                dod = half_cycle.depth_of_discharge,
                c_rate = half_cycle.c_rate,
                soh_q = state.soh_q,
                "half-cycle completed"
            );
        }
    }

    pub fn cycle_detector(&self) -> &HalfCycleDetector {
        &self.cycle_detector
    }
}
