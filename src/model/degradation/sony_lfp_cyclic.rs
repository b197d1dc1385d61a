//! Cyclic aging of Sony/Murata LFP cells.
//!
//! After Naumann et al., "Analysis and modeling of cycle aging of a
//! commercial LiFePO4/graphite cell", Journal of Power Sources (2020).

use crate::battery::BatteryState;
use crate::degradation::{CyclicDegradation, HalfCycle, SohDelta};

const A_QLOSS: f64 = 0.0630;
const B_QLOSS: f64 = 0.0971;
const C_QLOSS: f64 = 4.0253;
const D_QLOSS: f64 = 1.0923;

const A_RINC: f64 = -0.0020;
const B_RINC: f64 = 0.0021;
const C_RINC: f64 = 6.8477;
const D_RINC: f64 = 0.9182;

/// Capacity loss grows with `sqrt(FEC)`, resistance increase linearly in FEC.
///
/// The fit is in percent; deltas are returned in p.u.
#[derive(Debug, Clone, Default)]
pub struct SonyLfpCyclicDegradation {
    accumulated_qloss: f64,
    accumulated_rinc: f64,
}

impl SonyLfpCyclicDegradation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulated_qloss(&self) -> f64 {
        self.accumulated_qloss
    }

    pub fn accumulated_rinc(&self) -> f64 {
        self.accumulated_rinc
    }
}

impl CyclicDegradation for SonyLfpCyclicDegradation {
    fn update(&mut self, _state: &BatteryState, half_cycle: &HalfCycle) -> SohDelta {
        let dod = half_cycle.depth_of_discharge;
        let c_rate = half_cycle.c_rate;
        let delta_fec = half_cycle.full_equivalent_cycles;
        if delta_fec == 0.0 {
            return SohDelta::ZERO;
        }

        let stress_q = (A_QLOSS * c_rate + B_QLOSS) * (C_QLOSS * (dod - 0.6).powi(3) + D_QLOSS);
        let delta_q = if stress_q > 0.0 {
            let virtual_fec = (self.accumulated_qloss * 100.0 / stress_q).powi(2);
            stress_q * (virtual_fec + delta_fec).sqrt() / 100.0 - self.accumulated_qloss
        } else {
            0.0
        };
        self.accumulated_qloss += delta_q;

        let stress_r = (A_RINC * c_rate + B_RINC) * (C_RINC * (dod - 0.5).powi(3) + D_RINC);
        let delta_r = stress_r * delta_fec / 100.0;
        self.accumulated_rinc += delta_r;

        SohDelta::new(-delta_q, delta_r)
    }
}
