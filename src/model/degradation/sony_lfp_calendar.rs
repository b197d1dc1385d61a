//! Calendar aging of Sony/Murata LFP cells.
//!
//! After Naumann et al., "Analysis and modeling of calendar aging of a
//! commercial LiFePO4/graphite cell", Journal of Energy Storage (2018).

use crate::battery::BatteryState;
use crate::degradation::{CalendarDegradation, SohDelta};

/// Gas constant in J/(K·mol).
const R: f64 = 8.3144598;
/// Reference temperature in K.
const T_REF: f64 = 298.15;

const K_REF_QLOSS: f64 = 1.2571e-05;
const EA_QLOSS: f64 = 17126.0;
const C_QLOSS: f64 = 2.8575;
const D_QLOSS: f64 = 0.60225;

const K_REF_RINC: f64 = 3.4194e-10;
const EA_RINC: f64 = 71827.0;
const C_RINC: f64 = -3.3903;
const D_RINC: f64 = 1.5604;

/// Capacity loss grows with `sqrt(t)`, resistance increase linearly in `t`.
///
/// Changing stress between steps is handled with virtual time: the time
/// the current stress would have needed to reach the accumulated loss.
#[derive(Debug, Clone, Default)]
pub struct SonyLfpCalendarDegradation {
    accumulated_qloss: f64,
    accumulated_rinc: f64,
}

impl SonyLfpCalendarDegradation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total capacity loss so far in p.u.
    pub fn accumulated_qloss(&self) -> f64 {
        self.accumulated_qloss
    }

    /// Total resistance increase so far in p.u.
    pub fn accumulated_rinc(&self) -> f64 {
        self.accumulated_rinc
    }
}

fn arrhenius(activation_energy: f64, temperature: f64) -> f64 {
    (-activation_energy / R * (1.0 / temperature - 1.0 / T_REF)).exp()
}

impl CalendarDegradation for SonyLfpCalendarDegradation {
    fn update(&mut self, state: &BatteryState, dt: f64) -> SohDelta {
        if dt == 0.0 {
            return SohDelta::ZERO;
        }
        let soc = state.soc;

        let stress_q = K_REF_QLOSS * arrhenius(EA_QLOSS, state.temperature) * (C_QLOSS * (soc - 0.5).powi(3) + D_QLOSS);
        let delta_q = if stress_q > 0.0 {
            let virtual_time = (self.accumulated_qloss / stress_q).powi(2);
            stress_q * (virtual_time + dt).sqrt() - self.accumulated_qloss
        } else {
            0.0
        };
        self.accumulated_qloss += delta_q;

        let stress_r = K_REF_RINC * arrhenius(EA_RINC, state.temperature) * (C_RINC * (soc - 0.5).powi(2) + D_RINC);
        let delta_r = stress_r * dt;
        self.accumulated_rinc += delta_r;

        SohDelta::new(-delta_q, delta_r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: f64 = 86_400.0;

    fn state(temperature: f64) -> BatteryState {
        BatteryState::at_rest(0.5, temperature)
    }

    #[test]
    fn ages_capacity_and_resistance() {
        let mut m = SonyLfpCalendarDegradation::new();
        let d = m.update(&state(298.15), 3600.0);
        assert!(d.soh_q < 0.0);
        assert!(d.soh_r > 0.0);
        assert!((m.accumulated_qloss() + d.soh_q).abs() < 1e-15);
        assert!((m.accumulated_rinc() - d.soh_r).abs() < 1e-15);
    }

    #[test]
    fn zero_timestep_is_a_no_op() {
        let mut m = SonyLfpCalendarDegradation::new();
        assert_eq!(m.update(&state(298.15), 0.0), SohDelta::ZERO);
    }

    #[test]
    fn heat_accelerates_aging() {
        let mut cold = SonyLfpCalendarDegradation::new();
        let mut hot = SonyLfpCalendarDegradation::new();
        let d_cold = cold.update(&state(278.15), DAY);
        let d_hot = hot.update(&state(318.15), DAY);
        assert!(d_hot.soh_q < d_cold.soh_q);
        assert!(d_hot.soh_r > d_cold.soh_r);
    }

    #[test]
    fn capacity_loss_follows_sqrt_time() {
        let mut one = SonyLfpCalendarDegradation::new();
        let mut four = SonyLfpCalendarDegradation::new();
        let ratio = four.update(&state(298.15), 4.0 * DAY).soh_q / one.update(&state(298.15), DAY).soh_q;
        assert!((ratio - 2.0).abs() < 0.02);
    }

    #[test]
    fn small_steps_match_one_large_step() {
        let mut single = SonyLfpCalendarDegradation::new();
        let mut multi = SonyLfpCalendarDegradation::new();
        let big = single.update(&state(298.15), DAY);

        let mut total = SohDelta::ZERO;
        for _ in 0..100 {
            let d = multi.update(&state(298.15), DAY / 100.0);
            total.soh_q += d.soh_q;
            total.soh_r += d.soh_r;
        }
        assert!((total.soh_q - big.soh_q).abs() < 0.02 * big.soh_q.abs());
        assert!((total.soh_r - big.soh_r).abs() < 0.02 * big.soh_r.abs());
    }
}
