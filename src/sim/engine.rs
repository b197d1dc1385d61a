//! Simulation engine stepping a converter-battery system through a profile.

use tracing::{debug, info};

use crate::battery::Battery;
use crate::converter::Converter;
use crate::model::converter::ConverterLoss;
use crate::thermal::RoomThermalModel;

use super::clock::Clock;
use super::profile::PowerProfile;
use super::types::{SimConfig, StepResult};

/// Steps reserved up front; longer runs grow the record vector as they go.
const PREALLOC_STEPS: usize = 1 << 20;

/// Converter with a battery on its DC side.
pub type BatterySystem = Converter<ConverterLoss, Battery>;

/// Simulation engine owning the storage system, its thermal environment
/// and the setpoint profile.
pub struct Engine {
    config: SimConfig,
    system: BatterySystem,
    thermal: RoomThermalModel,
    profile: PowerProfile,
}

impl Engine {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Timing and ambient temperature
    /// * `system` - Converter with the battery attached
    /// * `profile` - AC power setpoints
    pub fn new(config: SimConfig, system: BatterySystem, profile: PowerProfile) -> Self {
        let thermal = RoomThermalModel::new(config.ambient_temperature);
        Self {
            config,
            system,
            thermal,
            profile,
        }
    }

    /// Executes one simulation timestep and returns the result.
    ///
    /// Reads the setpoint, updates converter and battery, then moves the
    /// battery temperature towards ambient.
    pub fn step(&mut self, t: usize) -> StepResult {
        let dt = self.config.dt_s;
        let time_s = t as f64 * dt;

        let setpoint = self.profile.setpoint(time_s);
        self.system.update(setpoint, dt);
        self.thermal.update_component(self.system.storage_mut(), dt);

        let conv = &self.system.state;
        let bat = &self.system.storage().state;
        let result = StepResult {
            timestep: t,
            time_s,
            power_setpoint_w: setpoint,
            power_ac_w: conv.power,
            converter_loss_w: conv.loss,
            power_dc_w: bat.power,
            battery_loss_w: bat.loss,
            voltage_v: bat.v,
            current_a: bat.i,
            soc: bat.soc,
            temperature_k: bat.temperature,
            soh_q: bat.soh_q,
            soh_r: bat.soh_r,
        };
        debug!(
            step = t,
            setpoint,
            power_ac = result.power_ac_w,
            soc = result.soc,
            "step complete"
        );
        result
    }

    /// Executes all timesteps and returns the complete step record vector.
    pub fn run(&mut self) -> Vec<StepResult> {
        let total = self.config.total_steps();
        info!(
            steps = total,
            dt_s = self.config.dt_s,
            cell = self.battery().cell().name(),
            "simulation started"
        );
        let mut results = Vec::with_capacity(total.min(PREALLOC_STEPS));
        // progress every 10 % of the run
        let report_every = (total / 10).max(1);
        Clock::new(total).run(|t| {
            results.push(self.step(t));
            if (t + 1) % report_every == 0 && t + 1 < total {
                info!(step = t + 1, total, "progress");
            }
        });
        if let Some(last) = results.last() {
            info!(soc = last.soc, soh_q = last.soh_q, "simulation finished");
        }
        results
    }

    pub fn battery(&self) -> &Battery {
        self.system.storage()
    }

    pub fn system(&self) -> &BatterySystem {
        &self.system
    }

    pub fn thermal(&self) -> &RoomThermalModel {
        &self.thermal
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{BatteryOptions, Circuit, InitialState};
    use crate::model::cell::Samsung94AhNmc;
    use crate::model::converter::FixedEfficiency;

    fn engine(profile: PowerProfile, duration_s: f64) -> Engine {
        let battery = Battery::new(
            Box::new(Samsung94AhNmc::new()),
            Circuit::new(14, 1),
            InitialState::new(0.5, 298.15),
            BatteryOptions::default(),
        )
        .unwrap();
        let system = Converter::new(ConverterLoss::Fixed(FixedEfficiency::new(0.95)), 5000.0, battery).unwrap();
        Engine::new(SimConfig::new(60.0, duration_s, 298.15), system, profile)
    }

    #[test]
    fn run_produces_one_result_per_step() {
        let mut e = engine(PowerProfile::constant(1000.0), 3600.0);
        let results = e.run();
        assert_eq!(results.len(), 60);
        assert_eq!(results[59].timestep, 59);
        assert_eq!(results[59].time_s, 59.0 * 60.0);
    }

    #[test]
    fn charging_raises_soc_and_heats() {
        let mut e = engine(PowerProfile::constant(2000.0), 1800.0);
        let results = e.run();
        let last = &results[results.len() - 1];
        assert!(last.soc > 0.6 && last.soc < 0.8, "soc = {}", last.soc);
        assert!(last.temperature_k > 298.15);
        assert!((last.power_ac_w - 2000.0).abs() < 1e-6);
        assert!((last.power_dc_w - 1900.0).abs() < 1.0);
        assert!((last.converter_loss_w - 100.0).abs() < 1.0);
    }

    #[test]
    fn idle_profile_keeps_state() {
        let mut e = engine(PowerProfile::constant(0.0), 600.0);
        let results = e.run();
        assert!(results.iter().all(|r| r.soc == 0.5 && r.power_ac_w == 0.0));
        assert!(results.iter().all(|r| (r.temperature_k - 298.15).abs() < 1e-12));
    }
}
