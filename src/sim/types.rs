//! Simulation timing and per-step records.

use std::fmt;

use serde::Serialize;

/// Timing and environment of a simulation run.
///
/// # Examples
///
/// ```
/// use simses::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(60.0, 3600.0, 298.15);
/// assert_eq!(cfg.total_steps(), 60);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Timestep in seconds.
    pub dt_s: f64,
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Ambient temperature in K.
    pub ambient_temperature: f64,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Arguments
    ///
    /// * `dt_s` - Timestep in seconds (finite, > 0)
    /// * `duration_s` - Simulated duration in seconds (finite, >= 0)
    /// * `ambient_temperature` - Ambient temperature in K (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of range.
    pub fn new(dt_s: f64, duration_s: f64, ambient_temperature: f64) -> Self {
        assert!(dt_s.is_finite() && dt_s > 0.0, "dt_s must be finite and > 0");
        assert!(duration_s.is_finite() && duration_s >= 0.0, "duration_s must be finite and >= 0");
        assert!(ambient_temperature > 0.0, "ambient_temperature must be > 0 K");
        Self {
            dt_s,
            duration_s,
            ambient_temperature,
        }
    }

    /// Number of timesteps, rounded to the nearest whole step.
    pub fn total_steps(&self) -> usize {
        (self.duration_s / self.dt_s).round() as usize
    }

    /// Timestep in hours.
    pub fn dt_hours(&self) -> f64 {
        self.dt_s / 3600.0
    }
}

/// Complete record of one simulation timestep.
///
/// Powers follow the storage convention: positive charges the battery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    /// Timestep index.
    pub timestep: usize,
    /// Simulation time at the start of the step in seconds.
    pub time_s: f64,
    /// Requested AC power (W).
    pub power_setpoint_w: f64,
    /// Realised AC power (W).
    pub power_ac_w: f64,
    /// Converter loss (W).
    pub converter_loss_w: f64,
    /// DC power at the battery terminals (W).
    pub power_dc_w: f64,
    /// Ohmic battery loss (W).
    pub battery_loss_w: f64,
    /// Terminal voltage (V).
    pub voltage_v: f64,
    /// Battery current (A).
    pub current_a: f64,
    /// SOC after this step (p.u.).
    pub soc: f64,
    /// Battery temperature after this step (K).
    pub temperature_k: f64,
    /// Capacity state of health (p.u.).
    pub soh_q: f64,
    /// Resistance state of health (p.u.).
    pub soh_r: f64,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({:>8.2}h) | set={:>10.1} W  ac={:>10.1} W  dc={:>10.1} W | \
             loss(conv={:.1}, bat={:.1}) W | {:.2} V {:>8.2} A | SoC={:.2}%  T={:.2} K  SoH={:.4}",
            self.timestep,
            self.time_s / 3600.0,
            self.power_setpoint_w,
            self.power_ac_w,
            self.power_dc_w,
            self.converter_loss_w,
            self.battery_loss_w,
            self.voltage_v,
            self.current_a,
            self.soc * 100.0,
            self.temperature_k,
            self.soh_q,
        )
    }
}
