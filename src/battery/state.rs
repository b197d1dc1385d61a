//! Battery state snapshot.

/// Complete electrical and aging state of a battery after one timestep.
///
/// Plain data: all transitions live in [`super::Battery`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryState {
    /// Terminal voltage in V.
    pub v: f64,
    /// Current in A (positive = charging).
    pub i: f64,
    /// Temperature in K.
    pub temperature: f64,
    /// Terminal power in W.
    pub power: f64,
    /// Requested power in W.
    pub power_setpoint: f64,
    /// State of charge in p.u.
    pub soc: f64,
    /// Open-circuit voltage in V.
    pub ocv: f64,
    /// Hysteresis voltage in V.
    pub hys: f64,
    /// Internal resistance in Ω, including aging.
    pub rint: f64,
    /// Capacity state of health in p.u.
    pub soh_q: f64,
    /// Resistance state of health in p.u. (1.0 = beginning of life).
    pub soh_r: f64,
    /// Direction of the last non-zero current; kept while at rest.
    pub is_charge: bool,
    /// Ohmic heat generation in W.
    pub loss: f64,
    /// Charge current limit applied in the last step in A.
    pub i_max_charge: f64,
    /// Discharge current limit applied in the last step in A (magnitude).
    pub i_max_discharge: f64,
}

impl BatteryState {
    /// Creates a resting state at the given SOC and temperature.
    ///
    /// Voltages and resistance stay zero until a battery initialises them.
    pub fn at_rest(soc: f64, temperature: f64) -> Self {
        Self {
            v: 0.0,
            i: 0.0,
            temperature,
            power: 0.0,
            power_setpoint: 0.0,
            soc,
            ocv: 0.0,
            hys: 0.0,
            rint: 0.0,
            soh_q: 1.0,
            soh_r: 1.0,
            is_charge: true,
            loss: 0.0,
            i_max_charge: 0.0,
            i_max_discharge: 0.0,
        }
    }
}
