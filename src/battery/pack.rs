use tracing::trace;

use crate::converter::Storage;
use crate::degradation::DegradationModel;
use crate::error::SimError;
use crate::thermal::ThermalComponent;

use super::cell::CellType;
use super::state::BatteryState;

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Series/parallel arrangement of identical cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circuit {
    pub serial: u32,
    pub parallel: u32,
}

impl Circuit {
    pub fn new(serial: u32, parallel: u32) -> Self {
        Self { serial, parallel }
    }

    /// Sizes a circuit that approximates a target pack voltage and energy.
    ///
    /// The cell counts are rounded to the nearest integer, so the resulting
    /// pack may deviate slightly from the targets.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` for non-positive targets.
    pub fn from_targets(cell: &dyn CellType, voltage: f64, energy_capacity_wh: f64) -> Result<Self, SimError> {
        if !(voltage > 0.0) {
            return Err(SimError::invalid("voltage", format!("must be > 0, got {voltage}")));
        }
        if !(energy_capacity_wh > 0.0) {
            return Err(SimError::invalid(
                "energy_capacity",
                format!("must be > 0, got {energy_capacity_wh}"),
            ));
        }
        let electrical = cell.electrical();
        let serial = (voltage / electrical.nominal_voltage).round().max(1.0);
        let parallel = (energy_capacity_wh / voltage / electrical.nominal_capacity).round().max(1.0);
        Ok(Self::new(serial as u32, parallel as u32))
    }

    fn serial_f64(&self) -> f64 {
        f64::from(self.serial)
    }

    fn parallel_f64(&self) -> f64 {
        f64::from(self.parallel)
    }

    fn cells(&self) -> f64 {
        self.serial_f64() * self.parallel_f64()
    }
}

/// Starting conditions of a battery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialState {
    /// SOC in p.u.
    pub soc: f64,
    /// Temperature in K.
    pub temperature: f64,
    /// Capacity state of health in p.u.
    pub soh_q: f64,
    /// Resistance state of health in p.u.
    pub soh_r: f64,
}

impl InitialState {
    /// Fresh battery (state of health 1.0) at the given SOC and temperature.
    pub fn new(soc: f64, temperature: f64) -> Self {
        Self {
            soc,
            temperature,
            soh_q: 1.0,
            soh_r: 1.0,
        }
    }
}

/// Operating limits of a battery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryOptions {
    /// Allowed SOC window `(min, max)` in p.u.
    pub soc_limits: (f64, f64),
    /// Pack terminal voltage above which the charge current is derated
    /// linearly down to zero at the maximum voltage.
    pub charge_derate_voltage_start: Option<f64>,
    /// Pack terminal voltage below which the discharge current is derated
    /// linearly down to zero at the minimum voltage.
    pub discharge_derate_voltage_start: Option<f64>,
}

impl Default for BatteryOptions {
    fn default() -> Self {
        Self {
            soc_limits: (0.0, 1.0),
            charge_derate_voltage_start: None,
            discharge_derate_voltage_start: None,
        }
    }
}

/// A battery pack built from identical cells.
///
/// Holds the cell model, the circuit, operating limits, an optional aging
/// model and the current [`BatteryState`].
///
/// # Power Convention
/// - Positive power/current: charging
/// - Negative power/current: discharging
pub struct Battery {
    cell: Box<dyn CellType>,
    circuit: Circuit,
    soc_limits: (f64, f64),
    charge_derate_voltage_start: Option<f64>,
    discharge_derate_voltage_start: Option<f64>,
    degradation: Option<DegradationModel>,
    /// State after the most recent update.
    pub state: BatteryState,
}

impl Battery {
    /// Creates a battery and initialises its open-circuit voltage and
    /// internal resistance from the cell model.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if the circuit is empty, the SOC
    /// window is not ordered within `[0, 1]`, the initial SOC lies outside
    /// the window, the temperature or state of health is not positive, or
    /// a derating voltage lies outside the pack voltage window.
    pub fn new(
        cell: Box<dyn CellType>,
        circuit: Circuit,
        initial: InitialState,
        options: BatteryOptions,
    ) -> Result<Self, SimError> {
        if circuit.serial == 0 || circuit.parallel == 0 {
            return Err(SimError::invalid(
                "circuit",
                format!("needs at least one cell, got ({}, {})", circuit.serial, circuit.parallel),
            ));
        }
        let (soc_min, soc_max) = options.soc_limits;
        if !(0.0 <= soc_min && soc_min < soc_max && soc_max <= 1.0) {
            return Err(SimError::invalid(
                "soc_limits",
                format!("must satisfy 0 <= min < max <= 1, got ({soc_min}, {soc_max})"),
            ));
        }
        if !(soc_min..=soc_max).contains(&initial.soc) {
            return Err(SimError::invalid(
                "start_soc",
                format!("{} is outside the SOC limits ({soc_min}, {soc_max})", initial.soc),
            ));
        }
        if !(initial.temperature > 0.0) {
            return Err(SimError::invalid(
                "start_temperature",
                format!("must be > 0 K, got {}", initial.temperature),
            ));
        }
        if !(initial.soh_q > 0.0 && initial.soh_r > 0.0) {
            return Err(SimError::invalid("start_soh", "state of health must be > 0"));
        }
        let eta = cell.electrical().coulomb_efficiency;
        if !(eta > 0.0 && eta <= 1.0) {
            return Err(SimError::invalid(
                "coulomb_efficiency",
                format!("must be in (0, 1], got {eta}"),
            ));
        }

        let mut battery = Self {
            cell,
            circuit,
            soc_limits: options.soc_limits,
            charge_derate_voltage_start: options.charge_derate_voltage_start,
            discharge_derate_voltage_start: options.discharge_derate_voltage_start,
            degradation: None,
            state: BatteryState::at_rest(initial.soc, initial.temperature),
        };

        for (name, start) in [
            ("charge_derate_voltage_start", battery.charge_derate_voltage_start),
            ("discharge_derate_voltage_start", battery.discharge_derate_voltage_start),
        ] {
            if let Some(v) = start
                && !(v > battery.min_voltage() && v < battery.max_voltage())
            {
                return Err(SimError::invalid(
                    name,
                    format!(
                        "{v} V is outside the pack voltage window ({}, {})",
                        battery.min_voltage(),
                        battery.max_voltage()
                    ),
                ));
            }
        }

        battery.state.soh_q = initial.soh_q;
        battery.state.soh_r = initial.soh_r;
        battery.state.ocv = battery.open_circuit_voltage(&battery.state);
        battery.state.hys = battery.hysteresis_voltage(&battery.state);
        battery.state.rint = battery.internal_resistance(&battery.state);
        battery.state.v = battery.state.ocv + battery.state.hys;
        Ok(battery)
    }

    /// Attaches an aging model that runs at the end of every update.
    pub fn with_degradation(mut self, degradation: DegradationModel) -> Self {
        self.degradation = Some(degradation);
        self
    }

    pub fn cell(&self) -> &dyn CellType {
        self.cell.as_ref()
    }

    pub fn circuit(&self) -> Circuit {
        self.circuit
    }

    pub fn soc_limits(&self) -> (f64, f64) {
        self.soc_limits
    }

    pub fn charge_derate_voltage_start(&self) -> Option<f64> {
        self.charge_derate_voltage_start
    }

    pub fn discharge_derate_voltage_start(&self) -> Option<f64> {
        self.discharge_derate_voltage_start
    }

    pub fn degradation(&self) -> Option<&DegradationModel> {
        self.degradation.as_ref()
    }

    /// Advances the battery by one timestep of `dt` seconds.
    ///
    /// The current is chosen to meet `power_setpoint` as closely as the
    /// current, voltage, SOC and derating limits allow. OCV and resistance
    /// are evaluated at the state from the previous step.
    pub fn update(&mut self, power_setpoint: f64, dt: f64) {
        let prev = &self.state;
        let ocv = self.open_circuit_voltage(prev);
        let hys = self.hysteresis_voltage(prev);
        let rint = self.internal_resistance(prev);
        let (i_max_charge, i_max_discharge) = self.current_limits(prev, ocv + hys, rint, dt);

        let i = if power_setpoint == 0.0 || dt <= 0.0 {
            0.0
        } else {
            solve_current(power_setpoint, ocv + hys, rint).clamp(-i_max_discharge, i_max_charge)
        };

        let electrical = self.cell.electrical();
        let eta = if i > 0.0 { electrical.coulomb_efficiency } else { 1.0 };
        let (soc_min, soc_max) = self.soc_limits;
        let mut soc = prev.soc + i * eta * dt / (self.capacity(prev) * SECONDS_PER_HOUR);
        if electrical.self_discharge_rate > 0.0 {
            soc -= electrical.self_discharge_rate * dt / SECONDS_PER_DAY;
        }
        let soc = soc.clamp(soc_min.min(prev.soc), soc_max.max(prev.soc)).max(0.0);

        let is_charge = if i == 0.0 { prev.is_charge } else { i > 0.0 };
        let v = ocv + hys + rint * i;

        self.state = BatteryState {
            v,
            i,
            temperature: prev.temperature,
            power: v * i,
            power_setpoint,
            soc,
            ocv,
            hys,
            rint,
            soh_q: prev.soh_q,
            soh_r: prev.soh_r,
            is_charge,
            loss: rint * i * i,
            i_max_charge,
            i_max_discharge,
        };
        trace!(
            soc = self.state.soc,
            current = self.state.i,
            voltage = self.state.v,
            "battery step"
        );

        if let Some(degradation) = self.degradation.as_mut() {
            degradation.update(&mut self.state, dt);
        }
    }

    /// Current in A that realises `power_setpoint` within all limits.
    ///
    /// Solves `P = i * (ocv + hys + rint * i)` for the root continuous with
    /// zero current, then clamps to the current, voltage, SOC and derating
    /// limits. Returns 0 for a zero setpoint.
    pub fn equilibrium_current(&self, state: &BatteryState, power_setpoint: f64, dt: f64) -> f64 {
        if power_setpoint == 0.0 || dt <= 0.0 {
            return 0.0;
        }
        let u = self.open_circuit_voltage(state) + self.hysteresis_voltage(state);
        let rint = self.internal_resistance(state);
        let (i_max_charge, i_max_discharge) = self.current_limits(state, u, rint, dt);
        solve_current(power_setpoint, u, rint).clamp(-i_max_discharge, i_max_charge)
    }

    /// Charge and discharge current limits (both as magnitudes) for one step.
    fn current_limits(&self, state: &BatteryState, u: f64, rint: f64, dt: f64) -> (f64, f64) {
        let (soc_min, soc_max) = self.soc_limits;
        let q = self.capacity(state);
        let eta = self.cell.electrical().coulomb_efficiency;
        let v_max = self.max_voltage();
        let v_min = self.min_voltage();

        let mut charge = self.max_charge_current();
        let mut discharge = self.max_discharge_current();

        if rint > 0.0 {
            charge = charge.min((v_max - u) / rint);
            discharge = discharge.min((u - v_min) / rint);
        }

        if dt > 0.0 {
            charge = charge.min((soc_max - state.soc) * q * SECONDS_PER_HOUR / (dt * eta));
            discharge = discharge.min((state.soc - soc_min) * q * SECONDS_PER_HOUR / dt);
        }

        if let Some(start) = self.charge_derate_voltage_start {
            let derated = derated_limit(self.max_charge_current(), v_max - u, v_max - start, rint);
            charge = charge.min(derated);
        }
        if let Some(start) = self.discharge_derate_voltage_start {
            let derated = derated_limit(self.max_discharge_current(), u - v_min, start - v_min, rint);
            discharge = discharge.min(derated);
        }

        (charge.max(0.0), discharge.max(0.0))
    }

    // electrical properties

    pub fn open_circuit_voltage(&self, state: &BatteryState) -> f64 {
        self.cell.open_circuit_voltage(state) * self.circuit.serial_f64()
    }

    pub fn hysteresis_voltage(&self, state: &BatteryState) -> f64 {
        self.cell.hysteresis_voltage(state) * self.circuit.serial_f64()
    }

    /// Pack internal resistance in Ω including resistance aging.
    pub fn internal_resistance(&self, state: &BatteryState) -> f64 {
        self.cell.internal_resistance(state) * self.circuit.serial_f64() / self.circuit.parallel_f64() * state.soh_r
    }

    /// Usable charge capacity in Ah including capacity aging.
    pub fn capacity(&self, state: &BatteryState) -> f64 {
        self.nominal_capacity() * state.soh_q
    }

    /// Nominal charge capacity in Ah.
    pub fn nominal_capacity(&self) -> f64 {
        self.cell.electrical().nominal_capacity * self.circuit.parallel_f64()
    }

    pub fn nominal_voltage(&self) -> f64 {
        self.cell.electrical().nominal_voltage * self.circuit.serial_f64()
    }

    /// Nominal energy capacity in Wh.
    pub fn nominal_energy_capacity(&self) -> f64 {
        self.nominal_capacity() * self.nominal_voltage()
    }

    pub fn min_voltage(&self) -> f64 {
        self.cell.electrical().min_voltage * self.circuit.serial_f64()
    }

    pub fn max_voltage(&self) -> f64 {
        self.cell.electrical().max_voltage * self.circuit.serial_f64()
    }

    pub fn max_charge_current(&self) -> f64 {
        let e = self.cell.electrical();
        e.nominal_capacity * e.max_charge_rate * self.circuit.parallel_f64()
    }

    pub fn max_discharge_current(&self) -> f64 {
        let e = self.cell.electrical();
        e.nominal_capacity * e.max_discharge_rate * self.circuit.parallel_f64()
    }

    pub fn coulomb_efficiency(&self) -> f64 {
        self.cell.electrical().coulomb_efficiency
    }

    // thermal properties

    /// Lumped heat capacity in J/K.
    pub fn thermal_capacity(&self) -> f64 {
        let t = self.cell.thermal();
        t.specific_heat * t.mass * self.circuit.cells()
    }

    /// Thermal resistance to ambient in K/W.
    pub fn thermal_resistance(&self) -> f64 {
        1.0 / (self.cell.thermal().convection_coefficient * self.area())
    }

    pub fn min_temperature(&self) -> f64 {
        self.cell.thermal().min_temperature
    }

    pub fn max_temperature(&self) -> f64 {
        self.cell.thermal().max_temperature
    }

    // cell format

    /// Total cell volume in m³.
    pub fn volume(&self) -> f64 {
        self.cell.format().volume() * self.circuit.cells()
    }

    /// Total cell surface in m².
    pub fn area(&self) -> f64 {
        self.cell.format().area() * self.circuit.cells()
    }
}

impl Storage for Battery {
    fn update(&mut self, power_setpoint: f64, dt: f64) {
        Battery::update(self, power_setpoint, dt);
    }

    fn power(&self) -> f64 {
        self.state.power
    }
}

impl ThermalComponent for Battery {
    fn temperature(&self) -> f64 {
        self.state.temperature
    }

    fn set_temperature(&mut self, temperature: f64) {
        self.state.temperature = temperature;
    }

    fn heat_loss(&self) -> f64 {
        self.state.loss
    }

    fn thermal_capacity(&self) -> f64 {
        Battery::thermal_capacity(self)
    }

    fn thermal_resistance(&self) -> f64 {
        Battery::thermal_resistance(self)
    }
}

/// Solves `rint * i² + u * i - power = 0` for the root through zero.
///
/// Discharge requests beyond the maximum deliverable power return the
/// maximum power point current `-u / (2 * rint)`.
fn solve_current(power: f64, u: f64, rint: f64) -> f64 {
    let discriminant = u * u + 4.0 * rint * power;
    if discriminant < 0.0 {
        return -u / (2.0 * rint);
    }
    let denominator = u + discriminant.sqrt();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    2.0 * power / denominator
}

/// Current limit of a linear voltage derating band.
///
/// `headroom` is the distance from the open-circuit voltage to the hard
/// voltage limit, `band` the width of the derating band. The limit is
/// solved together with the ohmic drop, so it only binds when the
/// terminal voltage enters the band.
fn derated_limit(i_max: f64, headroom: f64, band: f64, rint: f64) -> f64 {
    if band <= 0.0 {
        return i_max;
    }
    if headroom <= 0.0 {
        return 0.0;
    }
    i_max * headroom / (band + i_max * rint)
}
