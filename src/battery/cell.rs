//! Cell model interface.

use super::format::CellFormat;
use super::properties::{ElectricalCellProperties, ThermalCellProperties};
use super::state::BatteryState;

/// A cell chemistry/product model.
///
/// All values are per cell and at beginning of life; the pack scales them
/// by its circuit and applies aging.
pub trait CellType {
    fn electrical(&self) -> &ElectricalCellProperties;

    fn thermal(&self) -> &ThermalCellProperties;

    fn format(&self) -> &CellFormat;

    /// Open-circuit voltage in V for the state's SOC (and temperature, if modelled).
    fn open_circuit_voltage(&self, state: &BatteryState) -> f64;

    /// Hysteresis voltage in V.
    fn hysteresis_voltage(&self, _state: &BatteryState) -> f64 {
        0.0
    }

    /// Beginning-of-life internal resistance in Ω.
    fn internal_resistance(&self, state: &BatteryState) -> f64;

    /// Human-readable model name.
    fn name(&self) -> &'static str;
}
