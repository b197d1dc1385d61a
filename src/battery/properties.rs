//! Datasheet parameters of a single cell.

/// Electrical ratings of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricalCellProperties {
    /// Nominal capacity in Ah.
    pub nominal_capacity: f64,
    /// Nominal voltage in V.
    pub nominal_voltage: f64,
    /// Minimum allowed voltage in V.
    pub min_voltage: f64,
    /// Maximum allowed voltage in V.
    pub max_voltage: f64,
    /// Maximum charge rate in 1/h (C-rate).
    pub max_charge_rate: f64,
    /// Maximum discharge rate in 1/h (C-rate).
    pub max_discharge_rate: f64,
    /// Self discharge in p.u. SOC per day, e.g. 0.015 for 1.5 % per day.
    pub self_discharge_rate: f64,
    /// Coulomb efficiency in p.u.
    pub coulomb_efficiency: f64,
}

impl ElectricalCellProperties {
    /// Creates properties with no self discharge and unit coulomb efficiency.
    pub fn new(
        nominal_capacity: f64,
        nominal_voltage: f64,
        min_voltage: f64,
        max_voltage: f64,
        max_charge_rate: f64,
        max_discharge_rate: f64,
    ) -> Self {
        Self {
            nominal_capacity,
            nominal_voltage,
            min_voltage,
            max_voltage,
            max_charge_rate,
            max_discharge_rate,
            self_discharge_rate: 0.0,
            coulomb_efficiency: 1.0,
        }
    }
}

/// Thermal parameters of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalCellProperties {
    /// Minimum allowed temperature in K.
    pub min_temperature: f64,
    /// Maximum allowed temperature in K.
    pub max_temperature: f64,
    /// Mass in kg.
    pub mass: f64,
    /// Specific heat in J/kgK.
    pub specific_heat: f64,
    /// Convection coefficient in W/m²K.
    pub convection_coefficient: f64,
}
