//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use simses::battery::{
    Battery, BatteryOptions, BatteryState, CellFormat, CellType, Circuit, ElectricalCellProperties, InitialState,
    ThermalCellProperties,
};

/// Internal resistance of [`SimpleCell`] in Ω.
pub const SIMPLE_RINT: f64 = 1e-3;

/// Cell with linear OCV `3.0 + soc * 1.2` V and constant 1 mΩ resistance.
///
/// 100 Ah, 3.6 V nominal, 1C charge and discharge.
pub struct SimpleCell {
    electrical: ElectricalCellProperties,
    thermal: ThermalCellProperties,
    format: CellFormat,
}

impl SimpleCell {
    pub fn new() -> Self {
        Self::with_electrical(ElectricalCellProperties::new(100.0, 3.6, 3.0, 4.2, 1.0, 1.0))
    }

    pub fn with_electrical(electrical: ElectricalCellProperties) -> Self {
        Self {
            electrical,
            thermal: ThermalCellProperties {
                min_temperature: 233.15,
                max_temperature: 333.15,
                mass: 1.0,
                specific_heat: 1000.0,
                convection_coefficient: 10.0,
            },
            format: CellFormat::Prismatic {
                height: 100.0,
                width: 30.0,
                length: 150.0,
            },
        }
    }
}

impl CellType for SimpleCell {
    fn electrical(&self) -> &ElectricalCellProperties {
        &self.electrical
    }

    fn thermal(&self) -> &ThermalCellProperties {
        &self.thermal
    }

    fn format(&self) -> &CellFormat {
        &self.format
    }

    fn open_circuit_voltage(&self, state: &BatteryState) -> f64 {
        let e = &self.electrical;
        e.min_voltage + state.soc * (e.max_voltage - e.min_voltage)
    }

    fn internal_resistance(&self, _state: &BatteryState) -> f64 {
        SIMPLE_RINT
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

/// Battery of [`SimpleCell`]s at 298.15 K with the full SOC window.
pub fn make_battery(serial: u32, parallel: u32, soc: f64) -> Battery {
    make_battery_with(serial, parallel, soc, BatteryOptions::default())
}

/// Battery of [`SimpleCell`]s at 298.15 K with custom options.
pub fn make_battery_with(serial: u32, parallel: u32, soc: f64, options: BatteryOptions) -> Battery {
    Battery::new(
        Box::new(SimpleCell::new()),
        Circuit::new(serial, parallel),
        InitialState::new(soc, 298.15),
        options,
    )
    .expect("simple battery should be valid")
}

/// Asserts `a` and `b` agree within an absolute tolerance.
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {a} ≈ {b} (tol {tol})");
}
