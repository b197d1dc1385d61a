use crate::battery::{BatteryState, CellFormat, CellType, ElectricalCellProperties, ThermalCellProperties};

use super::SigmoidOcv;

const OCV: SigmoidOcv = SigmoidOcv {
    a: [3.3479, -6.7241, 2.5958, -61.9684],
    b: [0.6350, 1.4376],
    k: [4.5868, 3.1768, -3.8418, -4.6932, 0.3618, 0.9949],
};

const INTERNAL_RESISTANCE: f64 = 0.75e-3;

/// Samsung 94 Ah prismatic NMC cell.
///
/// Fitted OCV curve and a constant internal resistance.
#[derive(Debug, Clone)]
pub struct Samsung94AhNmc {
    electrical: ElectricalCellProperties,
    thermal: ThermalCellProperties,
    format: CellFormat,
}

impl Samsung94AhNmc {
    pub fn new() -> Self {
        Self {
            electrical: ElectricalCellProperties::new(94.0, 3.68, 2.7, 4.15, 2.0, 2.0),
            thermal: ThermalCellProperties {
                min_temperature: 233.15,
                max_temperature: 333.15,
                mass: 2.1,
                specific_heat: 1000.0,
                convection_coefficient: 15.0,
            },
            format: CellFormat::Prismatic {
                height: 125.0,
                width: 45.0,
                length: 173.0,
            },
        }
    }
}

impl Default for Samsung94AhNmc {
    fn default() -> Self {
        Self::new()
    }
}

impl CellType for Samsung94AhNmc {
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
        OCV.eval(state.soc)
    }

    fn internal_resistance(&self, _state: &BatteryState) -> f64 {
        INTERNAL_RESISTANCE
    }

    fn name(&self) -> &'static str {
        "samsung94ah_nmc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocv_spans_usable_window() {
        let cell = Samsung94AhNmc::new();
        let empty = cell.open_circuit_voltage(&BatteryState::at_rest(0.0, 298.15));
        let full = cell.open_circuit_voltage(&BatteryState::at_rest(1.0, 298.15));
        assert!(empty > 2.7 && empty < 3.6, "ocv at empty = {empty}");
        assert!(full > 3.9 && full < 4.15, "ocv at full = {full}");
    }

    #[test]
    fn resistance_is_constant() {
        let cell = Samsung94AhNmc::new();
        let a = cell.internal_resistance(&BatteryState::at_rest(0.1, 280.0));
        let b = cell.internal_resistance(&BatteryState::at_rest(0.9, 320.0));
        assert_eq!(a, b);
    }
}
