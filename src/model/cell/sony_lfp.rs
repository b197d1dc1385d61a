use std::io::Read;

use crate::battery::{BatteryState, CellFormat, CellType, ElectricalCellProperties, ThermalCellProperties};
use crate::error::SimError;
use crate::interp::Grid2d;

use super::SigmoidOcv;

const OCV: SigmoidOcv = SigmoidOcv {
    a: [-116.2064, -22.4512, 358.9072, 499.9994],
    b: [-0.1572, -0.0944],
    k: [2.0020, -3.3160, 4.9996, -0.4574, -1.3646, 0.1251],
};

/// Embedded internal resistance table: one row per SOC, `charge_<K>` and
/// `discharge_<K>` columns per temperature.
const RINT_TABLE: &str = include_str!("../../../data/sony_lfp_rint.csv");

/// Sony US26650FTC1 LFP round cell.
///
/// Fitted OCV curve; the internal resistance is looked up in separate
/// charge and discharge tables over SOC and temperature.
#[derive(Debug, Clone)]
pub struct SonyLfp {
    electrical: ElectricalCellProperties,
    thermal: ThermalCellProperties,
    format: CellFormat,
    rint_charge: Grid2d,
    rint_discharge: Grid2d,
}

impl SonyLfp {
    /// Builds the cell with the bundled resistance table.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled table is corrupt.
    pub fn new() -> Result<Self, SimError> {
        Self::with_resistance_table(RINT_TABLE.as_bytes())
    }

    /// Builds the cell with a resistance table read from CSV.
    ///
    /// The first column holds the SOC axis, the remaining columns are named
    /// `charge_<temperature>` and `discharge_<temperature>` (temperature in
    /// K) and must cover the same temperatures in the same order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Csv` for unreadable input and
    /// `SimError::InvalidData` for malformed headers, values or axes.
    pub fn with_resistance_table<R: Read>(reader: R) -> Result<Self, SimError> {
        let (rint_charge, rint_discharge) = parse_rint_table(reader)?;
        Ok(Self {
            electrical: ElectricalCellProperties::new(3.0, 3.2, 2.0, 3.6, 1.0, 6.6),
            thermal: ThermalCellProperties {
                min_temperature: 273.15,
                max_temperature: 333.15,
                mass: 0.07,
                specific_heat: 1001.0,
                convection_coefficient: 15.0,
            },
            format: CellFormat::ROUND_26650,
            rint_charge,
            rint_discharge,
        })
    }
}

impl CellType for SonyLfp {
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

    fn internal_resistance(&self, state: &BatteryState) -> f64 {
        let table = if state.is_charge {
            &self.rint_charge
        } else {
            &self.rint_discharge
        };
        table.eval(state.soc, state.temperature)
    }

    fn name(&self) -> &'static str {
        "sony_lfp"
    }
}

fn parse_rint_table<R: Read>(reader: R) -> Result<(Grid2d, Grid2d), SimError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut charge_temps = Vec::new();
    let mut discharge_temps = Vec::new();
    // false = charge column, true = discharge column
    let mut column_kinds = Vec::new();
    for name in rdr.headers()?.iter().skip(1) {
        let (kind, temps, value) = if let Some(t) = name.strip_prefix("charge_") {
            (false, &mut charge_temps, t)
        } else if let Some(t) = name.strip_prefix("discharge_") {
            (true, &mut discharge_temps, t)
        } else {
            return Err(SimError::InvalidData(format!("unexpected resistance column `{name}`")));
        };
        temps.push(parse_value(value)?);
        column_kinds.push(kind);
    }
    if charge_temps != discharge_temps {
        return Err(SimError::InvalidData(
            "charge and discharge columns must cover the same temperatures".to_string(),
        ));
    }

    let mut socs = Vec::new();
    let mut charge = Vec::new();
    let mut discharge = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut fields = record.iter();
        let soc = fields
            .next()
            .ok_or_else(|| SimError::InvalidData("empty resistance row".to_string()))?;
        socs.push(parse_value(soc)?);

        let mut n = 0;
        for (field, &is_discharge) in fields.zip(&column_kinds) {
            let rint = parse_value(field)?;
            if !(rint > 0.0) {
                return Err(SimError::InvalidData(format!("internal resistance must be > 0, got {rint}")));
            }
            if is_discharge {
                discharge.push(rint);
            } else {
                charge.push(rint);
            }
            n += 1;
        }
        if n != column_kinds.len() {
            return Err(SimError::InvalidData(format!(
                "resistance row at soc {} has {n} values, expected {}",
                socs[socs.len() - 1],
                column_kinds.len()
            )));
        }
    }

    let charge = Grid2d::new(socs.clone(), charge_temps, charge)?;
    let discharge = Grid2d::new(socs, discharge_temps, discharge)?;
    Ok((charge, discharge))
}

fn parse_value(field: &str) -> Result<f64, SimError> {
    field
        .parse()
        .map_err(|_| SimError::InvalidData(format!("not a number: `{field}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(soc: f64, temperature: f64, is_charge: bool) -> BatteryState {
        BatteryState {
            is_charge,
            ..BatteryState::at_rest(soc, temperature)
        }
    }

    #[test]
    fn bundled_table_loads() {
        let cell = SonyLfp::new().unwrap();
        let r = cell.internal_resistance(&state(0.5, 298.15, true));
        assert!((r - 0.0172).abs() < 1e-9);
    }

    #[test]
    fn resistance_depends_on_direction_soc_and_temperature() {
        let cell = SonyLfp::new().unwrap();
        let ch = cell.internal_resistance(&state(0.1, 298.15, true));
        let dch = cell.internal_resistance(&state(0.1, 298.15, false));
        assert!(dch > ch);

        let mid = cell.internal_resistance(&state(0.5, 298.15, true));
        assert!(ch > mid);

        let cold = cell.internal_resistance(&state(0.5, 283.15, true));
        let hot = cell.internal_resistance(&state(0.5, 333.15, true));
        assert!(cold > mid && mid > hot);
    }

    #[test]
    fn resistance_clamps_outside_table() {
        let cell = SonyLfp::new().unwrap();
        let edge = cell.internal_resistance(&state(0.5, 333.15, false));
        let beyond = cell.internal_resistance(&state(0.5, 353.15, false));
        assert_eq!(edge, beyond);
    }

    #[test]
    fn custom_table_is_used() {
        let csv = "soc,charge_280,charge_300,discharge_280,discharge_300\n\
                   0.0,0.02,0.01,0.03,0.02\n\
                   1.0,0.02,0.01,0.03,0.02\n";
        let cell = SonyLfp::with_resistance_table(csv.as_bytes()).unwrap();
        let r = cell.internal_resistance(&state(0.5, 290.0, false));
        assert!((r - 0.025).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_temperatures() {
        let csv = "soc,charge_280,charge_300,discharge_280,discharge_310\n\
                   0.0,0.02,0.01,0.03,0.02\n\
                   1.0,0.02,0.01,0.03,0.02\n";
        assert!(SonyLfp::with_resistance_table(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_unknown_columns() {
        let csv = "soc,rint\n0.0,0.01\n1.0,0.01\n";
        assert!(SonyLfp::with_resistance_table(csv.as_bytes()).is_err());
    }
}
