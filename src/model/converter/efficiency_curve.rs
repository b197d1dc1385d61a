use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::converter::LossModel;
use crate::error::SimError;

use super::LossTable;

const BUNDLED_CURVE: &str = include_str!("../../../data/generic_inverter_efficiency.csv");

#[derive(Debug, Deserialize)]
struct CurvePoint {
    power: f64,
    efficiency: f64,
}

/// Measured part-load efficiency curve, applied in both directions.
///
/// The CSV has a `power` column (p.u. of rating, increasing, in `(0, 1]`)
/// and an `efficiency` column (p.u.). Charging delivers `p·η` to the DC
/// side, discharging draws `p/η` from it.
#[derive(Debug, Clone)]
pub struct EfficiencyCurve {
    table: LossTable,
}

impl EfficiencyCurve {
    /// Loads a curve from CSV data.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Csv` for unreadable rows and `SimError::InvalidData`
    /// for out-of-range values or a curve that is not strictly monotonic.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SimError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut charge = Vec::new();
        let mut discharge = Vec::new();
        for row in rdr.deserialize() {
            let CurvePoint { power, efficiency } = row?;
            if !(power > 0.0 && power <= 1.0) {
                return Err(SimError::InvalidData(format!("curve power must be in (0, 1], got {power}")));
            }
            if !(efficiency > 0.0 && efficiency <= 1.0) {
                return Err(SimError::InvalidData(format!(
                    "curve efficiency must be in (0, 1], got {efficiency}"
                )));
            }
            charge.push((power, power * efficiency));
            discharge.push((-power, -power / efficiency));
        }
        let table = LossTable::from_branches(&charge, &discharge)?;
        Ok(Self { table })
    }

    /// Loads a curve from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        Self::from_reader(File::open(path)?)
    }

    /// Generic inverter curve shipped with the crate.
    pub fn bundled() -> Result<Self, SimError> {
        Self::from_reader(BUNDLED_CURVE.as_bytes())
    }
}

impl LossModel for EfficiencyCurve {
    fn ac_to_dc(&self, power_ac: f64) -> f64 {
        self.table.ac_to_dc(power_ac)
    }

    fn dc_to_ac(&self, power_dc: f64) -> f64 {
        self.table.dc_to_ac(power_dc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_curve_points() {
        let m = EfficiencyCurve::from_reader("power,efficiency\n0.5,0.9\n1.0,0.95\n".as_bytes()).unwrap();
        assert!((m.ac_to_dc(1.0) - 0.95).abs() < 1e-12);
        assert!((m.ac_to_dc(-0.5) + 0.5 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_efficiency() {
        let res = EfficiencyCurve::from_reader("power,efficiency\n0.5,1.2\n1.0,0.95\n".as_bytes());
        assert!(res.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = EfficiencyCurve::from_path("/nonexistent/curve.csv");
        assert!(matches!(res, Err(SimError::Io(_))));
    }
}
