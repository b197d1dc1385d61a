use crate::converter::LossModel;
use crate::error::SimError;

use super::LossTable;

const K0: f64 = 0.00601144;
const K1: f64 = 0.00863612;
const K2: f64 = 0.01195589;
const M0: f64 = 97.0;

const TABLE_POINTS: usize = 101;

/// Fitted loss curve of a Siemens Sinamics S120 inverter.
///
/// Losses are `k0·(1 - exp(-m0·p)) + k1·p + k2·p²` of rated power, with a
/// constant-plus-activation term, a linear and a quadratic term. The same
/// curve applies in both directions and is tabulated at 1 % steps.
#[derive(Debug, Clone)]
pub struct SinamicsS120Fit {
    table: LossTable,
}

impl SinamicsS120Fit {
    /// Tabulates the fitted curve.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidData` if the tabulated curve is not
    /// strictly monotonic, which the fitted constants rule out.
    pub fn new() -> Result<Self, SimError> {
        let magnitudes = (1..TABLE_POINTS).map(|k| k as f64 / (TABLE_POINTS - 1) as f64);
        let charge: Vec<(f64, f64)> = magnitudes.clone().map(|p| (p, p - loss(p))).collect();
        let discharge: Vec<(f64, f64)> = magnitudes.map(|p| (-p, -p - loss(p))).collect();
        let table = LossTable::from_branches(&charge, &discharge)?;
        Ok(Self { table })
    }

    /// Loss in p.u. of rated power at per-unit power `p`.
    pub fn loss(&self, p: f64) -> f64 {
        loss(p)
    }
}

fn loss(p: f64) -> f64 {
    let p = p.abs();
    K0 * (1.0 - (-M0 * p).exp()) + K1 * p + K2 * p * p
}

impl LossModel for SinamicsS120Fit {
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
    fn full_load_efficiency() {
        let m = SinamicsS120Fit::new().unwrap();
        let expected = 1.0 - (K0 + K1 + K2);
        assert!((m.ac_to_dc(1.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn partial_load_is_less_efficient() {
        let m = SinamicsS120Fit::new().unwrap();
        let eff_low = m.ac_to_dc(0.05) / 0.05;
        let eff_mid = m.ac_to_dc(0.5) / 0.5;
        assert!(eff_low < eff_mid);
    }

    #[test]
    fn loss_is_symmetric() {
        let m = SinamicsS120Fit::new().unwrap();
        assert_eq!(m.loss(0.3), m.loss(-0.3));
        let charge_loss = 0.3 - m.ac_to_dc(0.3);
        let discharge_loss = -0.3 - m.ac_to_dc(-0.3);
        assert!(charge_loss > 0.0);
        assert!((charge_loss - discharge_loss).abs() < 1e-12);
    }
}
