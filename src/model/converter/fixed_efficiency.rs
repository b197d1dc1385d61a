use crate::converter::LossModel;

/// Constant conversion efficiency, optionally different per direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEfficiency {
    /// Charging efficiency (AC to DC) in p.u.
    pub effc: f64,
    /// Discharging efficiency (DC to AC) in p.u.
    pub effd: f64,
}

impl FixedEfficiency {
    /// Same efficiency in both directions.
    ///
    /// # Panics
    ///
    /// Panics if `eff` is not in `(0, 1]`.
    pub fn new(eff: f64) -> Self {
        Self::asymmetric(eff, eff)
    }

    /// Separate charging and discharging efficiencies.
    ///
    /// # Panics
    ///
    /// Panics if either efficiency is not in `(0, 1]`.
    pub fn asymmetric(effc: f64, effd: f64) -> Self {
        assert!(effc > 0.0 && effc <= 1.0, "charge efficiency must be in (0, 1]");
        assert!(effd > 0.0 && effd <= 1.0, "discharge efficiency must be in (0, 1]");
        Self { effc, effd }
    }
}

impl LossModel for FixedEfficiency {
    fn ac_to_dc(&self, power_ac: f64) -> f64 {
        if power_ac >= 0.0 {
            power_ac * self.effc
        } else {
            power_ac / self.effd
        }
    }

    fn dc_to_ac(&self, power_dc: f64) -> f64 {
        if power_dc >= 0.0 {
            power_dc / self.effc
        } else {
            power_dc * self.effd
        }
    }
}
