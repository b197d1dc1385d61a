//! Converter loss models on per-unit power.

mod efficiency_curve;
mod fixed_efficiency;
mod sinamics;

pub use efficiency_curve::EfficiencyCurve;
pub use fixed_efficiency::FixedEfficiency;
pub use sinamics::SinamicsS120Fit;

use crate::converter::LossModel;
use crate::error::SimError;
use crate::interp::Interp1d;

/// Any of the bundled loss models, selectable at runtime.
#[derive(Debug, Clone)]
pub enum ConverterLoss {
    Fixed(FixedEfficiency),
    SinamicsS120Fit(SinamicsS120Fit),
    Curve(EfficiencyCurve),
}

impl LossModel for ConverterLoss {
    fn ac_to_dc(&self, power_ac: f64) -> f64 {
        match self {
            Self::Fixed(m) => m.ac_to_dc(power_ac),
            Self::SinamicsS120Fit(m) => m.ac_to_dc(power_ac),
            Self::Curve(m) => m.ac_to_dc(power_ac),
        }
    }

    fn dc_to_ac(&self, power_dc: f64) -> f64 {
        match self {
            Self::Fixed(m) => m.dc_to_ac(power_dc),
            Self::SinamicsS120Fit(m) => m.dc_to_ac(power_dc),
            Self::Curve(m) => m.dc_to_ac(power_dc),
        }
    }
}

/// Lookup table mapping AC to DC power and back.
#[derive(Debug, Clone)]
pub(crate) struct LossTable {
    ac_to_dc: Interp1d,
    dc_to_ac: Interp1d,
}

impl LossTable {
    /// Builds the table from `(ac, dc)` pairs for positive power magnitudes.
    ///
    /// `charge` holds pairs for charging (both positive), `discharge` pairs
    /// for discharging (both negative). Both are expected in order of
    /// increasing magnitude; the origin is added.
    pub fn from_branches(charge: &[(f64, f64)], discharge: &[(f64, f64)]) -> Result<Self, SimError> {
        let points: Vec<(f64, f64)> = discharge
            .iter()
            .rev()
            .copied()
            .chain(std::iter::once((0.0, 0.0)))
            .chain(charge.iter().copied())
            .collect();
        let (ac, dc): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let ac_to_dc = Interp1d::new(ac, dc)?;
        let dc_to_ac = ac_to_dc.inverse()?;
        Ok(Self { ac_to_dc, dc_to_ac })
    }

    pub fn ac_to_dc(&self, power_ac: f64) -> f64 {
        self.ac_to_dc.eval(power_ac)
    }

    pub fn dc_to_ac(&self, power_dc: f64) -> f64 {
        self.dc_to_ac.eval(power_dc)
    }
}
