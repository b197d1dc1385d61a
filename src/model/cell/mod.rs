//! Parameterised cell models.

mod samsung94ah_nmc;
mod sony_lfp;

pub use samsung94ah_nmc::Samsung94AhNmc;
pub use sony_lfp::SonyLfp;

/// Sum of four logistic terms plus a linear term, the OCV fit shape used by
/// the bundled cells.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigmoidOcv {
    pub a: [f64; 4],
    pub b: [f64; 2],
    pub k: [f64; 6],
}

impl SigmoidOcv {
    pub fn eval(&self, soc: f64) -> f64 {
        let [a1, a2, a3, a4] = self.a;
        let [b1, b2] = self.b;
        let [k0, k1, k2, k3, k4, k5] = self.k;
        k0 + k1 / (1.0 + (a1 * (soc - b1)).exp())
            + k2 / (1.0 + (a2 * (soc - b2)).exp())
            + k3 / (1.0 + (a3 * (soc - 1.0)).exp())
            + k4 / (1.0 + (a4 * soc).exp())
            + k5 * soc
    }
}
