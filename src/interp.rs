//! Table interpolation used by data-driven cell and converter models.

use crate::error::SimError;

/// Piecewise-linear interpolation over a strictly increasing axis.
///
/// Queries outside the axis are extrapolated linearly from the first or
/// last segment.
///
/// # Examples
///
/// ```
/// use simses::interp::Interp1d;
///
/// let f = Interp1d::new(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 30.0]).unwrap();
/// assert_eq!(f.eval(0.5), 5.0);
/// assert_eq!(f.eval(1.5), 20.0);
/// assert_eq!(f.eval(3.0), 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct Interp1d {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Interp1d {
    /// Builds an interpolant from sample points.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidData` if the vectors differ in length, hold
    /// fewer than two points, or `x` is not strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, SimError> {
        if x.len() != y.len() {
            return Err(SimError::InvalidData(format!(
                "axis length {} does not match value length {}",
                x.len(),
                y.len()
            )));
        }
        check_axis(&x)?;
        Ok(Self { x, y })
    }

    /// Evaluates the interpolant at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let k = segment(&self.x, x);
        let (x0, x1) = (self.x[k], self.x[k + 1]);
        let (y0, y1) = (self.y[k], self.y[k + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// Returns the interpolant with axis and values swapped.
    ///
    /// Only valid for strictly increasing values, which is checked.
    pub fn inverse(&self) -> Result<Self, SimError> {
        Self::new(self.y.clone(), self.x.clone())
    }
}

/// Bilinear interpolation on a regular 2-D grid.
///
/// Queries are clamped to the grid bounds, so the table edges hold outside
/// the measured range.
#[derive(Debug, Clone)]
pub struct Grid2d {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Row-major values, `values[i * y.len() + j]` belongs to `(x[i], y[j])`.
    values: Vec<f64>,
}

impl Grid2d {
    /// Builds a grid interpolant.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidData` if either axis is not strictly
    /// increasing or the value count does not equal `x.len() * y.len()`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<f64>) -> Result<Self, SimError> {
        check_axis(&x)?;
        check_axis(&y)?;
        if values.len() != x.len() * y.len() {
            return Err(SimError::InvalidData(format!(
                "grid of {}x{} needs {} values, got {}",
                x.len(),
                y.len(),
                x.len() * y.len(),
                values.len()
            )));
        }
        Ok(Self { x, y, values })
    }

    /// Evaluates the grid at `(x, y)`.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let x = clamp_to(&self.x, x);
        let y = clamp_to(&self.y, y);
        let i = segment(&self.x, x);
        let j = segment(&self.y, y);

        let tx = (x - self.x[i]) / (self.x[i + 1] - self.x[i]);
        let ty = (y - self.y[j]) / (self.y[j + 1] - self.y[j]);

        let v00 = self.at(i, j);
        let v01 = self.at(i, j + 1);
        let v10 = self.at(i + 1, j);
        let v11 = self.at(i + 1, j + 1);

        let v0 = v00 + (v01 - v00) * ty;
        let v1 = v10 + (v11 - v10) * ty;
        v0 + (v1 - v0) * tx
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.y.len() + j]
    }
}

fn check_axis(axis: &[f64]) -> Result<(), SimError> {
    if axis.len() < 2 {
        return Err(SimError::InvalidData(format!(
            "interpolation axis needs at least 2 points, got {}",
            axis.len()
        )));
    }
    if axis.windows(2).any(|w| w[1] <= w[0] || !w[0].is_finite() || !w[1].is_finite()) {
        return Err(SimError::InvalidData(
            "interpolation axis must be finite and strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// Index of the segment `[axis[k], axis[k + 1]]` used for `x`.
fn segment(axis: &[f64], x: f64) -> usize {
    let k = axis.partition_point(|&a| a <= x);
    k.saturating_sub(1).min(axis.len() - 2)
}

fn clamp_to(axis: &[f64], x: f64) -> f64 {
    x.clamp(axis[0], axis[axis.len() - 1])
}
