//! Cell housing geometry.

use std::f64::consts::PI;

/// Geometry of a cell housing, dimensions in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellFormat {
    Prismatic { height: f64, width: f64, length: f64 },
    Round { diameter: f64, length: f64 },
}

impl CellFormat {
    /// Standard 18650 round cell.
    pub const ROUND_18650: Self = Self::Round {
        diameter: 18.0,
        length: 65.0,
    };

    /// Standard 26650 round cell.
    pub const ROUND_26650: Self = Self::Round {
        diameter: 26.0,
        length: 65.0,
    };

    /// Housing volume in m³.
    pub fn volume(&self) -> f64 {
        match *self {
            Self::Prismatic { height, width, length } => height * width * length * 1e-9,
            Self::Round { diameter, length } => PI * (diameter / 2.0).powi(2) * length * 1e-9,
        }
    }

    /// Housing surface area in m².
    ///
    /// For round cells only one end cap is counted.
    pub fn area(&self) -> f64 {
        match *self {
            Self::Prismatic { height, width, length } => {
                2.0 * (length * height + length * width + width * height) * 1e-6
            }
            Self::Round { diameter, length } => (PI * diameter * length + PI * (diameter / 2.0).powi(2)) * 1e-6,
        }
    }
}
