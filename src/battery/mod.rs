//! Battery pack model: cell interface, datasheet properties, state and the
//! pack-level transition logic.

pub mod cell;
pub mod format;
/// Pack model scaling a cell by its series/parallel circuit.
pub mod pack;
pub mod properties;
pub mod state;

pub use cell::CellType;
pub use format::CellFormat;
pub use pack::{Battery, BatteryOptions, Circuit, InitialState};
pub use properties::{ElectricalCellProperties, ThermalCellProperties};
pub use state::BatteryState;
