//! Lightweight simulation of stationary lithium-ion storage systems.
//!
//! A [`battery::Battery`] built from a [`battery::CellType`] sits behind a
//! [`converter::Converter`]; aging runs through
//! [`degradation::DegradationModel`] and heat exchange with the room
//! through [`thermal::RoomThermalModel`]. [`sim::engine::Engine`] drives
//! the whole system through a setpoint profile.

pub mod battery;
/// TOML scenarios, presets and engine construction.
pub mod config;
pub mod converter;
pub mod degradation;
pub mod error;
pub mod interp;
/// Result export.
pub mod io {
    pub mod export;
}
pub mod model;
/// Simulation engine, profiles and KPIs.
pub mod sim;
pub mod thermal;

pub use error::SimError;
