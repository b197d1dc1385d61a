/// Simulation clock for timestep management.
pub mod clock;
pub mod engine;
pub mod kpi;
/// AC setpoint profiles.
pub mod profile;
pub mod types;
