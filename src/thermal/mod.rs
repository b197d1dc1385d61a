//! Lumped thermal model of components in a room at constant temperature.

/// A component that exchanges heat with the room as a single thermal node.
pub trait ThermalComponent {
    /// Current temperature in K.
    fn temperature(&self) -> f64;

    fn set_temperature(&mut self, temperature: f64);

    /// Heat generated in W.
    fn heat_loss(&self) -> f64;

    /// Heat capacity in J/K.
    fn thermal_capacity(&self) -> f64;

    /// Thermal resistance to ambient in K/W.
    fn thermal_resistance(&self) -> f64;
}

/// Zero-dimensional room with constant ambient temperature.
///
/// Each component is an independent node integrated with forward Euler:
///
/// ```text
/// dT/dt = Q_loss / C_th + (T_ambient - T) / (R_th * C_th)
/// ```
///
/// The model does not own its components; they are passed to
/// [`RoomThermalModel::update`] on every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomThermalModel {
    ambient_temperature: f64,
}

impl RoomThermalModel {
    pub fn new(ambient_temperature: f64) -> Self {
        Self { ambient_temperature }
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    /// Advances every component's temperature by `dt` seconds.
    pub fn update(&self, components: &mut [&mut dyn ThermalComponent], dt: f64) {
        for component in components.iter_mut() {
            self.update_component(&mut **component, dt);
        }
    }

    /// Advances a single component's temperature by `dt` seconds.
    pub fn update_component(&self, component: &mut dyn ThermalComponent, dt: f64) {
        let t = component.temperature();
        let c_th = component.thermal_capacity();
        let r_th = component.thermal_resistance();
        let dt_dt = component.heat_loss() / c_th + (self.ambient_temperature - t) / (r_th * c_th);
        component.set_temperature(t + dt_dt * dt);
    }
}
