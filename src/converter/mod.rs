//! AC/DC power electronics between the grid side and a storage system.

use tracing::debug;

use crate::error::SimError;

/// Relative deviation between requested and delivered DC power above which
/// the AC power is re-derived from what the storage actually delivered.
const FULFILMENT_TOLERANCE: f64 = 0.01;

/// Converter state after the most recent update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterState {
    /// Requested AC power in W.
    pub power_setpoint: f64,
    /// Realised AC power in W.
    pub power: f64,
    /// Conversion loss in W (`power - dc power`).
    pub loss: f64,
}

/// Conversion characteristic on power normalised to the converter rating.
///
/// Positive values charge the storage. Both directions must be monotonic
/// and (approximately) inverse to each other.
pub trait LossModel {
    /// DC power drawn/delivered for a given AC power, both in p.u.
    fn ac_to_dc(&self, power_ac: f64) -> f64;

    /// AC power for a given DC power, both in p.u.
    fn dc_to_ac(&self, power_dc: f64) -> f64;
}

/// Anything that can absorb or deliver DC power over a timestep.
pub trait Storage {
    /// Requests `power_setpoint` W for `dt` seconds.
    fn update(&mut self, power_setpoint: f64, dt: f64);

    /// DC power in W actually realised in the last update.
    fn power(&self) -> f64;
}

/// A bidirectional converter feeding a storage system.
#[derive(Debug)]
pub struct Converter<M, S> {
    max_power: f64,
    model: M,
    storage: S,
    /// State after the most recent update.
    pub state: ConverterState,
}

impl<M: LossModel, S: Storage> Converter<M, S> {
    /// Creates a converter rated at `max_power` W in both directions.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if `max_power` is not positive.
    pub fn new(model: M, max_power: f64, storage: S) -> Result<Self, SimError> {
        if !(max_power > 0.0 && max_power.is_finite()) {
            return Err(SimError::invalid("max_power", format!("must be > 0, got {max_power}")));
        }
        Ok(Self {
            max_power,
            model,
            storage,
            state: ConverterState::default(),
        })
    }

    /// Advances converter and storage by one timestep.
    ///
    /// The AC setpoint is clamped to the rating and converted to DC. When
    /// the storage cannot follow the DC request (more than 1 % off), the
    /// AC power is recomputed from the delivered DC power.
    pub fn update(&mut self, power_setpoint: f64, dt: f64) {
        let mut power_ac = power_setpoint.clamp(-self.max_power, self.max_power);
        let mut power_dc = self.ac_to_dc(power_ac);

        self.storage.update(power_dc, dt);
        let power_storage = self.storage.power();

        if power_dc != 0.0 && (power_dc - power_storage).abs() / power_dc.abs() > FULFILMENT_TOLERANCE {
            debug!(
                requested_dc = power_dc,
                delivered_dc = power_storage,
                "storage did not fulfil dc request"
            );
            power_dc = power_storage;
            power_ac = self.dc_to_ac(power_dc);
        }

        self.state = ConverterState {
            power_setpoint,
            power: power_ac,
            loss: power_ac - power_dc,
        };
    }

    /// DC power in W for an AC power in W.
    pub fn ac_to_dc(&self, power_ac: f64) -> f64 {
        self.model.ac_to_dc(power_ac / self.max_power) * self.max_power
    }

    /// AC power in W for a DC power in W.
    pub fn dc_to_ac(&self, power_dc: f64) -> f64 {
        self.model.dc_to_ac(power_dc / self.max_power) * self.max_power
    }

    pub fn max_power(&self) -> f64 {
        self.max_power
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
