//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::battery::{Battery, BatteryOptions, CellType, Circuit, InitialState};
use crate::converter::Converter;
use crate::degradation::DegradationModel;
use crate::error::SimError;
use crate::model::cell::{Samsung94AhNmc, SonyLfp};
use crate::model::converter::{ConverterLoss, EfficiencyCurve, FixedEfficiency, SinamicsS120Fit};
use crate::model::degradation::{SonyLfpCalendarDegradation, SonyLfpCyclicDegradation};
use crate::sim::engine::Engine;
use crate::sim::profile::{PowerProfile, Segment};
use crate::sim::types::SimConfig;

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections fall back to a 14s1p NMC pack behind a 5 kW converter,
/// cycled at 2.5 kW. Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a preset
/// with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub battery: BatteryConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub thermal: ThermalConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Simulation timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timestep in seconds (must be > 0).
    pub dt_s: f64,
    /// Simulated duration in seconds (must be >= 0, at most [`MAX_STEPS`] steps).
    pub duration_s: f64,
    /// Seed for profile noise.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_s: 60.0,
            duration_s: 86_400.0,
            seed: 42,
        }
    }
}

/// Battery pack parameters.
///
/// The circuit is either given directly (`serial`, `parallel`) or sized
/// from `target_voltage` and `target_energy_wh` when both are set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Cell model: `"samsung94ah_nmc"` or `"sony_lfp"`.
    pub cell: String,
    pub serial: u32,
    pub parallel: u32,
    /// Target pack voltage (V) for automatic sizing.
    pub target_voltage: Option<f64>,
    /// Target pack energy (Wh) for automatic sizing.
    pub target_energy_wh: Option<f64>,
    /// Initial SOC (p.u.).
    pub start_soc: f64,
    /// Initial temperature (K); ambient when unset.
    pub start_temperature: Option<f64>,
    pub start_soh_q: f64,
    pub start_soh_r: f64,
    pub soc_min: f64,
    pub soc_max: f64,
    /// Pack voltage (V) where charge current derating begins.
    pub charge_derate_voltage_start: Option<f64>,
    /// Pack voltage (V) where discharge current derating begins.
    pub discharge_derate_voltage_start: Option<f64>,
    /// Aging model: `"none"`, `"sony_lfp"`, `"sony_lfp_calendar"` or
    /// `"sony_lfp_cyclic"`.
    pub degradation: String,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            cell: "samsung94ah_nmc".to_string(),
            serial: 14,
            parallel: 1,
            target_voltage: None,
            target_energy_wh: None,
            start_soc: 0.5,
            start_temperature: None,
            start_soh_q: 1.0,
            start_soh_r: 1.0,
            soc_min: 0.0,
            soc_max: 1.0,
            charge_derate_voltage_start: None,
            discharge_derate_voltage_start: None,
            degradation: "none".to_string(),
        }
    }
}

/// Converter parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Loss model: `"fixed"`, `"sinamics_s120_fit"` or `"curve"`.
    pub model: String,
    /// Rated power in W, both directions.
    pub max_power_w: f64,
    /// Charging efficiency for `"fixed"` (p.u.).
    pub efficiency: f64,
    /// Discharging efficiency for `"fixed"`; defaults to `efficiency`.
    pub discharge_efficiency: Option<f64>,
    /// Efficiency curve CSV for `"curve"`; the bundled curve when unset.
    pub curve_path: Option<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            model: "fixed".to_string(),
            max_power_w: 5_000.0,
            efficiency: 0.95,
            discharge_efficiency: None,
            curve_path: None,
        }
    }
}

/// Thermal environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalConfig {
    /// Ambient temperature in K.
    pub ambient_temperature: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            ambient_temperature: 298.15,
        }
    }
}

/// AC setpoint profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// `"segments"` or `"series"`.
    pub kind: String,
    /// Loop the segments.
    pub repeat: bool,
    pub segments: Vec<Segment>,
    /// CSV with a `power_w` column, for `"series"`.
    pub series_path: Option<String>,
    /// Sample interval of the series in seconds; the simulation timestep when unset.
    pub series_dt_s: Option<f64>,
    /// Standard deviation of setpoint noise in W (0 disables noise).
    pub noise_std_w: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            kind: "segments".to_string(),
            repeat: true,
            segments: vec![
                Segment {
                    duration_s: 3600.0,
                    power_w: 2_500.0,
                },
                Segment {
                    duration_s: 1800.0,
                    power_w: 0.0,
                },
                Segment {
                    duration_s: 3600.0,
                    power_w: -2_500.0,
                },
                Segment {
                    duration_s: 1800.0,
                    power_w: 0.0,
                },
            ],
            series_path: None,
            series_dt_s: None,
            noise_std_w: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.dt_s"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Failure to turn a scenario into a runnable engine.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid scenario: {} config error(s)", .0.len())]
    Invalid(Vec<ConfigError>),

    #[error(transparent)]
    Model(#[from] SimError),
}

/// Upper bound on the number of timesteps in one run.
pub const MAX_STEPS: usize = 100_000_000;

const CELLS: &[&str] = &["samsung94ah_nmc", "sony_lfp"];
const DEGRADATIONS: &[&str] = &["none", "sony_lfp", "sony_lfp_calendar", "sony_lfp_cyclic"];
const CONVERTERS: &[&str] = &["fixed", "sinamics_s120_fit", "curve"];
const PROFILES: &[&str] = &["segments", "series"];

impl ScenarioConfig {
    /// Returns the development scenario: a 96 kWh Sony LFP pack charged
    /// from empty at 25 kW for four hours and discharged for four.
    pub fn dev() -> Self {
        Self {
            simulation: SimulationConfig {
                dt_s: 60.0,
                duration_s: 8.0 * 3600.0,
                ..SimulationConfig::default()
            },
            battery: BatteryConfig {
                cell: "sony_lfp".to_string(),
                target_voltage: Some(320.0),
                target_energy_wh: Some(96_000.0),
                start_soc: 0.0,
                degradation: "sony_lfp".to_string(),
                ..BatteryConfig::default()
            },
            converter: ConverterConfig {
                max_power_w: 30_000.0,
                ..ConverterConfig::default()
            },
            thermal: ThermalConfig::default(),
            profile: ProfileConfig {
                repeat: false,
                segments: vec![
                    Segment {
                        duration_s: 4.0 * 3600.0,
                        power_w: 25_000.0,
                    },
                    Segment {
                        duration_s: 4.0 * 3600.0,
                        power_w: -25_000.0,
                    },
                ],
                ..ProfileConfig::default()
            },
        }
    }

    /// Returns a week of daily arbitrage on a ~1 MWh NMC pack behind a
    /// Sinamics inverter, with noisy setpoints.
    pub fn nmc_daily() -> Self {
        let hours = |h: f64| h * 3600.0;
        Self {
            simulation: SimulationConfig {
                dt_s: 300.0,
                duration_s: 7.0 * 86_400.0,
                seed: 7,
            },
            battery: BatteryConfig {
                cell: "samsung94ah_nmc".to_string(),
                target_voltage: Some(800.0),
                target_energy_wh: Some(1.0e6),
                start_soc: 0.2,
                soc_min: 0.05,
                soc_max: 0.95,
                charge_derate_voltage_start: Some(880.0),
                ..BatteryConfig::default()
            },
            converter: ConverterConfig {
                model: "sinamics_s120_fit".to_string(),
                max_power_w: 500_000.0,
                ..ConverterConfig::default()
            },
            thermal: ThermalConfig {
                ambient_temperature: 293.15,
            },
            profile: ProfileConfig {
                kind: "segments".to_string(),
                repeat: true,
                segments: vec![
                    Segment {
                        duration_s: hours(6.0),
                        power_w: 0.0,
                    },
                    Segment {
                        duration_s: hours(4.0),
                        power_w: 200_000.0,
                    },
                    Segment {
                        duration_s: hours(4.0),
                        power_w: 0.0,
                    },
                    Segment {
                        duration_s: hours(4.0),
                        power_w: -200_000.0,
                    },
                    Segment {
                        duration_s: hours(6.0),
                        power_w: 0.0,
                    },
                ],
                noise_std_w: 5_000.0,
                ..ProfileConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["dev", "nmc_daily"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "dev" => Ok(Self::dev()),
            "nmc_daily" => Ok(Self::nmc_daily()),
            _ => Err(ConfigError::new(
                "preset",
                format!("unknown preset \"{name}\", available: {}", Self::PRESETS.join(", ")),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative `curve_path` and `series_path` entries are resolved against
    /// the directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display())))?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            cfg.resolve_paths(dir);
        }
        Ok(cfg)
    }

    /// Rebases relative data file paths onto `dir`.
    pub fn resolve_paths(&mut self, dir: &Path) {
        let rebase = |p: &mut Option<String>| {
            let joined = match p.as_deref() {
                Some(rel) if Path::new(rel).is_relative() => dir.join(rel),
                _ => return,
            };
            *p = Some(joined.to_string_lossy().into_owned());
        };
        rebase(&mut self.converter.curve_path);
        rebase(&mut self.profile.series_path);
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Limits that
    /// depend on the built pack (derating voltages) are checked when the
    /// battery is constructed.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError::new(field, message));
            }
        };

        let s = &self.simulation;
        let dt_ok = s.dt_s.is_finite() && s.dt_s > 0.0;
        check(dt_ok, "simulation.dt_s", "must be finite and > 0");
        check(
            s.duration_s.is_finite() && s.duration_s >= 0.0,
            "simulation.duration_s",
            "must be finite and >= 0",
        );
        if dt_ok && s.duration_s.is_finite() {
            check(
                (s.duration_s / s.dt_s).round() <= MAX_STEPS as f64,
                "simulation.duration_s",
                "run exceeds the maximum number of timesteps",
            );
        }

        check(
            self.thermal.ambient_temperature > 0.0,
            "thermal.ambient_temperature",
            "must be > 0 K",
        );

        let bat = &self.battery;
        check(
            CELLS.contains(&bat.cell.as_str()),
            "battery.cell",
            "must be \"samsung94ah_nmc\" or \"sony_lfp\"",
        );
        match (bat.target_voltage, bat.target_energy_wh) {
            (Some(v), Some(e)) => {
                check(v > 0.0, "battery.target_voltage", "must be > 0");
                check(e > 0.0, "battery.target_energy_wh", "must be > 0");
            }
            (None, None) => {
                check(bat.serial > 0, "battery.serial", "must be > 0");
                check(bat.parallel > 0, "battery.parallel", "must be > 0");
            }
            _ => check(
                false,
                "battery.target_voltage",
                "target_voltage and target_energy_wh must be set together",
            ),
        }
        check(
            0.0 <= bat.soc_min && bat.soc_min < bat.soc_max && bat.soc_max <= 1.0,
            "battery.soc_min",
            "must satisfy 0 <= soc_min < soc_max <= 1",
        );
        check(
            (bat.soc_min..=bat.soc_max).contains(&bat.start_soc),
            "battery.start_soc",
            "must be within [soc_min, soc_max]",
        );
        check(
            bat.start_temperature.is_none_or(|t| t > 0.0),
            "battery.start_temperature",
            "must be > 0 K",
        );
        check(
            bat.start_soh_q > 0.0 && bat.start_soh_r > 0.0,
            "battery.start_soh_q",
            "state of health must be > 0",
        );
        check(
            DEGRADATIONS.contains(&bat.degradation.as_str()),
            "battery.degradation",
            "must be \"none\", \"sony_lfp\", \"sony_lfp_calendar\" or \"sony_lfp_cyclic\"",
        );

        let conv = &self.converter;
        check(
            CONVERTERS.contains(&conv.model.as_str()),
            "converter.model",
            "must be \"fixed\", \"sinamics_s120_fit\" or \"curve\"",
        );
        check(conv.max_power_w > 0.0, "converter.max_power_w", "must be > 0");
        check(
            conv.efficiency > 0.0 && conv.efficiency <= 1.0,
            "converter.efficiency",
            "must be in (0, 1]",
        );
        check(
            conv.discharge_efficiency.is_none_or(|e| e > 0.0 && e <= 1.0),
            "converter.discharge_efficiency",
            "must be in (0, 1]",
        );

        let p = &self.profile;
        check(
            PROFILES.contains(&p.kind.as_str()),
            "profile.kind",
            "must be \"segments\" or \"series\"",
        );
        if p.kind == "segments" {
            check(!p.segments.is_empty(), "profile.segments", "needs at least one segment");
            check(
                p.segments.iter().all(|seg| seg.duration_s > 0.0),
                "profile.segments",
                "segment durations must be > 0",
            );
        }
        if p.kind == "series" {
            check(p.series_path.is_some(), "profile.series_path", "required for a series profile");
        }
        check(
            p.series_dt_s.is_none_or(|dt| dt > 0.0),
            "profile.series_dt_s",
            "must be > 0",
        );
        check(p.noise_std_w >= 0.0, "profile.noise_std_w", "must be >= 0");

        errors
    }

    /// Validates the scenario and wires it into a ready-to-run engine.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Invalid` with all validation errors, or
    /// `ScenarioError::Model` if a model cannot be built (data files,
    /// derating voltages outside the pack window, ...).
    pub fn build_engine(&self) -> Result<Engine, ScenarioError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ScenarioError::Invalid(errors));
        }

        let sim_config = SimConfig::new(
            self.simulation.dt_s,
            self.simulation.duration_s,
            self.thermal.ambient_temperature,
        );
        let battery = self.build_battery()?;
        info!(
            cell = battery.cell().name(),
            serial = battery.circuit().serial,
            parallel = battery.circuit().parallel,
            energy_wh = battery.nominal_energy_capacity(),
            "battery built"
        );
        let system = Converter::new(self.build_loss_model()?, self.converter.max_power_w, battery)?;
        let profile = self.build_profile()?;
        Ok(Engine::new(sim_config, system, profile))
    }

    fn build_battery(&self) -> Result<Battery, SimError> {
        let bat = &self.battery;
        let cell: Box<dyn CellType> = match bat.cell.as_str() {
            "sony_lfp" => Box::new(SonyLfp::new()?),
            _ => Box::new(Samsung94AhNmc::new()),
        };
        let circuit = match (bat.target_voltage, bat.target_energy_wh) {
            (Some(v), Some(e)) => Circuit::from_targets(cell.as_ref(), v, e)?,
            _ => Circuit::new(bat.serial, bat.parallel),
        };
        let initial = InitialState {
            soc: bat.start_soc,
            temperature: bat.start_temperature.unwrap_or(self.thermal.ambient_temperature),
            soh_q: bat.start_soh_q,
            soh_r: bat.start_soh_r,
        };
        let options = BatteryOptions {
            soc_limits: (bat.soc_min, bat.soc_max),
            charge_derate_voltage_start: bat.charge_derate_voltage_start,
            discharge_derate_voltage_start: bat.discharge_derate_voltage_start,
        };
        let battery = Battery::new(cell, circuit, initial, options)?;

        let degradation = match bat.degradation.as_str() {
            "sony_lfp" => Some(DegradationModel::new(
                Box::new(SonyLfpCalendarDegradation::new()),
                Box::new(SonyLfpCyclicDegradation::new()),
                bat.start_soc,
            )),
            "sony_lfp_calendar" => Some(DegradationModel::calendar_only(
                Box::new(SonyLfpCalendarDegradation::new()),
                bat.start_soc,
            )),
            "sony_lfp_cyclic" => Some(DegradationModel::cyclic_only(
                Box::new(SonyLfpCyclicDegradation::new()),
                bat.start_soc,
            )),
            _ => None,
        };
        Ok(match degradation {
            Some(d) => battery.with_degradation(d),
            None => battery,
        })
    }

    fn build_loss_model(&self) -> Result<ConverterLoss, SimError> {
        let conv = &self.converter;
        Ok(match conv.model.as_str() {
            "sinamics_s120_fit" => ConverterLoss::SinamicsS120Fit(SinamicsS120Fit::new()?),
            "curve" => ConverterLoss::Curve(match &conv.curve_path {
                Some(path) => EfficiencyCurve::from_path(path)?,
                None => EfficiencyCurve::bundled()?,
            }),
            _ => ConverterLoss::Fixed(FixedEfficiency::asymmetric(
                conv.efficiency,
                conv.discharge_efficiency.unwrap_or(conv.efficiency),
            )),
        })
    }

    fn build_profile(&self) -> Result<PowerProfile, SimError> {
        let p = &self.profile;
        let profile = match (p.kind.as_str(), &p.series_path) {
            ("series", Some(path)) => {
                PowerProfile::series_from_path(path, p.series_dt_s.unwrap_or(self.simulation.dt_s))?
            }
            _ => {
                let profile = PowerProfile::segments(p.segments.clone())?;
                if p.repeat { profile.repeating() } else { profile }
            }
        };
        Ok(profile.with_noise(p.noise_std_w, self.simulation.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_valid() {
        let errors = ScenarioConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err_and(|e| e.message.contains("unknown preset")));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
dt_s = 30.0
duration_s = 7200.0
seed = 3

[battery]
cell = "sony_lfp"
serial = 16
parallel = 4
start_soc = 0.4
soc_min = 0.1
soc_max = 0.9
degradation = "sony_lfp_calendar"

[converter]
model = "fixed"
max_power_w = 2000.0
efficiency = 0.96
discharge_efficiency = 0.94

[thermal]
ambient_temperature = 303.15

[profile]
kind = "segments"
repeat = false
segments = [
    { duration_s = 3600.0, power_w = 1000.0 },
    { duration_s = 3600.0, power_w = -1000.0 },
]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.battery.serial), Some(16));
        assert_eq!(cfg.as_ref().map(|c| c.profile.segments.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.converter.discharge_efficiency), Some(Some(0.94)));
        assert!(cfg.is_some_and(|c| c.validate().is_empty()));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
cell = "sony_lfp"
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.dt_s), Some(60.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.cell.as_str()), Some("samsung94ah_nmc"));
    }

    #[test]
    fn validation_catches_bad_fields() {
        let mut cfg = ScenarioConfig::default();
        cfg.simulation.dt_s = 0.0;
        cfg.battery.cell = "lead_acid".to_string();
        cfg.battery.start_soc = 1.5;
        cfg.converter.model = "magic".to_string();
        cfg.profile.segments.clear();
        let errors = cfg.validate();
        for field in [
            "simulation.dt_s",
            "battery.cell",
            "battery.start_soc",
            "converter.model",
            "profile.segments",
        ] {
            assert!(errors.iter().any(|e| e.field == field), "missing {field}: {errors:?}");
        }
    }

    #[test]
    fn validation_rejects_unbounded_runs() {
        for (dt, duration) in [(60.0, f64::INFINITY), (60.0, f64::NAN), (f64::INFINITY, 3600.0), (1.0, 1e300)] {
            let mut cfg = ScenarioConfig::default();
            cfg.simulation.dt_s = dt;
            cfg.simulation.duration_s = duration;
            assert!(
                matches!(cfg.build_engine(), Err(ScenarioError::Invalid(_))),
                "dt={dt} duration={duration} accepted"
            );
        }
    }

    #[test]
    fn relative_paths_follow_scenario_directory() {
        let mut cfg = ScenarioConfig::default();
        cfg.profile.series_path = Some("setpoints.csv".to_string());
        cfg.converter.curve_path = Some("/abs/curve.csv".to_string());
        cfg.resolve_paths(Path::new("scenarios"));
        let expected = Path::new("scenarios").join("setpoints.csv");
        assert_eq!(cfg.profile.series_path.as_deref(), expected.to_str());
        assert_eq!(cfg.converter.curve_path.as_deref(), Some("/abs/curve.csv"));
    }

    #[test]
    fn validation_requires_both_targets() {
        let mut cfg = ScenarioConfig::default();
        cfg.battery.target_voltage = Some(400.0);
        assert!(cfg.validate().iter().any(|e| e.field == "battery.target_voltage"));
    }

    #[test]
    fn series_profile_needs_path() {
        let mut cfg = ScenarioConfig::default();
        cfg.profile.kind = "series".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "profile.series_path"));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let mut cfg = ScenarioConfig::default();
        cfg.converter.max_power_w = -1.0;
        assert!(matches!(cfg.build_engine(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn build_reports_model_errors() {
        let mut cfg = ScenarioConfig::default();
        cfg.battery.charge_derate_voltage_start = Some(1.0);
        assert!(matches!(cfg.build_engine(), Err(ScenarioError::Model(_))));
    }

    #[test]
    fn dev_preset_sizes_pack_from_targets() {
        let engine = ScenarioConfig::dev().build_engine();
        assert!(engine.is_ok(), "{:?}", engine.as_ref().err());
        let engine = engine.ok();
        let circuit = engine.as_ref().map(|e| e.battery().circuit());
        assert_eq!(circuit, Some(Circuit::new(100, 100)));
        assert!(engine.is_some_and(|e| e.battery().degradation().is_some()));
    }
}
