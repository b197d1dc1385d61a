//! Integration tests for scenario-driven simulation runs.

mod common;

use std::path::Path;

use common::assert_close;
use simses::config::{ScenarioConfig, ScenarioError};
use simses::io::export::{export_csv, export_kpi_json};
use simses::sim::engine::Engine;
use simses::sim::kpi::KpiReport;
use simses::sim::types::StepResult;

fn scenario(path: &str) -> ScenarioConfig {
    ScenarioConfig::from_toml_file(Path::new(path)).unwrap()
}

fn run(engine: &mut Engine) -> (Vec<StepResult>, KpiReport) {
    let results = engine.run();
    let kpi = KpiReport::from_results(
        &results,
        engine.config().dt_hours(),
        engine.battery().nominal_energy_capacity(),
    );
    (results, kpi)
}

/// Daily NMC preset shortened to one day.
fn nmc_one_day(seed: u64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::nmc_daily();
    cfg.simulation.duration_s = 86_400.0;
    cfg.simulation.seed = seed;
    cfg
}

#[test]
fn scenario_files_validate() {
    for path in ["scenarios/lfp_home.toml", "scenarios/nmc_series.toml"] {
        let errors = scenario(path).validate();
        assert!(errors.is_empty(), "{path}: {errors:?}");
    }
}

#[test]
fn presets_build_engines() {
    for name in ScenarioConfig::PRESETS {
        let cfg = ScenarioConfig::from_preset(name).unwrap();
        assert!(cfg.validate().is_empty(), "{name}");
        assert!(cfg.build_engine().is_ok(), "{name}");
    }
}

#[test]
fn segment_profile_drives_setpoints() {
    let mut engine = scenario("scenarios/lfp_home.toml").build_engine().unwrap();
    let (results, _) = run(&mut engine);

    assert_eq!(results.len(), 300);
    assert_eq!(results[0].time_s, 0.0);
    assert_eq!(results[0].power_setpoint_w, 2000.0);
    assert_eq!(results[119].power_setpoint_w, 2000.0);
    assert_eq!(results[120].power_setpoint_w, 0.0);
    assert_eq!(results[180].power_setpoint_w, -2000.0);
    // the profile does not repeat
    assert_eq!(results[290].power_setpoint_w, 0.0);
}

#[test]
fn power_balance_holds_every_step() {
    let mut engine = scenario("scenarios/lfp_home.toml").build_engine().unwrap();
    let (results, _) = run(&mut engine);
    for r in &results {
        assert_close(r.power_ac_w - r.converter_loss_w, r.power_dc_w, 1e-6);
        assert!(r.converter_loss_w >= 0.0, "step {}: loss {}", r.timestep, r.converter_loss_w);
        assert!(r.battery_loss_w >= 0.0);
    }
}

#[test]
fn feasible_cycle_meets_every_setpoint() {
    let mut engine = scenario("scenarios/lfp_home.toml").build_engine().unwrap();
    let (results, kpi) = run(&mut engine);

    assert!(kpi.unmet_energy_wh < 1.0, "unmet {}", kpi.unmet_energy_wh);
    assert!(
        kpi.round_trip_efficiency > 0.7 && kpi.round_trip_efficiency < 0.95,
        "rte {}",
        kpi.round_trip_efficiency
    );
    assert!(kpi.final_soc > 0.3 && kpi.final_soc < 0.4, "final soc {}", kpi.final_soc);
    assert!(kpi.full_equivalent_cycles > 0.3 && kpi.full_equivalent_cycles < 0.5);

    let peak = results.iter().map(|r| r.soc).fold(0.0, f64::max);
    assert!(peak > 0.6 && peak < 0.75, "peak soc {peak}");
}

#[test]
fn battery_ages_and_warms_under_load() {
    let mut engine = scenario("scenarios/lfp_home.toml").build_engine().unwrap();
    let (results, kpi) = run(&mut engine);

    assert!(kpi.final_soh_q < 1.0);
    assert!(kpi.final_soh_r > 1.0);
    assert!(kpi.max_temperature_k > 298.15);
    assert!(results.windows(2).all(|w| w[1].soh_q <= w[0].soh_q));
}

#[test]
fn soc_window_respected_when_profile_overdrives() {
    let mut engine = scenario("scenarios/nmc_series.toml").build_engine().unwrap();
    let (results, kpi) = run(&mut engine);

    assert_eq!(results.len(), 288);
    for r in &results {
        assert!(r.soc >= 0.05 - 1e-9 && r.soc <= 0.95 + 1e-9, "step {}: soc {}", r.timestep, r.soc);
        assert!(r.voltage_v <= 14.0 * 4.15 + 1e-6);
    }
    // the series asks for more energy than the pack holds
    assert!(kpi.unmet_energy_wh > 1000.0, "unmet {}", kpi.unmet_energy_wh);
}

#[test]
fn seeded_runs_are_deterministic() {
    let mut a = nmc_one_day(7).build_engine().unwrap();
    let mut b = nmc_one_day(7).build_engine().unwrap();
    let (ra, _) = run(&mut a);
    let (rb, _) = run(&mut b);
    assert_eq!(ra, rb);
}

#[test]
fn different_seeds_change_noisy_setpoints() {
    let mut a = nmc_one_day(1).build_engine().unwrap();
    let mut b = nmc_one_day(2).build_engine().unwrap();
    let (ra, _) = run(&mut a);
    let (rb, _) = run(&mut b);
    assert!(
        ra.iter()
            .zip(&rb)
            .any(|(x, y)| x.power_setpoint_w != y.power_setpoint_w)
    );
}

#[test]
fn invalid_scenario_reports_all_errors() {
    let cfg = ScenarioConfig::from_toml_str(
        r#"
        [simulation]
        dt_s = 0.0

        [battery]
        cell = "lead_acid"
        start_soc = 1.5
        "#,
    )
    .unwrap();
    match cfg.build_engine() {
        Err(ScenarioError::Invalid(errors)) => {
            assert!(errors.len() >= 3, "{errors:?}");
            assert!(errors.iter().any(|e| e.field == "simulation.dt_s"));
            assert!(errors.iter().any(|e| e.field == "battery.cell"));
            assert!(errors.iter().any(|e| e.field == "battery.start_soc"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid scenario accepted"),
    }
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ScenarioConfig::from_toml_str("[battery]\nvoltage = 48.0\n");
    assert!(err.is_err());
}

#[test]
fn missing_series_file_is_a_model_error() {
    let mut cfg = scenario("scenarios/nmc_series.toml");
    cfg.profile.series_path = Some("data/does_not_exist.csv".to_string());
    assert!(matches!(cfg.build_engine(), Err(ScenarioError::Model(_))));
}

#[test]
fn data_paths_resolve_next_to_scenario_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("setpoints.csv"), "power_w\n500.0\n-500.0\n").unwrap();
    let scenario_path = dir.path().join("series.toml");
    std::fs::write(
        &scenario_path,
        "[simulation]\ndt_s = 60.0\nduration_s = 7200.0\n\n\
         [profile]\nkind = \"series\"\nseries_path = \"setpoints.csv\"\nseries_dt_s = 3600.0\n",
    )
    .unwrap();

    let cfg = ScenarioConfig::from_toml_file(&scenario_path).unwrap();
    let mut engine = cfg.build_engine().unwrap();
    let (results, _) = run(&mut engine);
    assert_eq!(results.len(), 120);
    assert_eq!(results[0].power_setpoint_w, 500.0);
    assert_eq!(results[60].power_setpoint_w, -500.0);
}

#[test]
fn exports_round_out_a_run() {
    let mut engine = scenario("scenarios/lfp_home.toml").build_engine().unwrap();
    let (results, kpi) = run(&mut engine);

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("telemetry.csv");
    let json_path = dir.path().join("kpi.json");
    export_csv(&results, &csv_path).unwrap();
    export_kpi_json(&kpi, &json_path).unwrap();

    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 13);
    assert_eq!(rdr.records().count(), results.len());

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let soc = json["final_soc"].as_f64().unwrap();
    assert_close(soc, kpi.final_soc, 1e-12);
}
