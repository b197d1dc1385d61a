//! simses-lite entry point: CLI wiring, logging and config-driven runs.

use std::path::Path;
use std::process;

use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use simses::config::ScenarioConfig;
use simses::io::export::{export_csv, export_kpi_json};
use simses::sim::kpi::KpiReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    duration_override: Option<f64>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    summary_json: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("simses-lite: battery storage system simulator");
    eprintln!();
    eprintln!("Usage: simses-lite [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset ({})", ScenarioConfig::PRESETS.join(", "));
    eprintln!("  --duration <seconds>     Override simulated duration");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    eprintln!("  --summary-json <path>    Export KPI report to JSON");
    eprintln!("  --quiet                  Do not print per-step lines");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the dev preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, advancing `i`, or exits.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        duration_override: None,
        seed_override: None,
        telemetry_out: None,
        summary_json: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--duration" => {
                let v = flag_value(&args, &mut i, "a number of seconds");
                match v.parse::<f64>() {
                    Ok(d) => cli.duration_override = Some(d),
                    Err(_) => {
                        eprintln!("error: --duration value \"{v}\" is not a valid number");
                        process::exit(1);
                    }
                }
            }
            "--seed" => {
                let v = flag_value(&args, &mut i, "a u64 argument");
                match v.parse::<u64>() {
                    Ok(s) => cli.seed_override = Some(s),
                    Err(_) => {
                        eprintln!("error: --seed value \"{v}\" is not a valid u64");
                        process::exit(1);
                    }
                }
            }
            "--telemetry-out" => cli.telemetry_out = Some(flag_value(&args, &mut i, "a path argument")),
            "--summary-json" => cli.summary_json = Some(flag_value(&args, &mut i, "a path argument")),
            "--quiet" | "-q" => cli.quiet = true,
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // --scenario takes priority, then --preset, then the dev preset
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("dev"))
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Some(duration) = cli.duration_override {
        scenario.simulation.duration_s = duration;
    }
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut engine = match scenario.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let results = engine.run();
    let kpi = KpiReport::from_results(
        &results,
        engine.config().dt_hours(),
        engine.battery().nominal_energy_capacity(),
    );

    if !cli.quiet {
        for r in &results {
            println!("{r}");
        }
    }
    println!("\n{kpi}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "telemetry written");
    }

    if let Some(ref path) = cli.summary_json {
        if let Err(e) = export_kpi_json(&kpi, Path::new(path)) {
            error!("failed to write KPI summary: {e}");
            process::exit(1);
        }
        info!(path = %path, "KPI summary written");
    }
}
