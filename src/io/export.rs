//! CSV export of step results and JSON export of the KPI summary.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::kpi::KpiReport;
use crate::sim::types::StepResult;

/// Column header for CSV telemetry export.
const HEADER: &str = "timestep,time_s,power_setpoint_w,power_ac_w,converter_loss_w,\
                      power_dc_w,battery_loss_w,voltage_v,current_a,soc,\
                      temperature_k,soh_q,soh_r";

/// Exports simulation results to a CSV file at the given path.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.1}", r.time_s),
            format!("{:.3}", r.power_setpoint_w),
            format!("{:.3}", r.power_ac_w),
            format!("{:.3}", r.converter_loss_w),
            format!("{:.3}", r.power_dc_w),
            format!("{:.3}", r.battery_loss_w),
            format!("{:.4}", r.voltage_v),
            format!("{:.4}", r.current_a),
            format!("{:.6}", r.soc),
            format!("{:.3}", r.temperature_k),
            format!("{:.8}", r.soh_q),
            format!("{:.8}", r.soh_r),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the KPI report as pretty-printed JSON to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialisation or writing fails.
pub fn export_kpi_json(kpi: &KpiReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_kpi_json(kpi, io::BufWriter::new(file))
}

/// Writes the KPI report as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialisation or writing fails.
pub fn write_kpi_json(kpi: &KpiReport, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, kpi)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(t: usize) -> StepResult {
        StepResult {
            timestep: t,
            time_s: t as f64 * 60.0,
            power_setpoint_w: 1000.0,
            power_ac_w: 1000.0,
            converter_loss_w: 50.0,
            power_dc_w: 950.0,
            battery_loss_w: 1.5,
            voltage_v: 52.0,
            current_a: 18.27,
            soc: 0.5 + t as f64 * 0.001,
            temperature_k: 298.15,
            soh_q: 1.0,
            soh_r: 1.0,
        }
    }

    #[test]
    fn header_matches_columns() {
        let mut buf = Vec::new();
        write_csv(&[make_step(0)], &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        assert_eq!(
            output.lines().next(),
            Some(
                "timestep,time_s,power_setpoint_w,power_ac_w,converter_loss_w,power_dc_w,\
                 battery_loss_w,voltage_v,current_a,soc,temperature_k,soh_q,soh_r"
            )
        );
    }

    #[test]
    fn row_count_matches_step_count() {
        let results: Vec<StepResult> = (0..24).map(make_step).collect();
        let mut buf = Vec::new();
        write_csv(&results, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn rows_parse_as_numbers() {
        let results: Vec<StepResult> = (0..3).map(make_step).collect();
        let mut buf = Vec::new();
        write_csv(&results, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.unwrap();
            assert_eq!(rec.len(), 13);
            assert!(rec.iter().all(|v| v.parse::<f64>().is_ok()));
            rows += 1;
        }
        assert_eq!(rows, 3);
    }

    #[test]
    fn kpi_json_has_fields() {
        let results: Vec<StepResult> = (0..10).map(make_step).collect();
        let kpi = KpiReport::from_results(&results, 60.0 / 3600.0, 5000.0);
        let mut buf = Vec::new();
        write_kpi_json(&kpi, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["ac_energy_charged_wh"].as_f64().is_some_and(|e| (e - 1000.0 / 6.0).abs() < 1e-6));
        assert!(value["final_soc"].as_f64().is_some_and(|soc| (soc - 0.509).abs() < 1e-12));
    }
}
