//! Post-hoc KPI computation from simulation results.

use std::fmt;

use serde::Serialize;

use super::types::StepResult;

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<StepResult>` to ensure consistency between
/// step data and reported metrics. Energies are in Wh, losses summed over
/// all steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// AC energy drawn from the grid.
    pub ac_energy_charged_wh: f64,
    /// AC energy returned to the grid (positive magnitude).
    pub ac_energy_discharged_wh: f64,
    /// DC energy into the battery.
    pub dc_energy_charged_wh: f64,
    /// DC energy out of the battery (positive magnitude).
    pub dc_energy_discharged_wh: f64,
    pub converter_loss_wh: f64,
    pub battery_loss_wh: f64,
    /// AC discharged over AC charged; 0 when nothing was charged.
    pub round_trip_efficiency: f64,
    /// Setpoint energy the system could not follow.
    pub unmet_energy_wh: f64,
    pub final_soc: f64,
    pub final_soh_q: f64,
    pub final_soh_r: f64,
    /// Highest battery temperature in K.
    pub max_temperature_k: f64,
    /// DC throughput over twice the nominal energy capacity.
    pub full_equivalent_cycles: f64,
}

impl KpiReport {
    /// Computes all KPIs from the complete step record vector.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `dt_hours` - Timestep duration in hours
    /// * `nominal_energy_wh` - Battery nominal energy for cycle counting
    pub fn from_results(results: &[StepResult], dt_hours: f64, nominal_energy_wh: f64) -> Self {
        let mut report = Self {
            ac_energy_charged_wh: 0.0,
            ac_energy_discharged_wh: 0.0,
            dc_energy_charged_wh: 0.0,
            dc_energy_discharged_wh: 0.0,
            converter_loss_wh: 0.0,
            battery_loss_wh: 0.0,
            round_trip_efficiency: 0.0,
            unmet_energy_wh: 0.0,
            final_soc: 0.0,
            final_soh_q: 1.0,
            final_soh_r: 1.0,
            max_temperature_k: 0.0,
            full_equivalent_cycles: 0.0,
        };
        let Some(last) = results.last() else {
            return report;
        };

        for r in results {
            if r.power_ac_w > 0.0 {
                report.ac_energy_charged_wh += r.power_ac_w * dt_hours;
            } else {
                report.ac_energy_discharged_wh -= r.power_ac_w * dt_hours;
            }
            if r.power_dc_w > 0.0 {
                report.dc_energy_charged_wh += r.power_dc_w * dt_hours;
            } else {
                report.dc_energy_discharged_wh -= r.power_dc_w * dt_hours;
            }
            report.converter_loss_wh += r.converter_loss_w * dt_hours;
            report.battery_loss_wh += r.battery_loss_w * dt_hours;
            report.unmet_energy_wh += (r.power_setpoint_w - r.power_ac_w).abs() * dt_hours;
            report.max_temperature_k = report.max_temperature_k.max(r.temperature_k);
        }

        if report.ac_energy_charged_wh > 0.0 {
            report.round_trip_efficiency = report.ac_energy_discharged_wh / report.ac_energy_charged_wh;
        }
        if nominal_energy_wh > 0.0 {
            report.full_equivalent_cycles =
                (report.dc_energy_charged_wh + report.dc_energy_discharged_wh) / (2.0 * nominal_energy_wh);
        }
        report.final_soc = last.soc;
        report.final_soh_q = last.soh_q;
        report.final_soh_r = last.soh_r;
        report
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(
            f,
            "AC energy:             {:.2} Wh charged, {:.2} Wh discharged",
            self.ac_energy_charged_wh, self.ac_energy_discharged_wh
        )?;
        writeln!(
            f,
            "DC energy:             {:.2} Wh charged, {:.2} Wh discharged",
            self.dc_energy_charged_wh, self.dc_energy_discharged_wh
        )?;
        writeln!(
            f,
            "Losses:                {:.2} Wh converter, {:.2} Wh battery",
            self.converter_loss_wh, self.battery_loss_wh
        )?;
        writeln!(f, "Round-trip efficiency: {:.1}%", self.round_trip_efficiency * 100.0)?;
        writeln!(f, "Unmet energy:          {:.2} Wh", self.unmet_energy_wh)?;
        writeln!(f, "Final SoC:             {:.2}%", self.final_soc * 100.0)?;
        writeln!(
            f,
            "Final SoH:             Q={:.5}  R={:.5}",
            self.final_soh_q, self.final_soh_r
        )?;
        writeln!(f, "Max temperature:       {:.2} K", self.max_temperature_k)?;
        write!(f, "Full equiv. cycles:    {:.3}", self.full_equivalent_cycles)
    }
}
