//! AC power setpoint profiles driving a simulation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::SimError;

/// Constant power held for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// Duration in seconds.
    pub duration_s: f64,
    /// AC power in W, positive charges.
    pub power_w: f64,
}

#[derive(Debug, Clone)]
enum Shape {
    Segments { segments: Vec<Segment>, repeat: bool },
    Series { values: Vec<f64>, dt_s: f64 },
}

#[derive(Debug, Clone)]
struct Noise {
    std_w: f64,
    rng: StdRng,
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    power_w: f64,
}

/// Time-indexed AC power setpoint.
///
/// Either piecewise-constant segments (optionally repeating) or a sampled
/// series. Past the end of a non-repeating profile the setpoint is zero.
/// Optional seeded Gaussian noise is added to every non-idle sample.
///
/// # Examples
///
/// ```
/// use simses::sim::profile::{PowerProfile, Segment};
///
/// let mut p = PowerProfile::segments(vec![
///     Segment { duration_s: 3600.0, power_w: 5000.0 },
///     Segment { duration_s: 3600.0, power_w: -5000.0 },
/// ])
/// .unwrap()
/// .repeating();
///
/// assert_eq!(p.setpoint(0.0), 5000.0);
/// assert_eq!(p.setpoint(5400.0), -5000.0);
/// assert_eq!(p.setpoint(7200.0), 5000.0);
/// ```
#[derive(Debug, Clone)]
pub struct PowerProfile {
    shape: Shape,
    noise: Option<Noise>,
}

impl PowerProfile {
    /// Holds `power_w` forever.
    pub fn constant(power_w: f64) -> Self {
        Self {
            shape: Shape::Segments {
                segments: vec![Segment {
                    duration_s: f64::INFINITY,
                    power_w,
                }],
                repeat: false,
            },
            noise: None,
        }
    }

    /// Plays the segments once, in order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if there are no segments or a
    /// duration is not positive.
    pub fn segments(segments: Vec<Segment>) -> Result<Self, SimError> {
        if segments.is_empty() {
            return Err(SimError::invalid("segments", "profile needs at least one segment"));
        }
        if let Some(bad) = segments.iter().find(|s| !(s.duration_s > 0.0)) {
            return Err(SimError::invalid(
                "duration_s",
                format!("segment duration must be > 0, got {}", bad.duration_s),
            ));
        }
        Ok(Self {
            shape: Shape::Segments {
                segments,
                repeat: false,
            },
            noise: None,
        })
    }

    /// Sampled series, one value per `dt_s` seconds.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` for an empty series or a
    /// non-positive sample interval.
    pub fn series(values: Vec<f64>, dt_s: f64) -> Result<Self, SimError> {
        if values.is_empty() {
            return Err(SimError::invalid("series", "profile series is empty"));
        }
        if !(dt_s > 0.0) {
            return Err(SimError::invalid("dt_s", format!("sample interval must be > 0, got {dt_s}")));
        }
        Ok(Self {
            shape: Shape::Series { values, dt_s },
            noise: None,
        })
    }

    /// Reads a series from CSV with a `power_w` column.
    pub fn series_from_reader<R: Read>(reader: R, dt_s: f64) -> Result<Self, SimError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let values = rdr
            .deserialize()
            .map(|row| row.map(|SeriesRow { power_w }| power_w))
            .collect::<Result<Vec<f64>, csv::Error>>()?;
        Self::series(values, dt_s)
    }

    /// Reads a series from a CSV file with a `power_w` column.
    pub fn series_from_path(path: impl AsRef<Path>, dt_s: f64) -> Result<Self, SimError> {
        Self::series_from_reader(File::open(path)?, dt_s)
    }

    /// Loops a segment profile. Has no effect on series.
    pub fn repeating(mut self) -> Self {
        if let Shape::Segments { repeat, .. } = &mut self.shape {
            *repeat = true;
        }
        self
    }

    /// Adds reproducible Gaussian noise with standard deviation `std_w`.
    pub fn with_noise(mut self, std_w: f64, seed: u64) -> Self {
        self.noise = (std_w > 0.0).then(|| Noise {
            std_w,
            rng: StdRng::seed_from_u64(seed),
        });
        self
    }

    /// Total length of one pass in seconds (infinite for `constant`).
    pub fn period_s(&self) -> f64 {
        match &self.shape {
            Shape::Segments { segments, .. } => segments.iter().map(|s| s.duration_s).sum(),
            Shape::Series { values, dt_s } => values.len() as f64 * dt_s,
        }
    }

    /// Setpoint in W at `time_s` seconds from the start.
    pub fn setpoint(&mut self, time_s: f64) -> f64 {
        let base = self.base_setpoint(time_s);
        match self.noise.as_mut() {
            Some(noise) if base != 0.0 => base + gaussian_noise(&mut noise.rng, noise.std_w),
            _ => base,
        }
    }

    fn base_setpoint(&self, time_s: f64) -> f64 {
        if time_s < 0.0 {
            return 0.0;
        }
        match &self.shape {
            Shape::Segments { segments, repeat } => {
                let period = self.period_s();
                let mut t = if *repeat && period.is_finite() {
                    time_s % period
                } else {
                    time_s
                };
                for segment in segments {
                    if t < segment.duration_s {
                        return segment.power_w;
                    }
                    t -= segment.duration_s;
                }
                0.0
            }
            Shape::Series { values, dt_s } => {
                let k = (time_s / dt_s).floor() as usize;
                values.get(k).copied().unwrap_or(0.0)
            }
        }
    }
}

/// Box-Muller sample with mean 0.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-12);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * std_dev
}
