/// Stress factors of a completed half-cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfCycle {
    /// Absolute SOC swing in p.u.
    pub depth_of_discharge: f64,
    /// Average SOC over the half-cycle in p.u.
    pub mean_soc: f64,
    /// Average C-rate in 1/h.
    pub c_rate: f64,
    /// Full equivalent cycle contribution (`depth_of_discharge / 2`).
    pub full_equivalent_cycles: f64,
}

impl HalfCycle {
    /// Builds a half-cycle whose FEC contribution follows from its depth.
    pub fn new(depth_of_discharge: f64, mean_soc: f64, c_rate: f64) -> Self {
        Self {
            depth_of_discharge,
            mean_soc,
            c_rate,
            full_equivalent_cycles: depth_of_discharge / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Unknown,
    Charging,
    Discharging,
}

/// Detects half-cycles from SOC direction reversals.
///
/// A half-cycle completes when the SOC changes direction. Steps without SOC
/// change are rest: they neither complete a cycle nor add elapsed time.
///
/// # Examples
///
/// ```
/// use simses::degradation::HalfCycleDetector;
///
/// let mut det = HalfCycleDetector::new(0.5);
/// assert!(!det.update(0.7, 3600.0));
/// assert!(det.update(0.6, 60.0));
/// let cycle = det.last_cycle().unwrap();
/// assert!((cycle.depth_of_discharge - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct HalfCycleDetector {
    start_soc: f64,
    prev_soc: f64,
    direction: Direction,
    /// Seconds of movement in the current half-cycle.
    elapsed: f64,
    soc_sum: f64,
    soc_samples: usize,
    total_fec: f64,
    last_cycle: Option<HalfCycle>,
}

impl HalfCycleDetector {
    pub fn new(initial_soc: f64) -> Self {
        Self {
            start_soc: initial_soc,
            prev_soc: initial_soc,
            direction: Direction::Unknown,
            elapsed: 0.0,
            soc_sum: 0.0,
            soc_samples: 0,
            total_fec: 0.0,
            last_cycle: None,
        }
    }

    /// Feeds the SOC after a timestep of `dt` seconds.
    ///
    /// Returns `true` if a half-cycle completed; it is then available via
    /// [`Self::last_cycle`].
    pub fn update(&mut self, soc: f64, dt: f64) -> bool {
        let delta = soc - self.prev_soc;
        if delta == 0.0 {
            return false;
        }

        let direction = if delta > 0.0 {
            Direction::Charging
        } else {
            Direction::Discharging
        };
        let midpoint = (self.prev_soc + soc) / 2.0;

        if self.direction == Direction::Unknown || self.direction == direction {
            self.direction = direction;
            self.elapsed += dt;
            self.soc_sum += midpoint;
            self.soc_samples += 1;
            self.prev_soc = soc;
            return false;
        }

        // reversal: close the half-cycle at the previous SOC
        let cycle = self.close_half_cycle();
        self.total_fec += cycle.full_equivalent_cycles;
        self.last_cycle = Some(cycle);

        self.start_soc = self.prev_soc;
        self.direction = direction;
        self.elapsed = dt;
        self.soc_sum = midpoint;
        self.soc_samples = 1;
        self.prev_soc = soc;
        true
    }

    /// Cumulative full equivalent cycles of all completed half-cycles.
    pub fn total_fec(&self) -> f64 {
        self.total_fec
    }

    /// The most recently completed half-cycle.
    pub fn last_cycle(&self) -> Option<&HalfCycle> {
        self.last_cycle.as_ref()
    }

    fn close_half_cycle(&self) -> HalfCycle {
        let dod = (self.prev_soc - self.start_soc).abs();
        let mean_soc = if self.soc_samples > 0 {
            self.soc_sum / self.soc_samples as f64
        } else {
            self.start_soc
        };
        let hours = self.elapsed / 3600.0;
        let c_rate = if hours > 0.0 { dod / hours } else { 0.0 };
        HalfCycle::new(dod, mean_soc, c_rate)
    }
}
