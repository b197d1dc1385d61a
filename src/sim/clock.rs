/// Step counter driving a simulation run.
///
/// Hands out step indices `0..total`, either one at a time or by
/// running a closure for each remaining step.
///
/// # Examples
///
/// ```
/// use simses::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut steps = Vec::new();
///
/// clock.run(|step| steps.push(step));
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
pub struct Clock {
    /// Next step to hand out.
    current: usize,
    total: usize,
}

impl Clock {
    /// Creates a clock over `total` steps.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Returns the next step index, or `None` once all steps are used.
    pub fn tick(&mut self) -> Option<usize> {
        let step = self.current;
        (step < self.total).then(|| {
            self.current += 1;
            step
        })
    }

    /// Steps not yet handed out.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }

    /// Runs `f` for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(step) = self.tick() {
            f(step);
        }
    }
}
