/// Milliseconds on the show's virtual clock.
pub type Millis = u64;

/// Fixed-step accumulator in whole milliseconds.
/// Frame deltas arrive as seconds from `requestAnimationFrame`; the show
/// only ever sees integer steps so every timing constant lands exactly.
pub struct FixedTimestep {
    /// Length of one logic step.
    step_ms: Millis,
    /// Unconsumed frame time, in milliseconds.
    accumulator: f64,
    /// Upper bound on steps run for a single frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(step_ms: Millis) -> Self {
        Self {
            step_ms: step_ms.max(1),
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add a frame delta (seconds). Returns how many logic steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        let step = self.step_ms as f64;
        self.accumulator += f64::from(frame_dt) * 1000.0;
        // A backgrounded tab can hand us seconds at once; drop the excess.
        self.accumulator = self.accumulator.min(step * f64::from(self.max_steps));
        // f32 deltas like 0.010 arrive as 9.9999997 ms
        let steps = ((self.accumulator + 1e-3) / step) as u32;
        self.accumulator = (self.accumulator - f64::from(steps) * step).max(0.0);
        steps
    }

    /// Fraction of the next step already accumulated (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step_ms as f64) as f32
    }

    /// The fixed step length.
    pub fn step_ms(&self) -> Millis {
        self.step_ms
    }
}
