/// Fixed timestep accumulator.
/// Turns variable frame time into a whole number of simulation steps.
pub struct FixedTimestep {
    /// Seconds per simulation step.
    dt: f32,
    /// Most steps a single frame may run before leftover time is dropped.
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add frame time and return how many fixed steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Millisecond countdown, decremented once per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Countdown {
    remaining_ms: f32,
}

impl Countdown {
    pub fn new(ms: f32) -> Self {
        Self { remaining_ms: ms.max(0.0) }
    }

    /// An already expired countdown.
    pub fn expired() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, ms: f32) {
        self.remaining_ms = ms.max(0.0);
    }

    /// Advance by `dt` seconds. Returns true on the step the countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining_ms <= 0.0 {
            return false;
        }
        self.remaining_ms -= dt * 1000.0;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            return true;
        }
        false
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }
}
