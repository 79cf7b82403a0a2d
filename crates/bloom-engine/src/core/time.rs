/// Fixed-rate frame clock.
/// Converts variable host frame times into whole simulation frames and
/// counts them; the frame number keys every noise phase in the garden.
pub struct FrameClock {
    /// Duration of one simulation frame.
    dt: f32,
    /// Host time not yet consumed by a frame.
    accumulator: f32,
    /// Frames advanced since construction or the last reset.
    frame: u64,
}

impl FrameClock {
    /// Most frames a single host tick may request.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            frame: 0,
        }
    }

    /// Add host frame time. Returns the number of frames to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // A stalled tab must not queue up hundreds of growth steps
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Advance the frame counter by one and return the new frame number.
    pub fn advance(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Current frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Fraction of a frame left in the accumulator (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Restart at frame zero with an empty accumulator.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.frame = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
