use std::time::Duration;

/// Per-frame timing signal handed to update and draw passes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the clock started.
    pub total: f32,
    /// Frames elapsed before this one.
    pub frame: u64,
}

/// Accumulates frame deltas into [`FrameTime`] values.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    total: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` and return the timing for the new frame.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt: Duration) -> FrameTime {
        self.tick_secs(dt.as_secs_f32())
    }

    pub fn tick_secs(&mut self, dt: f32) -> FrameTime {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.total += dt as f64;
        let time = FrameTime {
            delta: dt,
            total: self.total as f32,
            frame: self.frame,
        };
        self.frame += 1;
        time
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

/// Wall-clock cost of the frames run so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    frames: u32,
    total: Duration,
    worst: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cost: Duration) {
        self.frames += 1;
        self.total += cost;
        self.worst = self.worst.max(cost);
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn average(&self) -> Duration {
        self.total.checked_div(self.frames).unwrap_or(Duration::ZERO)
    }

    pub fn worst(&self) -> Duration {
        self.worst
    }
}
