use std::time::{Duration, Instant};

/// Longest simulation step handed to the stars, in seconds.
pub const MAX_STEP: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaceMode {
    /// Presentation already blocks; nothing to do.
    Synced,
    /// Sleep off the rest of each frame interval.
    Paced,
}

/// Holds frames to a target interval by sleeping whole milliseconds and
/// carrying the sub-millisecond remainder (or the overrun of slow frames)
/// into the next frame.
#[derive(Clone, Debug)]
pub struct FramePacer {
    mode: PaceMode,
    interval: f32,
    residue: f32,
}

impl FramePacer {
    pub fn new(vsync: bool, target_fps: f32) -> Self {
        let mode = if vsync { PaceMode::Synced } else { PaceMode::Paced };
        Self {
            mode,
            interval: 1.0 / target_fps,
            residue: 0.0,
        }
    }

    pub fn mode(&self) -> PaceMode {
        self.mode
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f32(self.interval)
    }

    /// Carried remainder in seconds. Negative after slow frames.
    pub fn residue(&self) -> f32 {
        self.residue
    }

    pub fn reset(&mut self) {
        self.residue = 0.0;
    }

    pub fn sleep_time(&mut self, frame_time: Duration) -> Option<Duration> {
        match self.mode {
            PaceMode::Synced => None,
            PaceMode::Paced => self.paced(frame_time.as_secs_f32()),
        }
    }

    fn paced(&mut self, frame_time: f32) -> Option<Duration> {
        let total = self.interval - frame_time + self.residue;

        if total <= 0.0 {
            // Never owe more than one interval
            self.residue = total.max(-self.interval);
            return None;
        }

        let millis = (total * 1_000.0) as u64;
        self.residue = total - millis as f32 * 0.001;
        (millis > 0).then(|| Duration::from_millis(millis))
    }

    pub fn tick(&mut self, frame_time: Duration) {
        if let Some(sleep) = self.sleep_time(frame_time) {
            std::thread::sleep(sleep);
        }
    }
}

/// Measures the time between loop iterations.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous call, capped at [`MAX_STEP`].
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(MAX_STEP)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
