use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent frame deltas for instrumentation.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: VecDeque<Duration>,
    capacity: usize,
    total_frames: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            total_frames: 0,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(dt);
        self.total_frames += 1;
    }

    pub fn average(&self) -> Duration {
        if self.history.is_empty() {
            return Duration::ZERO;
        }
        self.history.iter().sum::<Duration>() / self.history.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.history.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames per second implied by the window average.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Frames currently in the window.
    pub fn count(&self) -> usize {
        self.history.len()
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
