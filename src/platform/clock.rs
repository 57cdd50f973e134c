//! Clocks and frame pacing

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Milliseconds since some fixed starting point
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Caps the loop at a target frame rate by sleeping off the rest of each frame
#[derive(Debug)]
pub struct FramePacer {
    frame_time: Option<Duration>,
    last: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            last: Instant::now(),
        }
    }

    /// A pacer that never sleeps
    pub fn unpaced() -> Self {
        Self::new(0)
    }

    /// Wait out the remainder of the current frame. Returns the measured
    /// time since the previous call, including the wait.
    pub fn wait(&mut self) -> Duration {
        if let Some(frame_time) = self.frame_time {
            let spent = self.last.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            }
        }
        let now = Instant::now();
        let delta = now - self.last;
        self.last = now;
        delta
    }
}
