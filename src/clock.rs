//! Elapsed time since a demo started.

use instant::{Duration, Instant};

/// Monotonic clock started with the demo.
///
/// A clock can be frozen at a fixed reading, which makes a whole tick
/// reproducible (headless renders, tests).
#[derive(Clone, Debug)]
pub struct Clock {
    start: Instant,
    frozen: Option<Duration>,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            frozen: None,
        }
    }

    pub fn frozen_at(elapsed: Duration) -> Self {
        Self {
            start: Instant::now(),
            frozen: Some(elapsed),
        }
    }

    pub fn freeze(&mut self, elapsed: Duration) {
        self.frozen = Some(elapsed);
    }

    pub fn elapsed(&self) -> Duration {
        self.frozen.unwrap_or_else(|| self.start.elapsed())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}
