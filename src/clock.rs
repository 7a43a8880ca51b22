//! Time sources for lerp progress

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time in seconds. Only differences are meaningful.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock based on [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock driven by hand, e.g. from the host's absolute time or in tests.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            seconds: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}
