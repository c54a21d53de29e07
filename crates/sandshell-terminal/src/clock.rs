//! Time source for `date`, `cal`, and `uptime`.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Wall clock and uptime provider.
pub trait Clock {
    /// Current local date and time.
    fn now(&self) -> DateTime<Local>;

    /// Time since the session started.
    fn uptime(&self) -> Duration;
}

/// Real clock; uptime counts from construction.
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub now: DateTime<Local>,
    pub uptime: Duration,
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn uptime(&self) -> Duration {
        self.uptime
    }
}
