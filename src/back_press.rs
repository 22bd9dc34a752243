//! Debounce for host back-press events.

use std::time::{Duration, Instant};

pub const DEFAULT_BACK_PRESS_INTERVAL: Duration = Duration::from_millis(300);

/// Admits a back press only when enough time passed since the previous attempt.
///
/// Every attempt, admitted or not, restarts the interval.
#[derive(Debug, Clone)]
pub struct BackPressGate {
    interval: Duration,
    last_attempt: Option<Instant>,
}

impl Default for BackPressGate {
    fn default() -> Self {
        Self::new(DEFAULT_BACK_PRESS_INTERVAL)
    }
}

impl BackPressGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_attempt: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        let admitted = match self.last_attempt {
            None => true,
            Some(previous) => now.saturating_duration_since(previous) >= self.interval,
        };
        self.last_attempt = Some(now);
        admitted
    }

    pub fn reset(&mut self) {
        self.last_attempt = None;
    }
}
