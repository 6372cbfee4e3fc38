//! Scheduled draft saving.

use std::time::Duration;

/// Interval between scheduled saves.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Fires once per interval, measured in milliseconds since the event loop
/// started. A zero interval never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTimer {
    interval_ms: u64,
    last_ms: u64,
}

impl AutosaveTimer {
    /// Arm the timer at `now_ms`.
    pub fn new(interval: Duration, now_ms: u64) -> Self {
        Self {
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            last_ms: now_ms,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.interval_ms > 0
    }

    /// `true` once the interval has elapsed since the last firing; re-arms
    /// from `now_ms`.
    pub const fn take_due(&mut self, now_ms: u64) -> bool {
        if !self.is_enabled() || now_ms.saturating_sub(self.last_ms) < self.interval_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }

    /// Time left before the next firing, for poll timeouts.
    pub const fn remaining(&self, now_ms: u64) -> Option<Duration> {
        if !self.is_enabled() {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.last_ms);
        Some(Duration::from_millis(self.interval_ms.saturating_sub(elapsed)))
    }
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, 0)
    }
}
