use std::time::{Duration, Instant};

/// Converts wall-clock time into whole-second ticks.
///
/// Fractions of a second carry over between polls, so a front end can poll
/// at any refresh rate without drifting.
#[derive(Debug, Clone)]
pub struct SecondTicker {
    last: Instant,
    carry: Duration,
}

impl SecondTicker {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            carry: Duration::ZERO,
        }
    }

    /// Whole seconds elapsed since the previous poll
    pub fn poll(&mut self) -> u32 {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last) + self.carry;
        self.last = now;

        let whole = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(whole);
        u32::try_from(whole).unwrap_or(u32::MAX)
    }
}

impl Default for SecondTicker {
    fn default() -> Self {
        Self::new()
    }
}
