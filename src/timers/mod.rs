//! Countdown timers.
//!
//! [`TimerManager`] owns every timer and only changes them through its own
//! operations. Time enters exclusively through [`TimerManager::tick`], one
//! call per elapsed second, so the same code runs against the wall clock
//! ([`SecondTicker`]) and against virtual time in tests.

mod manager;
mod ticker;

pub use manager::TimerManager;
pub use ticker::SecondTicker;

use serde::{Deserialize, Serialize};

use crate::recipe::format_clock;

pub type TimerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Running,
    Paused,
    Completed,
}

/// How close a timer is to going off, for display colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    /// Five minutes or less
    Warning,
    /// One minute or less
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub label: String,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub state: TimerState,
    /// Ticks left before a completed timer is dropped
    #[serde(skip)]
    grace_remaining: Option<u32>,
}

impl Timer {
    fn new(id: TimerId, label: String, total_seconds: u32) -> Self {
        Self {
            id,
            label,
            total_seconds,
            remaining_seconds: total_seconds,
            state: TimerState::Running,
            grace_remaining: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn urgency(&self) -> Urgency {
        match self.remaining_seconds {
            0..=60 => Urgency::Critical,
            61..=300 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }

    /// `MM:SS` of the remaining time
    pub fn display(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    /// Fraction elapsed, 0.0 to 1.0
    pub fn elapsed_ratio(&self) -> f64 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        f64::from(self.total_seconds - self.remaining_seconds) / f64::from(self.total_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_running_and_full() {
        let timer = Timer::new(1, "Pasta".into(), 600);
        assert!(timer.is_running());
        assert_eq!(timer.remaining_seconds, 600);
        assert_eq!(timer.display(), "10:00");
        assert_eq!(timer.elapsed_ratio(), 0.0);
    }

    #[test]
    fn test_urgency_thresholds() {
        let mut timer = Timer::new(1, "Sauce".into(), 900);
        assert_eq!(timer.urgency(), Urgency::Normal);
        timer.remaining_seconds = 300;
        assert_eq!(timer.urgency(), Urgency::Warning);
        timer.remaining_seconds = 61;
        assert_eq!(timer.urgency(), Urgency::Warning);
        timer.remaining_seconds = 60;
        assert_eq!(timer.urgency(), Urgency::Critical);
    }
}
