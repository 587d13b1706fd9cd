//! Registry of concurrently running, paused and finished timers

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{Timer, TimerId, TimerState};
use crate::events::{CookingEvent, EventBus};

/// Seconds a finished timer lingers before it is removed automatically
pub const DEFAULT_GRACE_PERIOD_SECS: u32 = 10;

pub struct TimerManager {
    timers: BTreeMap<TimerId, Timer>,
    next_id: TimerId,
    grace_period_secs: u32,
    events: EventBus,
}

impl TimerManager {
    pub fn new(events: EventBus) -> Self {
        Self::with_grace_period(events, DEFAULT_GRACE_PERIOD_SECS)
    }

    pub fn with_grace_period(events: EventBus, grace_period_secs: u32) -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
            grace_period_secs,
            events,
        }
    }

    /// Start a new countdown. A zero duration is raised to one second.
    pub fn create(&mut self, label: impl Into<String>, total_seconds: u32) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;

        let timer = Timer::new(id, label.into(), total_seconds.max(1));
        info!(
            timer_id = id,
            label = %timer.label,
            total_seconds = timer.total_seconds,
            "Timer created"
        );

        self.events.emit(CookingEvent::TimerCreated {
            timer_id: id,
            label: timer.label.clone(),
            total_seconds: timer.total_seconds,
        });
        self.timers.insert(id, timer);
        id
    }

    /// Halt a running timer. Returns false (and does nothing) otherwise.
    pub fn pause(&mut self, id: TimerId) -> bool {
        let Some(timer) = self.timers.get_mut(&id) else {
            return false;
        };
        if timer.state != TimerState::Running {
            return false;
        }

        timer.state = TimerState::Paused;
        debug!(timer_id = id, remaining = timer.remaining_seconds, "Timer paused");
        self.events.emit(CookingEvent::TimerPaused {
            timer_id: id,
            remaining_seconds: timer.remaining_seconds,
        });
        true
    }

    /// Continue a paused timer from where it stopped
    pub fn resume(&mut self, id: TimerId) -> bool {
        let Some(timer) = self.timers.get_mut(&id) else {
            return false;
        };
        if timer.state != TimerState::Paused {
            return false;
        }

        timer.state = TimerState::Running;
        debug!(timer_id = id, remaining = timer.remaining_seconds, "Timer resumed");
        self.events.emit(CookingEvent::TimerResumed {
            timer_id: id,
            remaining_seconds: timer.remaining_seconds,
        });
        true
    }

    /// Pause if running, resume if paused
    pub fn toggle(&mut self, id: TimerId) -> bool {
        match self.timers.get(&id).map(|t| t.state) {
            Some(TimerState::Running) => self.pause(id),
            Some(TimerState::Paused) => self.resume(id),
            _ => false,
        }
    }

    /// Drop a timer in any state
    pub fn remove(&mut self, id: TimerId) -> bool {
        if self.timers.remove(&id).is_none() {
            return false;
        }
        debug!(timer_id = id, "Timer removed");
        self.events.emit(CookingEvent::TimerRemoved { timer_id: id });
        true
    }

    pub fn remove_all(&mut self) {
        let ids: Vec<TimerId> = self.timers.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Advance the clock by one second.
    ///
    /// Running timers count down; one that reaches zero completes and starts
    /// its grace period. Completed timers whose grace period runs out are
    /// removed. Returns the ids that completed on this tick.
    pub fn tick(&mut self) -> Vec<TimerId> {
        let mut completed = Vec::new();
        let mut expired = Vec::new();
        let mut events = Vec::new();

        for timer in self.timers.values_mut() {
            match timer.state {
                TimerState::Running => {
                    timer.remaining_seconds = timer.remaining_seconds.saturating_sub(1);
                    events.push(CookingEvent::TimerTick {
                        timer_id: timer.id,
                        remaining_seconds: timer.remaining_seconds,
                    });

                    if timer.remaining_seconds == 0 {
                        timer.state = TimerState::Completed;
                        timer.grace_remaining = Some(self.grace_period_secs);
                        completed.push(timer.id);
                        info!(timer_id = timer.id, label = %timer.label, "Timer complete");
                        events.push(CookingEvent::TimerCompleted {
                            timer_id: timer.id,
                            label: timer.label.clone(),
                        });
                    }
                }
                TimerState::Completed => {
                    let left = timer.grace_remaining.unwrap_or(0).saturating_sub(1);
                    timer.grace_remaining = Some(left);
                    if left == 0 {
                        expired.push(timer.id);
                    }
                }
                TimerState::Paused => {}
            }
        }

        for event in events {
            self.events.emit(event);
        }
        for id in expired {
            self.remove(id);
        }

        completed
    }

    /// Advance by several seconds, one tick at a time
    pub fn advance(&mut self, seconds: u32) -> Vec<TimerId> {
        (0..seconds).flat_map(|_| self.tick()).collect()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(&id)
    }

    /// All timers, oldest first
    pub fn list(&self) -> Vec<&Timer> {
        self.timers.values().collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.timers.values().filter(|t| t.is_running()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelListener;

    fn manager() -> TimerManager {
        TimerManager::new(EventBus::new())
    }

    #[test]
    fn test_create_starts_running() {
        let mut timers = manager();
        let id = timers.create("Pasta", 60);

        let timer = timers.get(id).unwrap();
        assert_eq!(timer.remaining_seconds, 60);
        assert_eq!(timer.state, TimerState::Running);
        assert_eq!(timer.label, "Pasta");
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let mut timers = manager();
        let a = timers.create("a", 10);
        timers.remove(a);
        let b = timers.create("b", 10);
        let c = timers.create("c", 10);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_zero_duration_is_raised() {
        let mut timers = manager();
        let id = timers.create("instant", 0);
        assert_eq!(timers.get(id).unwrap().total_seconds, 1);
    }

    #[test]
    fn test_countdown_completes_and_expires() {
        let mut timers = manager();
        let id = timers.create("Eggs", 60);

        let completed = timers.advance(59);
        assert!(completed.is_empty());
        assert_eq!(timers.get(id).unwrap().remaining_seconds, 1);

        assert_eq!(timers.tick(), vec![id]);
        let timer = timers.get(id).unwrap();
        assert_eq!(timer.state, TimerState::Completed);
        assert_eq!(timer.remaining_seconds, 0);

        timers.advance(DEFAULT_GRACE_PERIOD_SECS - 1);
        assert!(timers.get(id).is_some());
        timers.tick();
        assert!(timers.get(id).is_none());
    }

    #[test]
    fn test_pause_halts_and_resume_continues() {
        let mut timers = manager();
        let id = timers.create("Rice", 100);
        timers.advance(10);

        assert!(timers.pause(id));
        timers.advance(30);
        assert_eq!(timers.get(id).unwrap().remaining_seconds, 90);
        assert_eq!(timers.get(id).unwrap().state, TimerState::Paused);

        assert!(timers.resume(id));
        timers.advance(5);
        assert_eq!(timers.get(id).unwrap().remaining_seconds, 85);
    }

    #[test]
    fn test_pause_and_resume_are_noops_in_wrong_state() {
        let mut timers = manager();
        let id = timers.create("Tea", 2);

        assert!(!timers.resume(id));
        assert!(timers.pause(id));
        assert!(!timers.pause(id));

        assert!(timers.resume(id));
        timers.advance(2);
        assert!(!timers.pause(id));
        assert!(!timers.resume(id));

        assert!(!timers.pause(999));
        assert!(!timers.resume(999));
    }

    #[test]
    fn test_toggle() {
        let mut timers = manager();
        let id = timers.create("Toast", 30);
        assert!(timers.toggle(id));
        assert_eq!(timers.get(id).unwrap().state, TimerState::Paused);
        assert!(timers.toggle(id));
        assert_eq!(timers.get(id).unwrap().state, TimerState::Running);
    }

    #[test]
    fn test_remove_from_any_state() {
        let mut timers = manager();
        let running = timers.create("a", 10);
        let paused = timers.create("b", 10);
        let done = timers.create("c", 1);
        timers.pause(paused);
        timers.tick();

        assert!(timers.remove(running));
        assert!(timers.remove(paused));
        assert!(timers.remove(done));
        assert!(!timers.remove(done));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_removed_during_grace_period_stays_removed() {
        let mut timers = manager();
        let id = timers.create("Steak", 1);
        timers.tick();
        assert!(timers.remove(id));
        timers.advance(DEFAULT_GRACE_PERIOD_SECS);
        assert!(timers.get(id).is_none());
    }

    #[test]
    fn test_timers_count_down_independently() {
        let mut timers = manager();
        let short = timers.create("short", 3);
        let long = timers.create("long", 10);
        timers.pause(long);
        timers.advance(3);

        assert!(timers.get(short).unwrap().is_completed());
        assert_eq!(timers.get(long).unwrap().remaining_seconds, 10);
        assert_eq!(timers.running_count(), 0);
    }

    #[test]
    fn test_remove_all() {
        let mut timers = manager();
        timers.create("a", 10);
        timers.create("b", 20);
        timers.remove_all();
        assert_eq!(timers.len(), 0);
    }

    #[test]
    fn test_events_emitted() {
        let bus = EventBus::new();
        let (listener, mut rx) = ChannelListener::channel();
        bus.subscribe(listener);
        let mut timers = TimerManager::with_grace_period(bus, 1);

        let id = timers.create("Beep", 1);
        timers.tick();
        timers.tick();

        let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.event_type())
            .collect();
        assert_eq!(
            kinds,
            vec!["timer.created", "timer.tick", "timer.completed", "timer.removed"]
        );
        assert!(timers.get(id).is_none());
    }
}
