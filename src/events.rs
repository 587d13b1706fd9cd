//! Cooking events and the bus that fans them out to front ends.
//!
//! The session orchestrator and timer manager only ever *emit*; anything that
//! reacts (notifications, speech, the TUI) subscribes a [`CookingListener`].

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::timers::TimerId;

/// Everything observable that happens during a cooking session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum CookingEvent {
    #[serde(rename = "recipe.started")]
    RecipeStarted {
        title: String,
        step_count: usize,
        total_time_minutes: u32,
    },

    #[serde(rename = "recipe.completed")]
    RecipeCompleted { title: String },

    /// Session entered a step (start, advance or retreat)
    #[serde(rename = "step.changed")]
    StepChanged {
        index: usize,
        step_id: u32,
        title: String,
        instructions: String,
        estimated_time_minutes: u32,
        is_last: bool,
    },

    /// A timer was created automatically on step entry
    #[serde(rename = "timer.suggested")]
    TimerSuggested {
        timer_id: TimerId,
        label: String,
        minutes: u32,
    },

    #[serde(rename = "timer.created")]
    TimerCreated {
        timer_id: TimerId,
        label: String,
        total_seconds: u32,
    },

    #[serde(rename = "timer.tick")]
    TimerTick {
        timer_id: TimerId,
        remaining_seconds: u32,
    },

    #[serde(rename = "timer.paused")]
    TimerPaused {
        timer_id: TimerId,
        remaining_seconds: u32,
    },

    #[serde(rename = "timer.resumed")]
    TimerResumed {
        timer_id: TimerId,
        remaining_seconds: u32,
    },

    #[serde(rename = "timer.completed")]
    TimerCompleted { timer_id: TimerId, label: String },

    #[serde(rename = "timer.removed")]
    TimerRemoved { timer_id: TimerId },

    /// Text meant to be spoken to the cook
    #[serde(rename = "announcement")]
    Announcement { text: String },
}

impl CookingEvent {
    /// Event type string for filtering (e.g., "timer.completed")
    pub fn event_type(&self) -> &'static str {
        match self {
            CookingEvent::RecipeStarted { .. } => "recipe.started",
            CookingEvent::RecipeCompleted { .. } => "recipe.completed",
            CookingEvent::StepChanged { .. } => "step.changed",
            CookingEvent::TimerSuggested { .. } => "timer.suggested",
            CookingEvent::TimerCreated { .. } => "timer.created",
            CookingEvent::TimerTick { .. } => "timer.tick",
            CookingEvent::TimerPaused { .. } => "timer.paused",
            CookingEvent::TimerResumed { .. } => "timer.resumed",
            CookingEvent::TimerCompleted { .. } => "timer.completed",
            CookingEvent::TimerRemoved { .. } => "timer.removed",
            CookingEvent::Announcement { .. } => "announcement",
        }
    }

    /// Format for OS notification display as (title, subtitle, message).
    /// `None` for events that never warrant a desktop notification.
    pub fn to_os_notification(&self) -> Option<(String, String, String)> {
        match self {
            CookingEvent::TimerSuggested { label, minutes, .. } => Some((
                "Timer Suggested".to_string(),
                label.clone(),
                format!("{} minute timer suggested for: {}", minutes, label),
            )),

            CookingEvent::TimerCompleted { label, .. } => Some((
                "Timer Complete!".to_string(),
                label.clone(),
                format!("{} timer has finished", label),
            )),

            CookingEvent::RecipeCompleted { title } => Some((
                "Recipe Complete".to_string(),
                title.clone(),
                "Congratulations! You've completed the recipe. Enjoy your meal!".to_string(),
            )),

            _ => None,
        }
    }
}

/// Receives cooking events.
///
/// Called synchronously from inside session and timer operations, so
/// implementations must return quickly and hand slow work to a task.
pub trait CookingListener: Send + Sync {
    /// Listener name (for logging)
    fn name(&self) -> &str;

    /// Whether this listener wants the event at all
    fn handles_event(&self, _event: &CookingEvent) -> bool {
        true
    }

    fn on_event(&self, event: &CookingEvent);
}

/// Shared, cloneable fan-out point for [`CookingEvent`]s.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<RwLock<Vec<Arc<dyn CookingListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn CookingListener>) {
        tracing::debug!(listener = %listener.name(), "Listener subscribed");
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn emit(&self, event: CookingEvent) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in listeners {
            if listener.handles_event(&event) {
                listener.on_event(&event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Forwards events into a channel a front end drains on its own schedule
pub struct ChannelListener {
    tx: UnboundedSender<CookingEvent>,
}

impl ChannelListener {
    pub fn channel() -> (Arc<Self>, UnboundedReceiver<CookingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl CookingListener for ChannelListener {
    fn name(&self) -> &str {
        "channel"
    }

    fn on_event(&self, event: &CookingEvent) {
        // Receiver gone means the front end shut down; nothing left to tell
        let _ = self.tx.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        only: Option<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    impl CookingListener for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn handles_event(&self, event: &CookingEvent) -> bool {
            self.only.map_or(true, |t| t == event.event_type())
        }

        fn on_event(&self, event: &CookingEvent) {
            self.seen
                .lock()
                .unwrap()
                .push(event.event_type().to_string());
        }
    }

    #[test]
    fn test_emit_respects_handles_event() {
        let bus = EventBus::new();
        let all = Arc::new(Recorder {
            only: None,
            seen: Mutex::new(Vec::new()),
        });
        let completed_only = Arc::new(Recorder {
            only: Some("timer.completed"),
            seen: Mutex::new(Vec::new()),
        });
        bus.subscribe(all.clone());
        bus.subscribe(completed_only.clone());

        bus.emit(CookingEvent::TimerRemoved { timer_id: 1 });
        bus.emit(CookingEvent::TimerCompleted {
            timer_id: 1,
            label: "Pasta".into(),
        });

        assert_eq!(
            *all.seen.lock().unwrap(),
            vec!["timer.removed", "timer.completed"]
        );
        assert_eq!(*completed_only.seen.lock().unwrap(), vec!["timer.completed"]);
    }

    #[test]
    fn test_clones_share_listeners() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let (listener, mut rx) = ChannelListener::channel();
        clone.subscribe(listener);

        assert_eq!(bus.listener_count(), 1);
        bus.emit(CookingEvent::Announcement {
            text: "hello".into(),
        });
        assert_eq!(
            rx.try_recv().unwrap(),
            CookingEvent::Announcement {
                text: "hello".into()
            }
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CookingEvent::TimerCreated {
            timer_id: 3,
            label: "Boil ingredients".into(),
            total_seconds: 600,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"timer.created\""));
        assert!(json.contains("\"total_seconds\":600"));

        let deserialized: CookingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_to_os_notification() {
        let suggested = CookingEvent::TimerSuggested {
            timer_id: 1,
            label: "Bake in oven".into(),
            minutes: 25,
        };
        let (title, _, message) = suggested.to_os_notification().unwrap();
        assert_eq!(title, "Timer Suggested");
        assert_eq!(message, "25 minute timer suggested for: Bake in oven");

        let completed = CookingEvent::TimerCompleted {
            timer_id: 1,
            label: "Bake in oven".into(),
        };
        let (title, _, message) = completed.to_os_notification().unwrap();
        assert_eq!(title, "Timer Complete!");
        assert_eq!(message, "Bake in oven timer has finished");

        let tick = CookingEvent::TimerTick {
            timer_id: 1,
            remaining_seconds: 5,
        };
        assert!(tick.to_os_notification().is_none());
    }
}
