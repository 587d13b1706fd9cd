//! Step-by-step walkthrough of one recipe with its timers.

use tracing::{debug, info};

use super::voice::{VoiceCommand, VOICE_TIMER_LABEL};
use crate::config::Config;
use crate::events::{CookingEvent, EventBus};
use crate::recipe::{Recipe, Step};
use crate::timers::{TimerId, TimerManager};

/// Steps longer than this many minutes get a timer on entry
pub const DEFAULT_AUTO_SUGGEST_THRESHOLD_MINUTES: u32 = 2;

pub const COMPLETION_MESSAGE: &str =
    "Congratulations! You've completed the recipe. Enjoy your meal!";

/// The live walkthrough of a single recipe
#[derive(Debug, Clone)]
pub struct CookingSession {
    recipe: Recipe,
    current_step_index: usize,
}

impl CookingSession {
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> &Step {
        &self.recipe.steps[self.current_step_index]
    }

    pub fn next_step(&self) -> Option<&Step> {
        self.recipe.steps.get(self.current_step_index + 1)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 >= self.recipe.steps.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// (current step number / step count) * 100
    pub percent: f64,
    /// Estimated minutes for the current step and everything after it
    pub remaining_minutes: u32,
    /// 1-based
    pub step_number: usize,
    pub step_count: usize,
}

/// Result of [`SessionOrchestrator::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the step at this index
    Moved(usize),
    /// Was on the last step; the session has ended
    Completed,
    NoSession,
}

/// Owns the (optional) cooking session and the timer registry.
///
/// Timers are only touched through [`TimerManager`] operations; the
/// orchestrator never edits timer state directly.
pub struct SessionOrchestrator {
    session: Option<CookingSession>,
    timers: TimerManager,
    events: EventBus,
    auto_suggest_threshold_minutes: u32,
}

impl SessionOrchestrator {
    pub fn new(events: EventBus) -> Self {
        Self {
            session: None,
            timers: TimerManager::new(events.clone()),
            events,
            auto_suggest_threshold_minutes: DEFAULT_AUTO_SUGGEST_THRESHOLD_MINUTES,
        }
    }

    pub fn from_config(config: &Config, events: EventBus) -> Self {
        Self {
            session: None,
            timers: TimerManager::with_grace_period(
                events.clone(),
                config.timers.grace_period_secs,
            ),
            events,
            auto_suggest_threshold_minutes: config.timers.auto_suggest_threshold_minutes,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn session(&self) -> Option<&CookingSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.session.as_ref().map(CookingSession::recipe)
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.session.as_ref().map(CookingSession::current_step_index)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.session.as_ref().map(CookingSession::current_step)
    }

    pub fn next_step(&self) -> Option<&Step> {
        self.session.as_ref().and_then(CookingSession::next_step)
    }

    pub fn step_count(&self) -> usize {
        self.recipe().map_or(0, |r| r.steps.len())
    }

    pub fn is_last_step(&self) -> bool {
        self.session.as_ref().is_some_and(CookingSession::is_last_step)
    }

    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerManager {
        &mut self.timers
    }

    /// Begin cooking `recipe` from its first step, replacing any session
    pub fn start(&mut self, recipe: Recipe) {
        self.timers.remove_all();

        info!(
            title = %recipe.title,
            steps = recipe.steps.len(),
            total_time_minutes = recipe.total_time_minutes,
            "Cooking session started"
        );
        self.events.emit(CookingEvent::RecipeStarted {
            title: recipe.title.clone(),
            step_count: recipe.steps.len(),
            total_time_minutes: recipe.total_time_minutes,
        });

        self.session = Some(CookingSession {
            recipe,
            current_step_index: 0,
        });
        self.enter_current_step();
    }

    /// Move forward one step, or finish the recipe from the last step
    pub fn advance(&mut self) -> Advance {
        let Some(session) = self.session.as_mut() else {
            return Advance::NoSession;
        };

        if session.is_last_step() {
            self.complete();
            return Advance::Completed;
        }

        session.current_step_index += 1;
        let index = session.current_step_index;
        self.enter_current_step();
        Advance::Moved(index)
    }

    /// Move back one step. At the first step this changes nothing.
    pub fn retreat(&mut self) -> Option<usize> {
        let session = self.session.as_mut()?;
        if session.current_step_index == 0 {
            return Some(0);
        }

        session.current_step_index -= 1;
        let index = session.current_step_index;
        self.enter_current_step();
        Some(index)
    }

    pub fn progress(&self) -> Option<Progress> {
        let session = self.session.as_ref()?;
        let step_count = session.recipe.steps.len();
        let step_number = session.current_step_index + 1;

        Some(Progress {
            percent: step_number as f64 / step_count as f64 * 100.0,
            remaining_minutes: session
                .recipe
                .remaining_minutes_from(session.current_step_index),
            step_number,
            step_count,
        })
    }

    /// Stop cooking without finishing; timers are cleared
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            info!(title = %session.recipe.title, "Cooking session abandoned");
            self.timers.remove_all();
        }
    }

    /// Start a timer by hand, independent of the current step
    pub fn create_timer(&mut self, label: impl Into<String>, total_seconds: u32) -> TimerId {
        self.timers.create(label, total_seconds)
    }

    /// Advance every timer by one second
    pub fn tick(&mut self) -> Vec<TimerId> {
        self.timers.tick()
    }

    pub fn announce(&self, text: impl Into<String>) {
        self.events
            .emit(CookingEvent::Announcement { text: text.into() });
    }

    pub fn repeat_current_step(&self) {
        if let Some(step) = self.current_step() {
            self.announce(format!("{}. {}", step.title, step.instructions));
        }
    }

    pub fn announce_time_remaining(&self) {
        if let Some(progress) = self.progress() {
            self.announce(format!(
                "Approximately {} minutes remaining",
                progress.remaining_minutes
            ));
        }
    }

    pub fn preview_next_step(&self) {
        match self.next_step() {
            Some(step) => self.announce(format!("Next step: {}", step.title)),
            None => self.announce("This is the final step"),
        }
    }

    /// Interpret and run a spoken or typed command.
    ///
    /// Returns the recognised command; unrecognised text is ignored.
    pub fn handle_voice_command(&mut self, text: &str) -> Option<VoiceCommand> {
        let command = VoiceCommand::parse(text);
        debug!(text = %text, command = ?command, "Voice command");

        match command? {
            VoiceCommand::NextStep => {
                if let Advance::Moved(_) = self.advance() {
                    self.announce("Moving to next step");
                }
            }
            VoiceCommand::PreviousStep => {
                if self.retreat().is_some() {
                    self.announce("Going back to previous step");
                }
            }
            VoiceCommand::Repeat => self.repeat_current_step(),
            VoiceCommand::SetTimer {
                minutes: Some(minutes),
            } => {
                self.create_timer(VOICE_TIMER_LABEL, minutes.saturating_mul(60));
                self.announce(format!("{} minute timer started", minutes));
            }
            VoiceCommand::SetTimer { minutes: None } => {}
            VoiceCommand::TimeLeft => self.announce_time_remaining(),
            VoiceCommand::WhatsNext => {
                if self.is_active() {
                    self.preview_next_step();
                }
            }
        }

        command
    }

    fn complete(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        info!(title = %session.recipe.title, "Recipe completed");
        self.timers.remove_all();
        self.events.emit(CookingEvent::RecipeCompleted {
            title: session.recipe.title,
        });
        self.announce(COMPLETION_MESSAGE);
    }

    fn enter_current_step(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let index = session.current_step_index;
        let is_last = session.is_last_step();
        let step = session.current_step().clone();

        debug!(index, step_id = step.id, title = %step.title, "Entered step");
        self.events.emit(CookingEvent::StepChanged {
            index,
            step_id: step.id,
            title: step.title.clone(),
            instructions: step.instructions.clone(),
            estimated_time_minutes: step.estimated_time_minutes,
            is_last,
        });

        if step.estimated_time_minutes > self.auto_suggest_threshold_minutes {
            let minutes = step.estimated_time_minutes;
            let timer_id = self
                .timers
                .create(step.title.clone(), minutes.saturating_mul(60));
            self.events.emit(CookingEvent::TimerSuggested {
                timer_id,
                label: step.title,
                minutes,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelListener;
    use crate::recipe::{parse, ParseOptions};
    use crate::timers::TimerState;
    use tokio::sync::mpsc::UnboundedReceiver;

    const PASTA: &str = "Pasta\n2 cups pasta\n1. Boil water for 10 minutes\n2. Add pasta and cook for 8 minutes\n3. Stir in 1 cup sauce";

    fn pasta() -> Recipe {
        parse(PASTA, &ParseOptions::default())
    }

    fn orchestrator() -> (SessionOrchestrator, UnboundedReceiver<CookingEvent>) {
        let bus = EventBus::new();
        let (listener, rx) = ChannelListener::channel();
        bus.subscribe(listener);
        (SessionOrchestrator::new(bus), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<CookingEvent>) -> Vec<CookingEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    fn announcements(rx: &mut UnboundedReceiver<CookingEvent>) -> Vec<String> {
        drain(rx)
            .into_iter()
            .filter_map(|e| match e {
                CookingEvent::Announcement { text } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_enters_first_step_and_suggests_timer() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());

        assert_eq!(orch.current_step_index(), Some(0));
        let timers = orch.timers().list();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].label, "Boil ingredients");
        assert_eq!(timers[0].total_seconds, 600);

        let kinds: Vec<&str> = drain(&mut rx).iter().map(CookingEvent::event_type).collect();
        assert_eq!(
            kinds,
            vec!["recipe.started", "step.changed", "timer.created", "timer.suggested"]
        );
    }

    #[test]
    fn test_short_step_gets_no_timer() {
        let (mut orch, _rx) = orchestrator();
        orch.start(parse("Sauce\nStir well", &ParseOptions::default()));

        // "stir" estimates 1 minute, under the threshold
        assert!(orch.timers().is_empty());
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let (mut orch, _rx) = orchestrator();
        orch.start(parse("Sauce\nMix 2 minutes", &ParseOptions::default()));
        assert!(orch.timers().is_empty());

        orch.start(parse("Sauce\nMix 3 minutes", &ParseOptions::default()));
        assert_eq!(orch.timers().len(), 1);
    }

    #[test]
    fn test_huge_step_estimate_caps_suggested_timer() {
        let (mut orch, _rx) = orchestrator();
        orch.start(parse(
            "Stew\nSimmer for 100000000 minutes",
            &ParseOptions::default(),
        ));

        let timers = orch.timers().list();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].total_seconds, u32::MAX);
        assert_eq!(orch.progress().unwrap().remaining_minutes, 100_000_000);
    }

    #[test]
    fn test_start_replaces_session_and_clears_timers() {
        let (mut orch, _rx) = orchestrator();
        orch.start(pasta());
        orch.create_timer("Extra", 30);
        assert_eq!(orch.timers().len(), 2);

        orch.start(parse("Salad\nChop lettuce", &ParseOptions::default()));
        assert_eq!(orch.recipe().unwrap().title, "Salad");
        assert_eq!(orch.current_step_index(), Some(0));
        // old timers gone; "chop" is 3 minutes so one new timer
        assert_eq!(orch.timers().len(), 1);
        assert_eq!(orch.timers().list()[0].label, "Prepare ingredients");
    }

    #[test]
    fn test_advance_and_retreat() {
        let (mut orch, _rx) = orchestrator();
        orch.start(pasta());

        assert_eq!(orch.advance(), Advance::Moved(1));
        assert_eq!(orch.current_step().unwrap().id, 2);
        assert_eq!(orch.retreat(), Some(0));
        assert_eq!(orch.retreat(), Some(0));
        assert_eq!(orch.current_step_index(), Some(0));
    }

    #[test]
    fn test_retreat_at_first_step_does_not_reenter() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        drain(&mut rx);

        orch.retreat();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(orch.timers().len(), 1);
    }

    #[test]
    fn test_reentering_step_suggests_another_timer() {
        let (mut orch, _rx) = orchestrator();
        orch.start(pasta());
        orch.advance();
        orch.retreat();
        // boil (10), add+cook (8), boil again (10)
        assert_eq!(orch.timers().len(), 3);
    }

    #[test]
    fn test_advance_past_last_step_completes() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        orch.advance();
        orch.advance();
        assert!(orch.is_last_step());
        drain(&mut rx);

        assert_eq!(orch.advance(), Advance::Completed);
        assert!(!orch.is_active());
        assert!(orch.timers().is_empty());
        assert_eq!(orch.progress(), None);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, CookingEvent::RecipeCompleted { title } if title == "Pasta")));
        assert!(events.contains(&CookingEvent::Announcement {
            text: COMPLETION_MESSAGE.to_string()
        }));
    }

    #[test]
    fn test_no_session_operations_are_noops() {
        let (mut orch, _rx) = orchestrator();
        assert_eq!(orch.advance(), Advance::NoSession);
        assert_eq!(orch.retreat(), None);
        assert_eq!(orch.progress(), None);
        assert_eq!(orch.step_count(), 0);
    }

    #[test]
    fn test_progress() {
        let (mut orch, _rx) = orchestrator();
        orch.start(pasta());

        let progress = orch.progress().unwrap();
        assert_eq!(progress.step_number, 1);
        assert_eq!(progress.step_count, 3);
        assert!((progress.percent - 100.0 / 3.0).abs() < 1e-9);
        // 10 + 8 + 1 (stir)
        assert_eq!(progress.remaining_minutes, 19);

        orch.advance();
        orch.advance();
        let progress = orch.progress().unwrap();
        assert!((progress.percent - 100.0).abs() < 1e-9);
        assert_eq!(progress.remaining_minutes, 1);
    }

    #[test]
    fn test_abandon_clears_without_completion() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        drain(&mut rx);

        orch.abandon();
        assert!(!orch.is_active());
        assert!(orch.timers().is_empty());
        assert!(!drain(&mut rx)
            .iter()
            .any(|e| e.event_type() == "recipe.completed"));
    }

    #[test]
    fn test_voice_set_timer() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        drain(&mut rx);

        let command = orch.handle_voice_command("set timer for 5 minute");
        assert_eq!(command, Some(VoiceCommand::SetTimer { minutes: Some(5) }));

        let voice_timer = orch
            .timers()
            .list()
            .into_iter()
            .find(|t| t.label == VOICE_TIMER_LABEL)
            .unwrap();
        assert_eq!(voice_timer.total_seconds, 300);
        assert_eq!(voice_timer.state, TimerState::Running);
        assert_eq!(announcements(&mut rx), vec!["5 minute timer started"]);
    }

    #[test]
    fn test_voice_set_timer_without_minutes_does_nothing() {
        let (mut orch, _rx) = orchestrator();
        orch.handle_voice_command("set timer");
        assert!(orch.timers().is_empty());
    }

    #[test]
    fn test_voice_set_timer_for_zero_minutes_is_ignored() {
        let (mut orch, mut rx) = orchestrator();
        orch.handle_voice_command("set timer for 0 minutes");

        assert!(orch.timers().is_empty());
        assert!(announcements(&mut rx).is_empty());
    }

    #[test]
    fn test_voice_navigation_and_announcements() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        drain(&mut rx);

        orch.handle_voice_command("next step");
        assert_eq!(orch.current_step_index(), Some(1));
        assert_eq!(announcements(&mut rx), vec!["Moving to next step"]);

        orch.handle_voice_command("what's next");
        assert_eq!(announcements(&mut rx), vec!["Next step: Stir mixture"]);

        orch.handle_voice_command("how long is left");
        assert_eq!(
            announcements(&mut rx),
            vec!["Approximately 9 minutes remaining"]
        );

        orch.handle_voice_command("read again");
        assert_eq!(
            announcements(&mut rx),
            vec!["Add ingredients. Add pasta and cook for 8 minutes"]
        );

        orch.handle_voice_command("go back");
        assert_eq!(orch.current_step_index(), Some(0));
        assert_eq!(announcements(&mut rx), vec!["Going back to previous step"]);
    }

    #[test]
    fn test_voice_whats_next_on_final_step() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(parse("Tea\nBoil water", &ParseOptions::default()));
        drain(&mut rx);

        orch.handle_voice_command("What's next?");
        assert_eq!(announcements(&mut rx), vec!["This is the final step"]);
    }

    #[test]
    fn test_unrecognised_voice_command_changes_nothing() {
        let (mut orch, mut rx) = orchestrator();
        orch.start(pasta());
        drain(&mut rx);

        assert_eq!(orch.handle_voice_command("sing a song"), None);
        assert_eq!(orch.current_step_index(), Some(0));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_timers_keep_running_across_steps() {
        let (mut orch, _rx) = orchestrator();
        orch.start(pasta());
        let first = orch.timers().list()[0].id;
        for _ in 0..30 {
            orch.tick();
        }
        orch.advance();

        assert_eq!(orch.timers().get(first).unwrap().remaining_seconds, 570);
        assert_eq!(orch.timers().len(), 2);
    }

    #[test]
    fn test_from_config_uses_threshold() {
        let mut config = Config::default();
        config.timers.auto_suggest_threshold_minutes = 20;
        let mut orch = SessionOrchestrator::from_config(&config, EventBus::new());
        orch.start(pasta());
        assert!(orch.timers().is_empty());
    }
}
