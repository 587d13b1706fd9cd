use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::{JoinError, JoinHandle};

use crate::config::Config;
use crate::events::{ChannelListener, CookingEvent, EventBus};
use crate::recipe::processor::PROCESSING_FAILED_MESSAGE;
use crate::recipe::{ProcessError, Recipe, RecipeInput, RecipeProcessor};
use crate::session::{SessionOrchestrator, COMPLETION_MESSAGE};
use crate::timers::SecondTicker;
use crate::ui::{CookingView, InputAction, InputView, TerminalGuard};

/// Label and length of the timer added with `t`
pub const QUICK_TIMER_LABEL: &str = "Quick Timer";
pub const QUICK_TIMER_SECS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Input,
    Cooking,
}

type Processing = JoinHandle<Result<Recipe, ProcessError>>;

pub struct App {
    config: Config,
    orchestrator: SessionOrchestrator,
    processor: Arc<RecipeProcessor>,
    events_rx: UnboundedReceiver<CookingEvent>,
    screen: Screen,
    input_view: InputView,
    cooking_view: CookingView,
    /// Recipe processing in flight; the input screen shows a busy overlay
    pending: Option<Processing>,
    ticker: SecondTicker,
    should_quit: bool,
}

impl App {
    /// `events` should already carry the side-effect listeners
    /// (notifications, speech); the app adds its own channel on top.
    pub fn new(config: Config, processor: RecipeProcessor, events: EventBus) -> Self {
        let (listener, events_rx) = ChannelListener::channel();
        events.subscribe(listener);
        let orchestrator = SessionOrchestrator::from_config(&config, events);

        Self {
            config,
            orchestrator,
            processor: Arc::new(processor),
            events_rx,
            screen: Screen::Input,
            input_view: InputView::new(),
            cooking_view: CookingView::new(),
            pending: None,
            ticker: SecondTicker::new(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    pub fn input_view(&self) -> &InputView {
        &self.input_view
    }

    pub fn cooking_view(&self) -> &CookingView {
        &self.cooking_view
    }

    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::enter()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);
        self.ticker = SecondTicker::new();

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.poll_processing().await;

            let elapsed = self.ticker.poll();
            self.advance_clock(elapsed);
            self.drain_events();
        }

        terminal.restore();
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Input => {
                let busy = self.pending.is_some();
                self.input_view.render(frame, busy);
            }
            Screen::Cooking => self.cooking_view.render(frame, &self.orchestrator),
        }
    }

    pub fn start_cooking(&mut self, recipe: Recipe) {
        self.cooking_view = CookingView::new();
        self.orchestrator.start(recipe);
        self.screen = Screen::Cooking;
        self.drain_events();
    }

    /// Kick off processing on a background task. Ignored while one is running.
    pub fn submit(&mut self, input: RecipeInput) {
        if self.pending.is_some() {
            return;
        }
        let processor = self.processor.clone();
        self.pending = Some(tokio::spawn(async move { processor.process(input).await }));
    }

    async fn poll_processing(&mut self) {
        if !self.pending.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        if let Some(handle) = self.pending.take() {
            let result = handle.await;
            self.finish_processing(result);
        }
    }

    /// Wait for in-flight processing to finish and apply its result
    pub async fn wait_for_processing(&mut self) {
        if let Some(handle) = self.pending.take() {
            let result = handle.await;
            self.finish_processing(result);
        }
    }

    fn finish_processing(&mut self, result: Result<Result<Recipe, ProcessError>, JoinError>) {
        match result {
            Ok(Ok(recipe)) => self.start_cooking(recipe),
            Ok(Err(e)) => self.input_view.set_error(e.to_string()),
            Err(e) => {
                tracing::error!(error = %e, "Recipe processing task failed");
                self.input_view.set_error(PROCESSING_FAILED_MESSAGE);
            }
        }
    }

    /// Feed whole elapsed seconds to the timers
    pub fn advance_clock(&mut self, seconds: u32) {
        self.orchestrator.timers_mut().advance(seconds);
    }

    /// Apply queued events to the views
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                CookingEvent::Announcement { text } => self.cooking_view.set_status(text),
                CookingEvent::TimerSuggested { label, minutes, .. } => self
                    .cooking_view
                    .set_status(format!("{} minute timer suggested for: {}", minutes, label)),
                CookingEvent::TimerCompleted { label, .. } => self
                    .cooking_view
                    .set_status(format!("⏰ {} timer has finished", label)),
                CookingEvent::RecipeCompleted { .. } => {
                    self.screen = Screen::Input;
                    self.input_view.set_message(COMPLETION_MESSAGE);
                }
                _ => {}
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.screen {
            Screen::Input => {
                // Keys are swallowed while the overlay is up
                if self.pending.is_some() {
                    return;
                }
                match self.input_view.handle_key(key) {
                    InputAction::Submit(input) => self.submit(input),
                    InputAction::Quit => self.quit(),
                    InputAction::None => {}
                }
            }
            Screen::Cooking => self.handle_cooking_key(key),
        }

        self.drain_events();
    }

    fn handle_cooking_key(&mut self, key: KeyEvent) {
        if self.cooking_view.is_entering_command() {
            match key.code {
                KeyCode::Enter => {
                    if let Some(command) = self.cooking_view.take_command() {
                        self.run_command(&command);
                    }
                }
                KeyCode::Esc => self.cooking_view.cancel_command(),
                KeyCode::Backspace => self.cooking_view.pop_command_char(),
                KeyCode::Char(c) => self.cooking_view.push_command_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('n') | KeyCode::Right => {
                self.orchestrator.advance();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.orchestrator.retreat();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.cooking_view.select_next_timer(self.orchestrator.timers());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cooking_view.select_prev_timer(self.orchestrator.timers());
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.cooking_view.selected_timer(self.orchestrator.timers()) {
                    self.orchestrator.timers_mut().toggle(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.cooking_view.selected_timer(self.orchestrator.timers()) {
                    self.orchestrator.timers_mut().remove(id);
                }
            }
            KeyCode::Char('t') => {
                self.orchestrator
                    .create_timer(QUICK_TIMER_LABEL, QUICK_TIMER_SECS);
            }
            KeyCode::Char(':') => self.cooking_view.open_command(),
            KeyCode::Esc => {
                self.orchestrator.abandon();
                self.screen = Screen::Input;
            }
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn run_command(&mut self, command: &str) {
        if command.trim().is_empty() {
            return;
        }
        if self.orchestrator.handle_voice_command(command).is_none() {
            self.cooking_view
                .set_status(format!("Unrecognised command: {}", command.trim()));
        }
    }

    fn quit(&mut self) {
        self.orchestrator.abandon();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{parse, ParseOptions, StaticRecipeFetcher};
    use crate::timers::TimerState;

    const PASTA: &str = "Pasta\n2 cups pasta\n1. Boil water for 10 minutes\n2. Add pasta and cook for 8 minutes\n3. Stir in 1 cup sauce";

    fn app() -> App {
        let processor = RecipeProcessor::new(
            Arc::new(StaticRecipeFetcher),
            ParseOptions::default(),
            Duration::ZERO,
        );
        App::new(Config::default(), processor, EventBus::new())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn cooking_app() -> App {
        let mut app = app();
        app.start_cooking(parse(PASTA, &ParseOptions::default()));
        app
    }

    #[tokio::test]
    async fn test_empty_submission_shows_error() {
        let mut app = app();
        app.handle_key(ctrl('s'));
        assert!(app.is_processing());

        app.wait_for_processing().await;
        assert_eq!(app.screen(), Screen::Input);
        assert_eq!(
            app.input_view().error(),
            Some("Please provide a recipe to process.")
        );
    }

    #[tokio::test]
    async fn test_url_submission_starts_session() {
        let mut app = app();
        app.handle_key(ctrl('u'));
        for c in "https://example.test/pasta".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        app.wait_for_processing().await;

        assert_eq!(app.screen(), Screen::Cooking);
        assert_eq!(
            app.orchestrator().recipe().unwrap().title,
            "Delicious Pasta Recipe"
        );
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = cooking_app();
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.orchestrator().current_step_index(), Some(1));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.orchestrator().current_step_index(), Some(0));
    }

    #[test]
    fn test_timer_keys() {
        let mut app = cooking_app();
        // boil step suggested one timer
        assert_eq!(app.orchestrator().timers().len(), 1);

        app.handle_key(key(KeyCode::Char('t')));
        let quick = app
            .orchestrator()
            .timers()
            .list()
            .into_iter()
            .find(|t| t.label == QUICK_TIMER_LABEL)
            .map(|t| (t.id, t.total_seconds))
            .unwrap();
        assert_eq!(quick.1, QUICK_TIMER_SECS);

        app.handle_key(key(KeyCode::Char(' ')));
        let first = app.orchestrator().timers().list()[0].id;
        assert_eq!(
            app.orchestrator().timers().get(first).unwrap().state,
            TimerState::Paused
        );

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.orchestrator().timers().get(quick.0).is_none());
    }

    #[test]
    fn test_command_line_runs_voice_command() {
        let mut app = cooking_app();
        app.handle_key(key(KeyCode::Char(':')));
        for c in "set timer for 3 minutes".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.cooking_view().status(), Some("3 minute timer started"));
        assert!(app
            .orchestrator()
            .timers()
            .list()
            .iter()
            .any(|t| t.total_seconds == 180));
    }

    #[test]
    fn test_unrecognised_command_reported() {
        let mut app = cooking_app();
        app.handle_key(key(KeyCode::Char(':')));
        for c in "dance".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.cooking_view().status(), Some("Unrecognised command: dance"));
    }

    #[test]
    fn test_finishing_returns_to_input() {
        let mut app = cooking_app();
        for _ in 0..3 {
            app.handle_key(key(KeyCode::Char('n')));
        }

        assert_eq!(app.screen(), Screen::Input);
        assert!(!app.orchestrator().is_active());
        assert!(app.orchestrator().timers().is_empty());
    }

    #[test]
    fn test_clock_drives_timers_and_status() {
        let mut app = cooking_app();
        app.advance_clock(600);
        app.drain_events();
        assert_eq!(
            app.cooking_view().status(),
            Some("⏰ Boil ingredients timer has finished")
        );
    }

    #[test]
    fn test_escape_abandons_session() {
        let mut app = cooking_app();
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen(), Screen::Input);
        assert!(!app.orchestrator().is_active());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_quit() {
        let mut app = cooking_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
