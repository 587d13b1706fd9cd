//! Step-by-step cooking screen.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::keybindings::{hint_line, ShortcutContext};
use super::panels::{HeaderBar, ProgressPanel, StatusBar, StepPanel, TimersPanel};
use crate::session::SessionOrchestrator;
use crate::timers::{TimerId, TimerManager};

pub struct CookingView {
    timers_panel: TimersPanel,
    /// `Some` while the `:` command line is open
    command: Option<String>,
    status: Option<String>,
}

impl CookingView {
    pub fn new() -> Self {
        Self {
            timers_panel: TimersPanel::new(),
            command: None,
            status: None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn is_entering_command(&self) -> bool {
        self.command.is_some()
    }

    pub fn open_command(&mut self) {
        self.command = Some(String::new());
    }

    pub fn cancel_command(&mut self) {
        self.command = None;
    }

    pub fn push_command_char(&mut self, c: char) {
        if let Some(command) = &mut self.command {
            command.push(c);
        }
    }

    pub fn pop_command_char(&mut self) {
        if let Some(command) = &mut self.command {
            command.pop();
        }
    }

    /// Close the command line, returning what was typed
    pub fn take_command(&mut self) -> Option<String> {
        self.command.take()
    }

    pub fn select_next_timer(&mut self, timers: &TimerManager) {
        self.timers_panel.select_next(timers.len());
    }

    pub fn select_prev_timer(&mut self, timers: &TimerManager) {
        self.timers_panel.select_prev(timers.len());
    }

    pub fn selected_timer(&mut self, timers: &TimerManager) -> Option<TimerId> {
        self.timers_panel.clamp(timers.len());
        let index = self.timers_panel.state.selected()?;
        timers.list().get(index).map(|t| t.id)
    }

    pub fn render(&mut self, frame: &mut Frame, orchestrator: &SessionOrchestrator) {
        let command_height = if self.command.is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),              // Header
                Constraint::Length(3),              // Progress
                Constraint::Min(8),                 // Step + timers
                Constraint::Length(command_height), // Command line
                Constraint::Length(2),              // Status bar
            ])
            .split(frame.area());

        HeaderBar {
            recipe: orchestrator.recipe(),
        }
        .render(frame, chunks[0]);

        if let Some(progress) = orchestrator.progress() {
            ProgressPanel { progress }.render(frame, chunks[1]);
        }

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);

        if let Some(step) = orchestrator.current_step() {
            StepPanel {
                step,
                is_last: orchestrator.is_last_step(),
            }
            .render(frame, main[0]);
        }

        self.timers_panel
            .render(frame, main[1], orchestrator.timers());

        if let Some(command) = &self.command {
            let line = Line::from(vec![
                Span::styled(":", Style::default().fg(Color::Cyan)),
                Span::raw(command.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ]);
            let input = Paragraph::new(line).block(
                Block::default()
                    .title(" Command (e.g. \"set timer for 5 minutes\") ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(input, chunks[3]);
        }

        let context = if self.command.is_some() {
            ShortcutContext::CommandLine
        } else {
            ShortcutContext::Cooking
        };
        StatusBar {
            message: self.status.as_deref(),
            hint: hint_line(context),
        }
        .render(frame, chunks[4]);
    }
}
