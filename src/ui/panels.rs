use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::recipe::{Recipe, Step};
use crate::session::Progress;
use crate::timers::{Timer, TimerManager, TimerState, Urgency};

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Normal => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::Critical => Color::Red,
    }
}

/// Text of one row in the timers list
pub fn timer_row(timer: &Timer) -> String {
    match timer.state {
        TimerState::Running => format!("▶ {}  {}", timer.display(), timer.label),
        TimerState::Paused => format!("⏸ {}  {}", timer.display(), timer.label),
        TimerState::Completed => format!("✓ Done   {}", timer.label),
    }
}

/// Filled/empty bar of `width` cells showing how much of the timer has run
pub fn elapsed_bar(timer: &Timer, width: usize) -> String {
    let filled = ((timer.elapsed_ratio() * width as f64).round() as usize).min(width);
    format!("{}{}", "▰".repeat(filled), "▱".repeat(width - filled))
}

pub struct HeaderBar<'a> {
    pub recipe: Option<&'a Recipe>,
}

impl HeaderBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " Sous",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )];

        if let Some(recipe) = self.recipe {
            let sep = || Span::styled("  │  ", Style::default().fg(Color::DarkGray));
            spans.push(sep());
            spans.push(Span::styled(
                recipe.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(sep());
            spans.push(Span::styled(
                format!("⏱ {} min", recipe.total_time_minutes),
                Style::default().fg(Color::Gray),
            ));
            spans.push(sep());
            spans.push(Span::styled(
                format!("{} servings", recipe.servings),
                Style::default().fg(Color::Gray),
            ));
            spans.push(sep());
            spans.push(Span::styled(
                recipe.skill_level.to_string(),
                Style::default().fg(Color::Gray),
            ));
        } else {
            spans.push(Span::styled(
                "  cooking companion",
                Style::default().fg(Color::Gray),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(bar, area);
    }
}

pub struct ProgressPanel {
    pub progress: Progress,
}

impl ProgressPanel {
    pub fn label(&self) -> String {
        format!(
            "Step {} of {}  ·  ~{} min remaining",
            self.progress.step_number, self.progress.step_count, self.progress.remaining_minutes
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let ratio = (self.progress.percent / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(ratio)
            .label(self.label());

        frame.render_widget(gauge, area);
    }
}

pub struct StepPanel<'a> {
    pub step: &'a Step,
    pub is_last: bool,
}

impl StepPanel<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                self.step.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("~{} min", self.step.estimated_time_minutes),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(self.step.instructions.clone()),
        ];

        if !self.step.tips.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Tips",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for tip in &self.step.tips {
                lines.push(Line::from(Span::styled(
                    tip.clone(),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }

        if self.is_last {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Final step: press n to finish",
                Style::default().fg(Color::Green),
            )));
        }

        let title = format!(" Step {} ", self.step.id);
        let panel = Paragraph::new(lines)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        frame.render_widget(panel, area);
    }
}

pub struct TimersPanel {
    pub state: ListState,
}

impl TimersPanel {
    pub fn new() -> Self {
        Self {
            state: ListState::default(),
        }
    }

    /// Keep the selection inside a list of `len` timers
    pub fn clamp(&mut self, len: usize) {
        match (self.state.selected(), len) {
            (_, 0) => self.state.select(None),
            (None, _) => self.state.select(Some(0)),
            (Some(i), n) if i >= n => self.state.select(Some(n - 1)),
            _ => {}
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = self.state.selected().map_or(0, |i| (i + 1) % len);
        self.state.select(Some(next));
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let prev = self
            .state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.state.select(Some(prev));
    }

    pub fn title(timers: &TimerManager) -> String {
        let running = timers.running_count();
        if running == 0 || running == timers.len() {
            format!(" Timers ({}) ", timers.len())
        } else {
            format!(" Timers ({}, {} running) ", timers.len(), running)
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, manager: &TimerManager) {
        let timers = manager.list();
        self.clamp(timers.len());

        let items: Vec<ListItem> = timers
            .iter()
            .map(|t| {
                let color = if t.state == TimerState::Paused {
                    Color::Gray
                } else {
                    urgency_color(t.urgency())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(timer_row(t), Style::default().fg(color)),
                    Span::raw("  "),
                    Span::styled(elapsed_bar(t, 10), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let title = Self::title(manager);
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

pub struct StatusBar<'a> {
    pub message: Option<&'a str>,
    pub hint: String,
}

impl StatusBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(message) = self.message {
            spans.push(Span::styled(
                format!("{}  ", message),
                Style::default().fg(Color::Green),
            ));
        }
        spans.push(Span::styled(
            self.hint.clone(),
            Style::default().fg(Color::DarkGray),
        ));

        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
        frame.render_widget(bar, area);
    }
}
