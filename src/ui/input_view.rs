//! Recipe entry screen: free text or a URL.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::centered_rect;
use super::keybindings::{hint_line, ShortcutContext};
use super::panels::{HeaderBar, StatusBar};
use crate::recipe::source::SAMPLE_RECIPE;
use crate::recipe::RecipeInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Text,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    Submit(RecipeInput),
    Quit,
}

pub struct InputView {
    textarea: TextArea<'static>,
    url: String,
    field: InputField,
    error: Option<String>,
    message: Option<String>,
}

impl InputView {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Paste or type a recipe: title first, then ingredients and steps");
        textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
        textarea.set_cursor_line_style(Style::default());

        Self {
            textarea,
            url: String::new(),
            field: InputField::Text,
            error: None,
            message: None,
        }
    }

    pub fn field(&self) -> InputField {
        self.field
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Informational line, e.g. after a recipe was finished
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn load_sample(&mut self) {
        self.textarea = {
            let mut textarea = TextArea::from(SAMPLE_RECIPE.lines());
            textarea.set_cursor_line_style(Style::default());
            textarea
        };
        self.field = InputField::Text;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return InputAction::Quit,
            KeyCode::Char('u') if ctrl => {
                self.field = match self.field {
                    InputField::Text => InputField::Url,
                    InputField::Url => InputField::Text,
                };
                return InputAction::None;
            }
            KeyCode::Char('e') if ctrl => {
                self.load_sample();
                return InputAction::None;
            }
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Esc => {
                if self.field == InputField::Url {
                    self.field = InputField::Text;
                    return InputAction::None;
                }
                return InputAction::Quit;
            }
            _ => {}
        }

        match self.field {
            InputField::Url => match key.code {
                KeyCode::Enter => return self.submit(),
                KeyCode::Backspace => {
                    self.url.pop();
                }
                KeyCode::Char(c) if !ctrl => self.url.push(c),
                _ => {}
            },
            InputField::Text => {
                self.textarea.input(key);
            }
        }

        InputAction::None
    }

    fn submit(&mut self) -> InputAction {
        self.error = None;
        self.message = None;
        let input = match self.field {
            InputField::Text => RecipeInput::Text(self.text()),
            InputField::Url => RecipeInput::Url(self.url.clone()),
        };
        InputAction::Submit(input)
    }

    pub fn render(&mut self, frame: &mut Frame, busy: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(5),    // Recipe text
                Constraint::Length(3), // URL
                Constraint::Length(1), // Error / message
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        HeaderBar { recipe: None }.render(frame, chunks[0]);

        let focus = |field: InputField| {
            if self.field == field {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            }
        };

        let text_border = focus(InputField::Text);
        let url_border = focus(InputField::Url);

        self.textarea.set_cursor_style(if self.field == InputField::Text {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
        self.textarea.set_block(
            Block::default()
                .title(" Recipe ")
                .borders(Borders::ALL)
                .border_style(text_border),
        );
        frame.render_widget(&self.textarea, chunks[1]);

        let url_line = if self.url.is_empty() && self.field != InputField::Url {
            Line::from(Span::styled(
                "https://… (Ctrl+U to edit)",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let cursor = if self.field == InputField::Url { "▏" } else { "" };
            Line::from(format!("{}{}", self.url, cursor))
        };
        let url = Paragraph::new(url_line).block(
            Block::default()
                .title(" Recipe URL ")
                .borders(Borders::ALL)
                .border_style(url_border),
        );
        frame.render_widget(url, chunks[2]);

        let notice = match (&self.error, &self.message) {
            (Some(error), _) => Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(Color::Red),
            )),
            (None, Some(message)) => Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Green),
            )),
            (None, None) => Line::from(""),
        };
        frame.render_widget(Paragraph::new(notice), chunks[3]);

        StatusBar {
            message: None,
            hint: hint_line(ShortcutContext::Input),
        }
        .render(frame, chunks[4]);

        if busy {
            render_busy_overlay(frame, frame.area());
        }
    }
}

fn render_busy_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 20, area);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Processing recipe…",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let overlay = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(overlay, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(view: &mut InputView, s: &str) {
        for c in s.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typed_text_is_submitted() {
        let mut view = InputView::new();
        type_str(&mut view, "Toast");
        view.handle_key(key(KeyCode::Enter));
        type_str(&mut view, "Heat bread");

        assert_eq!(
            view.handle_key(ctrl('s')),
            InputAction::Submit(RecipeInput::Text("Toast\nHeat bread".to_string()))
        );
    }

    #[test]
    fn test_url_field_toggle_and_submit() {
        let mut view = InputView::new();
        view.handle_key(ctrl('u'));
        assert_eq!(view.field(), InputField::Url);

        type_str(&mut view, "https://x.test/r");
        view.handle_key(key(KeyCode::Backspace));
        assert_eq!(view.url(), "https://x.test/");

        assert_eq!(
            view.handle_key(key(KeyCode::Enter)),
            InputAction::Submit(RecipeInput::Url("https://x.test/".to_string()))
        );
    }

    #[test]
    fn test_escape_leaves_url_field_then_quits() {
        let mut view = InputView::new();
        view.handle_key(ctrl('u'));
        assert_eq!(view.handle_key(key(KeyCode::Esc)), InputAction::None);
        assert_eq!(view.field(), InputField::Text);
        assert_eq!(view.handle_key(key(KeyCode::Esc)), InputAction::Quit);
    }

    #[test]
    fn test_sample_loads_into_text_area() {
        let mut view = InputView::new();
        view.handle_key(ctrl('e'));
        assert_eq!(view.text(), SAMPLE_RECIPE);
    }

    #[test]
    fn test_submit_clears_error() {
        let mut view = InputView::new();
        view.set_error("Please provide a recipe to process.");
        view.handle_key(ctrl('s'));
        assert!(view.error().is_none());
    }
}
