//! Keyboard shortcuts for each screen.
//!
//! The status bars render their hints from this table, so the hint text and
//! the key handling in `app.rs` stay in one place.

use crossterm::event::KeyCode;

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    /// Alternative key (e.g. an arrow)
    pub alt_key: Option<KeyCode>,
    /// Requires Ctrl held down
    pub ctrl: bool,
    pub description: &'static str,
    pub context: ShortcutContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Recipe entry screen
    Input,
    /// Step-by-step cooking screen
    Cooking,
    /// Typing a command after `:`
    CommandLine,
}

impl Shortcut {
    /// Format key for display (e.g., "q", "Ctrl+U", "n/→")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        let primary = if self.ctrl {
            format!("Ctrl+{}", primary.to_uppercase())
        } else {
            primary
        };
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        _ => format!("{:?}", key),
    }
}

pub static SHORTCUTS: &[Shortcut] = &[
    // === Input ===
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: None,
        ctrl: true,
        description: "Process recipe",
        context: ShortcutContext::Input,
    },
    Shortcut {
        key: KeyCode::Char('u'),
        alt_key: None,
        ctrl: true,
        description: "Text/URL",
        context: ShortcutContext::Input,
    },
    Shortcut {
        key: KeyCode::Char('e'),
        alt_key: None,
        ctrl: true,
        description: "Sample",
        context: ShortcutContext::Input,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        ctrl: false,
        description: "Quit",
        context: ShortcutContext::Input,
    },
    // === Cooking ===
    Shortcut {
        key: KeyCode::Char('n'),
        alt_key: Some(KeyCode::Right),
        ctrl: false,
        description: "Next",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char('p'),
        alt_key: Some(KeyCode::Left),
        ctrl: false,
        description: "Previous",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        ctrl: false,
        description: "Select timer",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: None,
        ctrl: false,
        description: "Pause/resume",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char('d'),
        alt_key: None,
        ctrl: false,
        description: "Remove",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char('t'),
        alt_key: None,
        ctrl: false,
        description: "5 min timer",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char(':'),
        alt_key: None,
        ctrl: false,
        description: "Command",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        ctrl: false,
        description: "Stop cooking",
        context: ShortcutContext::Cooking,
    },
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        ctrl: false,
        description: "Quit",
        context: ShortcutContext::Cooking,
    },
    // === Command line ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        ctrl: false,
        description: "Run",
        context: ShortcutContext::CommandLine,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        ctrl: false,
        description: "Cancel",
        context: ShortcutContext::CommandLine,
    },
];

pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// One-line hint such as `[n/→] Next  [p/←] Previous`
pub fn hint_line(context: ShortcutContext) -> String {
    shortcuts_for_context(context)
        .map(|s| format!("[{}] {}", s.key_display(), s.description))
        .collect::<Vec<_>>()
        .join("  ")
}
