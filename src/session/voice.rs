//! Free-text voice commands.
//!
//! Commands are matched by substring in a fixed order; the first rule that
//! matches wins and anything unrecognised is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

/// Label given to timers started by voice
pub const VOICE_TIMER_LABEL: &str = "Voice Timer";

static TIMER_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*minute").expect("valid timer regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    NextStep,
    PreviousStep,
    Repeat,
    /// `None` when the phrase carried no positive "<N> minute" amount
    SetTimer { minutes: Option<u32> },
    TimeLeft,
    WhatsNext,
}

impl VoiceCommand {
    pub fn parse(command: &str) -> Option<Self> {
        let cmd = command.trim().to_lowercase();

        if cmd.contains("next step") {
            Some(VoiceCommand::NextStep)
        } else if cmd.contains("previous step") || cmd.contains("go back") {
            Some(VoiceCommand::PreviousStep)
        } else if cmd.contains("repeat") || cmd.contains("read again") {
            Some(VoiceCommand::Repeat)
        } else if cmd.contains("set timer") {
            let minutes = TIMER_MINUTES
                .captures(&cmd)
                .and_then(|caps| caps[1].parse().ok())
                .filter(|minutes| *minutes > 0);
            Some(VoiceCommand::SetTimer { minutes })
        } else if cmd.contains("time left") || cmd.contains("how long") {
            Some(VoiceCommand::TimeLeft)
        } else if cmd.contains("what's next") || cmd.contains("what\u{2019}s next") {
            Some(VoiceCommand::WhatsNext)
        } else {
            None
        }
    }
}
