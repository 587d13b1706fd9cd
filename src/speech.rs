//! Speaking announcements aloud through an external TTS program.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::VoiceConfig;
use crate::events::{CookingEvent, CookingListener};

/// A resolved text-to-speech command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl TtsCommand {
    /// Parse a template such as `espeak -v {lang}`. The program must be on
    /// `PATH`; returns `None` otherwise.
    pub fn resolve(template: &str, language: &str) -> Option<Self> {
        let mut parts = template.split_whitespace();
        let name = parts.next()?;
        let program = match which::which(name) {
            Ok(path) => path,
            Err(e) => {
                warn!(command = %name, error = %e, "Speech command not found");
                return None;
            }
        };

        Some(Self {
            program,
            args: substitute_language(parts, language),
        })
    }

    /// Full argument list for one utterance
    pub fn args_for(&self, text: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(text.to_string());
        args
    }
}

fn substitute_language<'a>(parts: impl Iterator<Item = &'a str>, language: &str) -> Vec<String> {
    parts.map(|p| p.replace("{lang}", language)).collect()
}

/// Listener that voices [`CookingEvent::Announcement`]s.
///
/// With voice disabled it does nothing; without a usable command it only
/// logs what would have been said.
pub struct Speaker {
    enabled: bool,
    command: Option<TtsCommand>,
}

impl Speaker {
    pub fn from_config(config: &VoiceConfig) -> Self {
        let command = if config.enabled {
            config
                .tts_command
                .as_deref()
                .and_then(|t| TtsCommand::resolve(t, &config.language))
        } else {
            None
        };

        Self {
            enabled: config.enabled,
            command,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn command(&self) -> Option<&TtsCommand> {
        self.command.as_ref()
    }

    fn speak(&self, text: &str) {
        info!(text = %text, "Announcement");

        let Some(command) = &self.command else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime available for speech");
            return;
        };

        let program = command.program.clone();
        let args = command.args_for(text);
        handle.spawn(async move {
            let status = tokio::process::Command::new(&program)
                .args(&args)
                .stdin(std::process::Stdio::null())
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .status()
                .await;

            match status {
                Ok(status) if !status.success() => {
                    warn!(program = %program.display(), %status, "Speech command failed");
                }
                Err(e) => {
                    warn!(program = %program.display(), error = %e, "Failed to run speech command");
                }
                Ok(_) => {}
            }
        });
    }
}

impl CookingListener for Speaker {
    fn name(&self) -> &str {
        "speech"
    }

    fn handles_event(&self, event: &CookingEvent) -> bool {
        self.enabled && matches!(event, CookingEvent::Announcement { .. })
    }

    fn on_event(&self, event: &CookingEvent) {
        if let CookingEvent::Announcement { text } = event {
            self.speak(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(enabled: bool, tts_command: Option<&str>) -> VoiceConfig {
        VoiceConfig {
            enabled,
            language: "en-GB".to_string(),
            tts_command: tts_command.map(str::to_string),
        }
    }

    #[test]
    fn test_language_placeholder_substituted() {
        let args = substitute_language("-v {lang} -s 150".split_whitespace(), "fr-FR");
        assert_eq!(args, vec!["-v", "fr-FR", "-s", "150"]);
    }

    #[test]
    fn test_args_for_appends_text() {
        let command = TtsCommand {
            program: PathBuf::from("/usr/bin/espeak"),
            args: vec!["-v".into(), "en-GB".into()],
        };
        assert_eq!(
            command.args_for("Moving to next step"),
            vec!["-v", "en-GB", "Moving to next step"]
        );
    }

    #[test]
    fn test_missing_program_resolves_to_none() {
        assert!(TtsCommand::resolve("definitely-not-a-real-tts-binary -v {lang}", "en").is_none());
        assert!(TtsCommand::resolve("   ", "en").is_none());
    }

    #[test]
    fn test_disabled_speaker_ignores_announcements() {
        let speaker = Speaker::from_config(&voice(false, None));
        assert!(!speaker.is_enabled());
        assert!(!speaker.handles_event(&CookingEvent::Announcement {
            text: "hello".into()
        }));
    }

    #[test]
    fn test_enabled_speaker_only_handles_announcements() {
        let speaker = Speaker::from_config(&voice(true, None));
        assert!(speaker.command().is_none());
        assert!(speaker.handles_event(&CookingEvent::Announcement {
            text: "hello".into()
        }));
        assert!(!speaker.handles_event(&CookingEvent::TimerRemoved { timer_id: 1 }));

        // log-only path must not panic without a runtime
        speaker.on_event(&CookingEvent::Announcement {
            text: "hello".into(),
        });
    }
}
