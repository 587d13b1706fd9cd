//! Cooking sessions: stepping through a recipe, auto-suggested timers and
//! voice commands.

mod orchestrator;
mod voice;

pub use orchestrator::{
    Advance, CookingSession, Progress, SessionOrchestrator, COMPLETION_MESSAGE,
    DEFAULT_AUTO_SUGGEST_THRESHOLD_MINUTES,
};
pub use voice::{VoiceCommand, VOICE_TIMER_LABEL};
