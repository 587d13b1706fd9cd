//! Sous: turns free-text recipes into timed, step-by-step cooking sessions.
//!
//! [`recipe`] parses raw text into a [`recipe::Recipe`]; [`session`] walks
//! through it while [`timers`] counts down. Everything observable is emitted
//! as a [`events::CookingEvent`] for the front ends, notifications and
//! speech to pick up.

pub mod app;
pub mod config;
pub mod events;
pub mod logging;
pub mod notifications;
pub mod recipe;
pub mod session;
pub mod speech;
pub mod timers;
pub mod ui;
