//! Desktop and terminal alerts for cooking events.
//!
//! [`NotificationService`] subscribes to the event bus and fans the events
//! it cares about out to every enabled [`NotificationIntegration`].

use anyhow::Result;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

mod bell_integration;
mod integration;
mod os_integration;
mod service;

pub use bell_integration::BellIntegration;
pub use integration::NotificationIntegration;
pub use os_integration::OsIntegration;
pub use service::NotificationService;

/// Show a desktop notification with the platform-specific backend.
pub fn send_os_notification(title: &str, subtitle: &str, message: &str, sound: bool) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        macos::send_notification(title, subtitle, message, sound)
    }

    #[cfg(target_os = "linux")]
    {
        linux::send_notification(title, subtitle, message, sound)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = sound;
        tracing::info!("Notification: {} - {} - {}", title, subtitle, message);
        Ok(())
    }
}
