//! Desktop notification integration (macOS/Linux).

use anyhow::Result;
use async_trait::async_trait;

use super::integration::NotificationIntegration;
use crate::config::NotificationsConfig;
use crate::events::CookingEvent;

/// Sends popups through the platform's notification center:
/// - macOS: `mac-notification-sys`
/// - Linux: `notify-rust` (freedesktop notifications)
pub struct OsIntegration {
    enabled: bool,
    sound: bool,
}

impl OsIntegration {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            sound: config.sound,
        }
    }
}

#[async_trait]
impl NotificationIntegration for OsIntegration {
    fn name(&self) -> &str {
        "os"
    }

    fn handles_event(&self, event: &CookingEvent) -> bool {
        event.to_os_notification().is_some()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, event: &CookingEvent) -> Result<()> {
        let Some((title, subtitle, message)) = event.to_os_notification() else {
            return Ok(());
        };

        // notify-rust talks D-Bus synchronously
        let sound = self.sound;
        let result = tokio::task::spawn_blocking(move || {
            super::send_os_notification(&title, &subtitle, &message, sound)
        })
        .await?;

        if let Err(e) = result {
            tracing::warn!(
                integration = "os",
                event = %event.event_type(),
                error = %e,
                "Failed to send OS notification"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_integration_from_config() {
        let config = crate::config::Config::default();
        let integration = OsIntegration::new(&config.notifications);

        assert!(integration.is_enabled());
        assert_eq!(integration.name(), "os");
    }

    #[test]
    fn test_os_integration_follows_enabled_flag() {
        let mut config = crate::config::Config::default();
        config.notifications.enabled = false;
        assert!(!OsIntegration::new(&config.notifications).is_enabled());
    }

    #[test]
    fn test_handles_only_notifiable_events() {
        let integration = OsIntegration::new(&crate::config::Config::default().notifications);

        assert!(integration.handles_event(&CookingEvent::TimerCompleted {
            timer_id: 1,
            label: "Pasta".into(),
        }));
        assert!(integration.handles_event(&CookingEvent::RecipeCompleted {
            title: "Pasta".into(),
        }));
        assert!(!integration.handles_event(&CookingEvent::TimerTick {
            timer_id: 1,
            remaining_seconds: 30,
        }));
        assert!(!integration.handles_event(&CookingEvent::Announcement {
            text: "Moving to next step".into(),
        }));
    }
}
