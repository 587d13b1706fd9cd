//! Central notification service that dispatches events to all integrations.

use std::sync::Arc;

use super::bell_integration::BellIntegration;
use super::integration::NotificationIntegration;
use super::os_integration::OsIntegration;
use crate::config::Config;
use crate::events::{CookingEvent, CookingListener};

/// Receives cooking events and hands the ones the cook asked to hear about
/// to every enabled integration.
pub struct NotificationService {
    integrations: Vec<Arc<dyn NotificationIntegration>>,
    enabled: bool,
    on_timer_suggested: bool,
    on_timer_complete: bool,
    on_recipe_complete: bool,
}

impl NotificationService {
    pub fn from_config(config: &Config) -> Self {
        if !config.notifications.enabled {
            return Self::disabled();
        }

        let integrations: Vec<Arc<dyn NotificationIntegration>> = vec![
            Arc::new(OsIntegration::new(&config.notifications)),
            Arc::new(BellIntegration::from_config(config)),
        ];

        Self {
            integrations,
            enabled: config.notifications.enabled,
            on_timer_suggested: config.notifications.on_timer_suggested,
            on_timer_complete: config.notifications.on_timer_complete,
            on_recipe_complete: config.notifications.on_recipe_complete,
        }
    }

    /// A service that never notifies
    pub fn disabled() -> Self {
        Self {
            integrations: Vec::new(),
            enabled: false,
            on_timer_suggested: false,
            on_timer_complete: false,
            on_recipe_complete: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn integration_count(&self) -> usize {
        self.integrations.len()
    }

    /// Per-event toggles from `[notifications]`
    pub fn wants(&self, event: &CookingEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            CookingEvent::TimerSuggested { .. } => self.on_timer_suggested,
            CookingEvent::TimerCompleted { .. } => self.on_timer_complete,
            CookingEvent::RecipeCompleted { .. } => self.on_recipe_complete,
            _ => false,
        }
    }

    fn matching<'a>(
        &'a self,
        event: &'a CookingEvent,
    ) -> impl Iterator<Item = &'a Arc<dyn NotificationIntegration>> + 'a {
        self.integrations
            .iter()
            .filter(move |i| i.is_enabled() && i.handles_event(event))
    }
}

impl CookingListener for NotificationService {
    fn name(&self) -> &str {
        "notifications"
    }

    fn handles_event(&self, event: &CookingEvent) -> bool {
        self.wants(event)
    }

    /// Fire-and-forget: each integration runs on its own task
    fn on_event(&self, event: &CookingEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(
                event = %event.event_type(),
                "No tokio runtime available for notification"
            );
            return;
        };

        for integration in self.matching(event) {
            let integration = integration.clone();
            let event = event.clone();
            handle.spawn(deliver(integration, event));
        }
    }
}

async fn deliver(integration: Arc<dyn NotificationIntegration>, event: CookingEvent) {
    if let Err(e) = integration.send(&event).await {
        tracing::warn!(
            integration = %integration.name(),
            event = %event.event_type(),
            error = %e,
            "Notification delivery failed"
        );
    }
}
