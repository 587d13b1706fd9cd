//! Notification integration trait definition.

use anyhow::Result;
use async_trait::async_trait;

use crate::events::CookingEvent;

/// One way of alerting the cook (desktop popup, terminal bell, ...).
#[async_trait]
pub trait NotificationIntegration: Send + Sync {
    /// Integration name (for logging)
    fn name(&self) -> &str;

    /// Whether this integration reacts to the given event at all
    fn handles_event(&self, event: &CookingEvent) -> bool;

    fn is_enabled(&self) -> bool;

    /// Deliver the alert. Failures are logged by the caller and never
    /// propagate into the session.
    async fn send(&self, event: &CookingEvent) -> Result<()>;
}
