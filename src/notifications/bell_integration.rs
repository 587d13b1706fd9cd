//! Audible terminal bell when a timer goes off.

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::integration::NotificationIntegration;
use crate::config::Config;
use crate::events::CookingEvent;

const BEL: &[u8] = b"\x07";

pub struct BellIntegration {
    enabled: bool,
}

impl BellIntegration {
    /// Rings only when notification sound is on and timer volume is non-zero
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.notifications.sound && config.timers.volume > 0,
        }
    }
}

#[async_trait]
impl NotificationIntegration for BellIntegration {
    fn name(&self) -> &str {
        "bell"
    }

    fn handles_event(&self, event: &CookingEvent) -> bool {
        matches!(event, CookingEvent::TimerCompleted { .. })
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, _event: &CookingEvent) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(BEL).context("Failed to ring terminal bell")?;
        stdout.flush().context("Failed to ring terminal bell")?;
        Ok(())
    }
}
