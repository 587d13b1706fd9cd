use anyhow::Result;
use notify_rust::{Notification, Urgency};

pub fn send_notification(title: &str, subtitle: &str, message: &str, sound: bool) -> Result<()> {
    // freedesktop has no subtitle field
    let body = if subtitle.is_empty() {
        message.to_string()
    } else {
        format!("{}\n{}", subtitle, message)
    };

    let mut notification = Notification::new();
    notification
        .summary(title)
        .body(&body)
        .appname("sous")
        .urgency(Urgency::Normal);

    if sound {
        notification.sound_name("complete");
    }

    notification.show()?;
    Ok(())
}
