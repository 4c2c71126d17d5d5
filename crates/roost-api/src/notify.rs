use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use roost_db::queries;
use roost_types::events::Notification;

/// Public URLs that notifications and emails link to.
#[derive(Debug, Clone)]
pub struct Urls {
    base_url: String,
}

impl Urls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn account_settings_link(&self) -> String {
        format!("{}/account-settings", self.base_url)
    }
}

/// Queue a notification on the caller's transaction. It is only visible to
/// the delivery side once that transaction commits.
pub fn notify(conn: &Connection, notification: &Notification) -> Result<()> {
    let id = queries::insert_notification(conn, notification, Utc::now())?;
    info!(
        notification_id = id,
        user_id = notification.user_id,
        topic = %notification.topic,
        action = %notification.action,
        "Queued notification"
    );
    Ok(())
}
