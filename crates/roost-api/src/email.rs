use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use roost_db::models::UserRow;
use roost_db::queries;

pub const API_KEY_EMAIL_SUBJECT: &str = "Your new API key";

fn api_key_email_body(user: &UserRow, token: &str, expiry: &DateTime<Utc>) -> String {
    format!(
        "Hi {name},\n\n\
         An admin created an API key for your account.\n\n\
         API key: {token}\n\
         Valid until: {expiry}\n\n\
         Send it as a bearer token. Anyone holding this key can act as you, \
         so keep it private. It will not be shown again.\n",
        name = user.name,
        token = token,
        expiry = expiry.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// Queue the API key email on the caller's transaction. The key is only
/// ever delivered through this email.
pub fn send_api_key_email(
    conn: &Connection,
    user: &UserRow,
    token: &str,
    expiry: DateTime<Utc>,
) -> Result<()> {
    let body = api_key_email_body(user, token, &expiry);
    let id = queries::insert_email(conn, &user.email, API_KEY_EMAIL_SUBJECT, &body, Utc::now())?;
    info!(email_id = id, user_id = user.id, "Queued API key email");
    Ok(())
}
