use anyhow::anyhow;
use chrono::NaiveDate;
use rusqlite::Connection;

use roost_db::columns::DATE_FORMAT;
use roost_db::models::UserRow;
use roost_db::queries;
use roost_types::api::UserDetails;

use crate::error::AdminError;

/// Resolve a username, email or numeric id, in that order of precedence.
pub fn resolve_user(conn: &Connection, token: &str) -> Result<UserRow, AdminError> {
    queries::user_by_username_or_email_or_id(conn, token)?.ok_or(AdminError::UserNotFound)
}

/// Re-read a user already resolved in this transaction.
pub fn reload_user(conn: &Connection, id: i64) -> Result<UserRow, AdminError> {
    queries::user_by_id(conn, id)?
        .ok_or_else(|| AdminError::Internal(anyhow!("user {} vanished mid-transaction", id)))
}

pub fn user_to_details(user: &UserRow) -> UserDetails {
    UserDetails {
        user_id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        gender: user.gender.clone(),
        birthdate: user.birthdate.format(DATE_FORMAT).to_string(),
        banned: user.is_banned,
        deleted: user.is_deleted,
    }
}

pub fn parse_birthdate(raw: &str) -> Result<NaiveDate, AdminError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| AdminError::InvalidBirthdate)
}

/// `Name (username, id)`, as used in chat exports.
pub fn format_user(user: &UserRow) -> String {
    format!("{} ({}, {})", user.name, user.username, user.id)
}
