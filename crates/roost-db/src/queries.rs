use crate::Database;
use crate::columns::{self, date_to_sql, timestamp_to_sql};
use crate::models::{NewSession, NewUser, NotificationRow, QueuedEmailRow, SessionRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use roost_types::events::Notification;
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, username, email, name, gender, birthdate, is_banned, is_deleted, is_superuser, joined";

impl Database {
    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_id(conn, id))
    }

    /// Owner of an unexpired session, looked up by token digest.
    pub fn get_session_user(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<UserRow>> {
        self.with_conn(|conn| session_user(conn, token_hash, now))
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        gender: row.get(4)?,
        birthdate: columns::date(row, 5)?,
        is_banned: row.get(6)?,
        is_deleted: row.get(7)?,
        is_superuser: row.get(8)?,
        joined: columns::timestamp(row, 9)?,
    })
}

fn user_where(conn: &Connection, clause: &str, param: impl rusqlite::ToSql) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, clause);
    let row = conn
        .prepare_cached(&sql)?
        .query_row([param], user_from_row)
        .optional()?;
    Ok(row)
}

// -- Users --

pub fn insert_user(conn: &Connection, user: &NewUser<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, name, gender, birthdate, is_superuser, joined)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            user.username,
            user.email,
            user.name,
            user.gender,
            date_to_sql(&user.birthdate),
            user.is_superuser,
            timestamp_to_sql(&user.joined),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    user_where(conn, "id = ?1", id)
}

pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    user_where(conn, "username = ?1", username)
}

pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    user_where(conn, "email = ?1", email)
}

/// Resolve an admin-supplied identifier. Username wins over email, email
/// wins over numeric id.
pub fn user_by_username_or_email_or_id(conn: &Connection, token: &str) -> Result<Option<UserRow>> {
    if let Some(user) = user_by_username(conn, token)? {
        return Ok(Some(user));
    }
    if let Some(user) = user_by_email(conn, token)? {
        return Ok(Some(user));
    }
    match token.trim().parse::<i64>() {
        Ok(id) => user_by_id(conn, id),
        Err(_) => Ok(None),
    }
}

pub fn set_user_gender(conn: &Connection, id: i64, gender: &str) -> Result<()> {
    conn.execute("UPDATE users SET gender = ?1 WHERE id = ?2", rusqlite::params![gender, id])?;
    Ok(())
}

pub fn set_user_birthdate(conn: &Connection, id: i64, birthdate: &NaiveDate) -> Result<()> {
    conn.execute(
        "UPDATE users SET birthdate = ?1 WHERE id = ?2",
        rusqlite::params![date_to_sql(birthdate), id],
    )?;
    Ok(())
}

pub fn set_user_banned(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("UPDATE users SET is_banned = 1 WHERE id = ?1", [id])?;
    Ok(())
}

pub fn set_user_deleted(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("UPDATE users SET is_deleted = 1 WHERE id = ?1", [id])?;
    Ok(())
}

// -- Sessions --

pub fn insert_session(conn: &Connection, session: &NewSession<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created, expiry, long_lived, is_api_key)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            session.token_hash,
            session.user_id,
            timestamp_to_sql(&session.created),
            timestamp_to_sql(&session.expiry),
            session.long_lived,
            session.is_api_key,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn session_user(conn: &Connection, token_hash: &str, now: DateTime<Utc>) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT {} FROM users WHERE id = (
             SELECT user_id FROM sessions WHERE token_hash = ?1 AND expiry > ?2
         )",
        USER_COLUMNS
    );
    let row = conn
        .prepare_cached(&sql)?
        .query_row(rusqlite::params![token_hash, timestamp_to_sql(&now)], user_from_row)
        .optional()?;
    Ok(row)
}

pub fn sessions_for_user(conn: &Connection, user_id: i64) -> Result<Vec<SessionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, created, expiry, long_lived, is_api_key
         FROM sessions WHERE user_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                created: columns::timestamp(row, 2)?,
                expiry: columns::timestamp(row, 3)?,
                long_lived: row.get(4)?,
                is_api_key: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Outboxes --

pub fn insert_notification(conn: &Connection, n: &Notification, created: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications (user_id, topic, topic_key, action, icon, title, link, created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            n.user_id,
            n.topic,
            n.key,
            n.action,
            n.icon,
            n.title,
            n.link,
            timestamp_to_sql(&created),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn notifications_for_user(conn: &Connection, user_id: i64) -> Result<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, topic, topic_key, action, icon, title, link, created
         FROM notifications WHERE user_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok(NotificationRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                topic: row.get(2)?,
                key: row.get(3)?,
                action: row.get(4)?,
                icon: row.get(5)?,
                title: row.get(6)?,
                link: row.get(7)?,
                created: columns::timestamp(row, 8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_email(
    conn: &Connection,
    recipient: &str,
    subject: &str,
    body: &str,
    created: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO email_outbox (recipient, subject, body, created) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![recipient, subject, body, timestamp_to_sql(&created)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn queued_emails(conn: &Connection) -> Result<Vec<QueuedEmailRow>> {
    let mut stmt =
        conn.prepare("SELECT id, recipient, subject, body, created FROM email_outbox ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(QueuedEmailRow {
                id: row.get(0)?,
                recipient: row.get(1)?,
                subject: row.get(2)?,
                body: row.get(3)?,
                created: columns::timestamp(row, 4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
