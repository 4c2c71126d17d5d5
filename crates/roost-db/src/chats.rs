use crate::columns::{self, date_to_sql, timestamp_to_sql};
use crate::models::{
    GroupChatRow, GroupChatSubscriptionRow, HostRequestRow, MessageRow, NewHostRequest, NewMessage,
};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use roost_types::models::GroupChatRole;
use rusqlite::{Connection, OptionalExtension};

// -- Writes --

pub fn insert_conversation(conn: &Connection, created: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO conversations (created) VALUES (?1)",
        [timestamp_to_sql(&created)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Creates the conversation and its host request; returns the conversation id.
pub fn insert_host_request(conn: &Connection, req: &NewHostRequest) -> Result<i64> {
    let conversation_id = insert_conversation(conn, req.created)?;
    conn.execute(
        "INSERT INTO host_requests (conversation_id, surfer_user_id, host_user_id, status, from_date, to_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            conversation_id,
            req.surfer_user_id,
            req.host_user_id,
            req.status.as_str(),
            date_to_sql(&req.from_date),
            date_to_sql(&req.to_date),
        ],
    )?;
    Ok(conversation_id)
}

/// Creates the conversation and its group chat; returns the conversation id.
pub fn insert_group_chat(
    conn: &Connection,
    title: Option<&str>,
    is_dm: bool,
    creator_id: i64,
    created: DateTime<Utc>,
) -> Result<i64> {
    let conversation_id = insert_conversation(conn, created)?;
    conn.execute(
        "INSERT INTO group_chats (conversation_id, title, is_dm, creator_id) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![conversation_id, title, is_dm, creator_id],
    )?;
    Ok(conversation_id)
}

pub fn insert_group_chat_subscription(
    conn: &Connection,
    user_id: i64,
    group_chat_id: i64,
    joined_at: DateTime<Utc>,
    left_at: Option<DateTime<Utc>>,
    role: GroupChatRole,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO group_chat_subscriptions (user_id, group_chat_id, joined_at, left_at, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            user_id,
            group_chat_id,
            timestamp_to_sql(&joined_at),
            left_at.as_ref().map(timestamp_to_sql),
            role.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_message(conn: &Connection, msg: &NewMessage<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO messages (conversation_id, author_id, time, message_type, text, host_request_status_target)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            msg.conversation_id,
            msg.author_id,
            timestamp_to_sql(&msg.time),
            msg.message_type.as_str(),
            msg.text,
            msg.host_request_status_target.map(|s| s.as_str()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// -- Reads --

/// Host requests where the user is surfer or host, in whatever order the
/// store returns them.
pub fn host_request_ids_for_user(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT conversation_id FROM host_requests
         WHERE host_user_id = ?1 OR surfer_user_id = ?1",
    )?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn host_request(conn: &Connection, conversation_id: i64) -> Result<HostRequestRow> {
    conn.prepare_cached(
        "SELECT conversation_id, surfer_user_id, host_user_id, status, from_date, to_date
         FROM host_requests WHERE conversation_id = ?1",
    )?
    .query_row([conversation_id], |row| {
        Ok(HostRequestRow {
            conversation_id: row.get(0)?,
            surfer_user_id: row.get(1)?,
            host_user_id: row.get(2)?,
            status: columns::text_enum(row, 3)?,
            from_date: columns::date(row, 4)?,
            to_date: columns::date(row, 5)?,
        })
    })
    .optional()?
    .ok_or_else(|| anyhow!("Host request not found: {}", conversation_id))
}

/// Group chats the user has joined, one entry per subscription, oldest join
/// first.
pub fn group_chat_ids_for_user(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT group_chat_id FROM group_chat_subscriptions
         WHERE user_id = ?1
         ORDER BY joined_at ASC, id ASC",
    )?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn group_chat(conn: &Connection, conversation_id: i64) -> Result<GroupChatRow> {
    conn.prepare_cached(
        "SELECT conversation_id, title, is_dm, creator_id FROM group_chats WHERE conversation_id = ?1",
    )?
    .query_row([conversation_id], |row| {
        Ok(GroupChatRow {
            conversation_id: row.get(0)?,
            title: row.get(1)?,
            is_dm: row.get(2)?,
            creator_id: row.get(3)?,
        })
    })
    .optional()?
    .ok_or_else(|| anyhow!("Group chat not found: {}", conversation_id))
}

pub fn group_chat_subscriptions(
    conn: &Connection,
    group_chat_id: i64,
) -> Result<Vec<GroupChatSubscriptionRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, group_chat_id, joined_at, left_at, role
         FROM group_chat_subscriptions
         WHERE group_chat_id = ?1
         ORDER BY joined_at ASC, id ASC",
    )?;
    let rows = stmt
        .query_map([group_chat_id], |row| {
            Ok(GroupChatSubscriptionRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                group_chat_id: row.get(2)?,
                joined_at: columns::timestamp(row, 3)?,
                left_at: columns::optional_timestamp(row, 4)?,
                role: columns::text_enum(row, 5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Full transcript of a conversation, ascending message id. No limit.
pub fn messages_for_conversation(conn: &Connection, conversation_id: i64) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, conversation_id, author_id, time, message_type, text, host_request_status_target
         FROM messages
         WHERE conversation_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map([conversation_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                conversation_id: row.get(1)?,
                author_id: row.get(2)?,
                time: columns::timestamp(row, 3)?,
                message_type: columns::text_enum(row, 4)?,
                text: row.get(5)?,
                host_request_status_target: columns::optional_text_enum(row, 6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::models::NewUser;
    use crate::queries::insert_user;
    use chrono::{NaiveDate, TimeZone};
    use roost_types::models::{HostRequestStatus, MessageType};

    fn user(conn: &Connection, username: &str) -> i64 {
        insert_user(
            conn,
            &NewUser {
                username,
                email: &format!("{}@example.com", username),
                name: username,
                gender: "Woman",
                birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                is_superuser: false,
                joined: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            },
        )
        .unwrap()
    }

    #[test]
    fn group_chats_come_back_in_join_order() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = user(conn, "alice");
            let t = |h| Utc.with_ymd_and_hms(2021, 5, 1, h, 0, 0).unwrap();

            let late = insert_group_chat(conn, Some("late"), false, alice, t(1))?;
            let early = insert_group_chat(conn, Some("early"), false, alice, t(1))?;
            insert_group_chat_subscription(conn, alice, late, t(9), None, GroupChatRole::Admin)?;
            insert_group_chat_subscription(conn, alice, early, t(3), None, GroupChatRole::Admin)?;

            assert_eq!(group_chat_ids_for_user(conn, alice)?, vec![early, late]);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn host_requests_match_either_party() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let surfer = user(conn, "surfer");
            let host = user(conn, "host");
            let other = user(conn, "other");
            let id = insert_host_request(
                conn,
                &NewHostRequest {
                    surfer_user_id: surfer,
                    host_user_id: host,
                    status: HostRequestStatus::Pending,
                    from_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
                    to_date: NaiveDate::from_ymd_opt(2021, 6, 3).unwrap(),
                    created: Utc::now(),
                },
            )?;

            assert_eq!(host_request_ids_for_user(conn, surfer)?, vec![id]);
            assert_eq!(host_request_ids_for_user(conn, host)?, vec![id]);
            assert!(host_request_ids_for_user(conn, other)?.is_empty());
            assert_eq!(host_request(conn, id)?.status, HostRequestStatus::Pending);
            assert!(host_request(conn, id + 100).is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn messages_keep_optional_columns() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let alice = user(conn, "alice");
            let chat = insert_group_chat(conn, None, true, alice, Utc::now())?;
            insert_message(
                conn,
                &NewMessage {
                    conversation_id: chat,
                    author_id: alice,
                    time: Utc::now(),
                    message_type: MessageType::ChatCreated,
                    text: None,
                    host_request_status_target: None,
                },
            )?;
            insert_message(
                conn,
                &NewMessage {
                    conversation_id: chat,
                    author_id: alice,
                    time: Utc::now(),
                    message_type: MessageType::HostRequestStatusChanged,
                    text: Some("ok"),
                    host_request_status_target: Some(HostRequestStatus::Accepted),
                },
            )?;

            let messages = messages_for_conversation(conn, chat)?;
            assert_eq!(messages.len(), 2);
            assert!(messages[0].id < messages[1].id);
            assert_eq!(messages[0].text, None);
            assert_eq!(
                messages[1].host_request_status_target,
                Some(HostRequestStatus::Accepted)
            );
            Ok(())
        })
        .unwrap();
    }
}
