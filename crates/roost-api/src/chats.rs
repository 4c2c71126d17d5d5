//! Plain-text export of every conversation a user takes part in.
//!
//! The whole export reads from one connection (normally a read transaction,
//! so it sees one snapshot) and appends to one sink. Nothing is paginated.

use std::collections::HashMap;
use std::fmt::{Display, Write};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use roost_db::chats;
use roost_db::models::{MessageRow, UserRow};
use roost_db::queries;

use crate::users::format_user;

const CONVERSATION_BANNER: &str = "==============================";
const SECTION_BANNER: &str = "*************************************";
const MESSAGE_SEPARATOR: &str = "-----";
const CONVERSATION_GAP: &str = "\n\n\n\n";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
const TIME_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

/// Render all chats of `user_id` into `out`.
pub fn export_chats<W: Write>(conn: &Connection, user_id: i64, out: &mut W) -> Result<()> {
    ChatExporter {
        conn,
        out,
        users: HashMap::new(),
    }
    .write_all_chats(user_id)
}

struct ChatExporter<'a, W> {
    conn: &'a Connection,
    out: &'a mut W,
    /// Display strings of users already looked up.
    users: HashMap<i64, String>,
}

fn or_none<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// Seconds precision unless the time has a fractional part.
fn time(t: &DateTime<Utc>) -> String {
    let format = if t.timestamp_subsec_micros() == 0 {
        TIME_FORMAT
    } else {
        TIME_FORMAT_MICROS
    };
    t.format(format).to_string()
}

impl<W: Write> ChatExporter<'_, W> {
    fn user(&mut self, id: i64) -> Result<String> {
        if let Some(display) = self.users.get(&id) {
            return Ok(display.clone());
        }
        let user: UserRow =
            queries::user_by_id(self.conn, id)?.ok_or_else(|| anyhow!("User not found: {}", id))?;
        let display = format_user(&user);
        self.users.insert(id, display.clone());
        Ok(display)
    }

    fn write_all_chats(&mut self, user_id: i64) -> Result<()> {
        let user = self.user(user_id)?;
        writeln!(self.out, "Chats for user {}", user)?;

        let host_request_ids = chats::host_request_ids_for_user(self.conn, user_id)?;
        writeln!(self.out, "{} Requests ({})", SECTION_BANNER, host_request_ids.len())?;
        for id in host_request_ids {
            self.write_host_request(id)?;
        }

        let group_chat_ids = chats::group_chat_ids_for_user(self.conn, user_id)?;
        writeln!(self.out, "{} Group chats ({})", SECTION_BANNER, group_chat_ids.len())?;
        for id in group_chat_ids {
            self.write_group_chat(id)?;
        }

        Ok(())
    }

    fn write_host_request(&mut self, conversation_id: i64) -> Result<()> {
        let request = chats::host_request(self.conn, conversation_id)?;
        let surfer = self.user(request.surfer_user_id)?;
        let host = self.user(request.host_user_id)?;

        writeln!(self.out, "{}", CONVERSATION_BANNER)?;
        write!(
            self.out,
            "Host request {} from {} to {}.\nCurrent state = {}\n\nMessages:\n",
            request.conversation_id, surfer, host, request.status
        )?;
        self.write_conversation(request.conversation_id)?;
        self.out.write_str(CONVERSATION_GAP)?;
        Ok(())
    }

    fn write_group_chat(&mut self, conversation_id: i64) -> Result<()> {
        let chat = chats::group_chat(self.conn, conversation_id)?;
        let creator = self.user(chat.creator_id)?;

        writeln!(self.out, "{}", CONVERSATION_BANNER)?;
        write!(
            self.out,
            "Group chat {}. Created by {}, is_dm={}\nName: {}\nMembers:\n",
            chat.conversation_id,
            creator,
            chat.is_dm,
            or_none(chat.title.as_deref())
        )?;

        for sub in chats::group_chat_subscriptions(self.conn, chat.conversation_id)? {
            let member = self.user(sub.user_id)?;
            writeln!(
                self.out,
                "{} joined at {} (left at {}), role={}",
                member,
                time(&sub.joined_at),
                or_none(sub.left_at.as_ref().map(time)),
                sub.role
            )?;
        }

        self.out.write_str("\n\nMessages:\n")?;
        self.write_conversation(chat.conversation_id)?;
        self.out.write_str(CONVERSATION_GAP)?;
        Ok(())
    }

    fn write_conversation(&mut self, conversation_id: i64) -> Result<()> {
        for message in chats::messages_for_conversation(self.conn, conversation_id)? {
            self.write_message(&message)?;
        }
        self.out.write_str(CONVERSATION_GAP)?;
        Ok(())
    }

    fn write_message(&mut self, message: &MessageRow) -> Result<()> {
        let author = self.user(message.author_id)?;
        write!(
            self.out,
            "Message {} by {} at {}\nType={}, host_req_status_change={}\n\n",
            message.id,
            author,
            time(&message.time),
            message.message_type,
            or_none(message.host_request_status_target)
        )?;
        self.out.write_str(&or_none(message.text.as_deref()))?;
        write!(self.out, "\n\n{}\n", MESSAGE_SEPARATOR)?;
        Ok(())
    }
}
