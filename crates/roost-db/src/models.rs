//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the roost-types API models so the DB layer stays independent.

use chrono::{DateTime, NaiveDate, Utc};
use roost_types::models::{GroupChatRole, HostRequestStatus, MessageType};

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub is_banned: bool,
    pub is_deleted: bool,
    pub is_superuser: bool,
    pub joined: DateTime<Utc>,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub gender: &'a str,
    pub birthdate: NaiveDate,
    pub is_superuser: bool,
    pub joined: DateTime<Utc>,
}

/// Session metadata. The token itself is never stored, only its digest.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: i64,
    pub user_id: i64,
    pub created: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub long_lived: bool,
    pub is_api_key: bool,
}

pub struct NewSession<'a> {
    pub token_hash: &'a str,
    pub user_id: i64,
    pub created: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub long_lived: bool,
    pub is_api_key: bool,
}

#[derive(Debug, Clone)]
pub struct NodeRow {
    pub id: i64,
    pub parent_node_id: Option<i64>,
    /// GeoJSON MultiPolygon.
    pub geom: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClusterRow {
    pub id: i64,
    pub parent_node_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_official_cluster: bool,
    pub created: DateTime<Utc>,
}

pub struct NewCluster<'a> {
    pub parent_node_id: i64,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub is_official_cluster: bool,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct HostRequestRow {
    pub conversation_id: i64,
    pub surfer_user_id: i64,
    pub host_user_id: i64,
    pub status: HostRequestStatus,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

pub struct NewHostRequest {
    pub surfer_user_id: i64,
    pub host_user_id: i64,
    pub status: HostRequestStatus,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GroupChatRow {
    pub conversation_id: i64,
    pub title: Option<String>,
    pub is_dm: bool,
    pub creator_id: i64,
}

#[derive(Debug, Clone)]
pub struct GroupChatSubscriptionRow {
    pub id: i64,
    pub user_id: i64,
    pub group_chat_id: i64,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    pub role: GroupChatRole,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub conversation_id: i64,
    pub author_id: i64,
    pub time: DateTime<Utc>,
    pub message_type: MessageType,
    pub text: Option<String>,
    pub host_request_status_target: Option<HostRequestStatus>,
}

pub struct NewMessage<'a> {
    pub conversation_id: i64,
    pub author_id: i64,
    pub time: DateTime<Utc>,
    pub message_type: MessageType,
    pub text: Option<&'a str>,
    pub host_request_status_target: Option<HostRequestStatus>,
}

#[derive(Debug, Clone)]
pub struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub key: String,
    pub action: String,
    pub icon: String,
    pub title: String,
    pub link: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QueuedEmailRow {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created: DateTime<Utc>,
}
