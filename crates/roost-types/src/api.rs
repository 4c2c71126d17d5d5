use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Users --

/// Any procedure addressing a single user by username, email or numeric id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserRequest {
    pub user: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeUserGenderRequest {
    pub user: String,
    pub gender: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeUserBirthdateRequest {
    pub user: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub birthdate: String,
}

/// What an admin sees about a user. Credentials never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserDetails {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub gender: String,
    pub birthdate: String,
    pub banned: bool,
    pub deleted: bool,
}

// -- Communities --

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: String,
    pub geojson: String,
    /// `0` creates a root community.
    #[serde(default)]
    pub parent_node_id: i64,
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommunityParent {
    pub community_id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Community {
    pub community_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created: DateTime<Utc>,
    /// Ancestors ordered from the root down to the direct parent.
    pub parents: Vec<CommunityParent>,
    pub member: bool,
    pub admin: bool,
    pub member_count: u64,
    pub admin_count: u64,
    pub main_page_title: Option<String>,
}

// -- Chats --

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetChatsResponse {
    pub response: String,
}

// -- Errors --

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
