use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use tracing::{info, warn};

use roost_db::{Database, queries};
use roost_types::api::{
    ChangeUserBirthdateRequest, ChangeUserGenderRequest, Community, CreateCommunityRequest,
    GetChatsResponse, UserDetails, UserRequest,
};
use roost_types::events::Notification;
use roost_types::geo::Geometry;

use crate::auth::{API_KEY_VALIDITY_DAYS, create_session};
use crate::chats::export_chats;
use crate::communities::{community_to_view, create_cluster, create_node};
use crate::email::send_api_key_email;
use crate::error::AdminError;
use crate::notify::{Urls, notify};
use crate::users::{parse_birthdate, reload_user, resolve_user, user_to_details};

pub type AppState = Arc<Admin>;

/// The admin procedures. Each call runs in its own transaction: either all of
/// its writes (including queued notifications and emails) commit, or none do.
pub struct Admin {
    db: Database,
    urls: Urls,
}

impl Admin {
    pub fn new(db: Database, urls: Urls) -> Self {
        Self { db, urls }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Notification from an admin action on the user's account.
    fn account_notification(&self, user_id: i64, topic: &str, action: &str, title: &str) -> Notification {
        Notification {
            user_id,
            topic: topic.to_string(),
            key: String::new(),
            action: action.to_string(),
            icon: "wrench".to_string(),
            title: title.to_string(),
            link: self.urls.account_settings_link(),
        }
    }

    pub fn get_user_details(&self, req: &UserRequest) -> Result<UserDetails, AdminError> {
        self.db.read_transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            Ok(user_to_details(&user))
        })
    }

    pub fn change_user_gender(&self, req: &ChangeUserGenderRequest) -> Result<UserDetails, AdminError> {
        self.db.transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            queries::set_user_gender(tx, user.id, &req.gender)?;

            notify(
                tx,
                &self.account_notification(user.id, "gender", "change", "An admin changed your gender"),
            )?;

            info!(user_id = user.id, "Admin changed user gender");
            Ok(user_to_details(&reload_user(tx, user.id)?))
        })
    }

    pub fn change_user_birthdate(
        &self,
        req: &ChangeUserBirthdateRequest,
    ) -> Result<UserDetails, AdminError> {
        self.db.transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            let birthdate = parse_birthdate(&req.birthdate)?;
            queries::set_user_birthdate(tx, user.id, &birthdate)?;

            notify(
                tx,
                &self.account_notification(
                    user.id,
                    "birthdate",
                    "change",
                    "An admin changed your birth date",
                ),
            )?;

            info!(user_id = user.id, "Admin changed user birthdate");
            Ok(user_to_details(&reload_user(tx, user.id)?))
        })
    }

    /// No notification is sent for bans.
    pub fn ban_user(&self, req: &UserRequest) -> Result<UserDetails, AdminError> {
        self.db.transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            queries::set_user_banned(tx, user.id)?;

            warn!(user_id = user.id, "Admin banned user");
            Ok(user_to_details(&reload_user(tx, user.id)?))
        })
    }

    /// Soft delete: the row stays, only the flag is set. No notification.
    pub fn delete_user(&self, req: &UserRequest) -> Result<UserDetails, AdminError> {
        self.db.transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            queries::set_user_deleted(tx, user.id)?;

            warn!(user_id = user.id, "Admin deleted user");
            Ok(user_to_details(&reload_user(tx, user.id)?))
        })
    }

    /// Issue a year-long API key and email it to the user. The key itself is
    /// not part of the response.
    pub fn create_api_key(&self, req: &UserRequest) -> Result<UserDetails, AdminError> {
        self.db.transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;
            let (token, expiry) = create_session(
                tx,
                user.id,
                true,
                true,
                Duration::days(API_KEY_VALIDITY_DAYS),
            )?;
            send_api_key_email(tx, &user, &token, expiry)?;

            notify(
                tx,
                &self.account_notification(
                    user.id,
                    "api_key",
                    "create",
                    "An admin created an API key for you, please check your email",
                ),
            )?;

            info!(user_id = user.id, "Admin created API key");
            Ok(user_to_details(&user))
        })
    }

    /// Create a community on a new node. `creator_id` is the calling admin.
    pub fn create_community(
        &self,
        creator_id: i64,
        req: &CreateCommunityRequest,
    ) -> Result<Community, AdminError> {
        let geom = Geometry::parse(&req.geojson).context("parsing community geometry")?;
        if !geom.is_multi_polygon() {
            return Err(AdminError::NoMultiPolygon);
        }

        let parent_node_id = (req.parent_node_id != 0).then_some(req.parent_node_id);

        self.db.transaction(|tx| -> Result<_, AdminError> {
            let node_id = create_node(tx, &geom, parent_node_id)?;
            create_cluster(
                tx,
                node_id,
                &req.name,
                &req.description,
                creator_id,
                &req.admin_ids,
                true,
            )?;

            info!(node_id, creator_id, name = %req.name, "Admin created community");
            Ok(community_to_view(tx, node_id, creator_id)?)
        })
    }

    pub fn get_chats(&self, req: &UserRequest) -> Result<GetChatsResponse, AdminError> {
        self.db.read_transaction(|tx| -> Result<_, AdminError> {
            let user = resolve_user(tx, &req.user)?;

            let mut response = String::new();
            export_chats(tx, user.id, &mut response)?;

            info!(user_id = user.id, bytes = response.len(), "Admin exported chats");
            Ok(GetChatsResponse { response })
        })
    }
}
