use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{error, warn};

use crate::admin::AppState;
use crate::auth::hash_token;
use crate::error::AdminError;

/// The authenticated admin making the current call.
#[derive(Debug, Clone, Copy)]
pub struct AdminContext {
    pub user_id: i64,
}

/// Require a bearer session token belonging to an active superuser.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AdminError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AdminError::Unauthenticated)?;

    let token_hash = hash_token(token.trim());
    let user = tokio::task::spawn_blocking(move || state.db().get_session_user(&token_hash, Utc::now()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            AdminError::Internal(anyhow!("session lookup task failed"))
        })??
        .ok_or(AdminError::Unauthenticated)?;

    if user.is_banned || user.is_deleted {
        warn!(user_id = user.id, "Rejected session of banned or deleted user");
        return Err(AdminError::Unauthenticated);
    }
    if !user.is_superuser {
        warn!(user_id = user.id, "Non-superuser called an admin procedure");
        return Err(AdminError::PermissionDenied);
    }

    req.extensions_mut().insert(AdminContext { user_id: user.id });
    Ok(next.run(req).await)
}
