use anyhow::anyhow;
use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tracing::error;

use roost_types::api::{
    ChangeUserBirthdateRequest, ChangeUserGenderRequest, Community, CreateCommunityRequest,
    GetChatsResponse, UserDetails, UserRequest,
};

use crate::admin::{Admin, AppState};
use crate::error::AdminError;
use crate::middleware::{AdminContext, require_admin};

/// All admin procedures, behind superuser authentication, plus `/health`.
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/get_user_details", post(get_user_details))
        .route("/admin/change_user_gender", post(change_user_gender))
        .route("/admin/change_user_birthdate", post(change_user_birthdate))
        .route("/admin/ban_user", post(ban_user))
        .route("/admin/delete_user", post(delete_user))
        .route("/admin/create_api_key", post(create_api_key))
        .route("/admin/create_community", post(create_community))
        .route("/admin/get_chats", post(get_chats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(admin_routes)
}

/// Run a procedure off the async runtime; every one of them blocks on SQLite.
async fn run_blocking<T, F>(state: AppState, f: F) -> Result<T, AdminError>
where
    F: FnOnce(&Admin) -> Result<T, AdminError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            AdminError::Internal(anyhow!("admin task failed"))
        })?
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn get_user_details(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.get_user_details(&req)).await.map(Json)
}

pub async fn change_user_gender(
    State(state): State<AppState>,
    body: Result<Json<ChangeUserGenderRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.change_user_gender(&req)).await.map(Json)
}

pub async fn change_user_birthdate(
    State(state): State<AppState>,
    body: Result<Json<ChangeUserBirthdateRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.change_user_birthdate(&req)).await.map(Json)
}

pub async fn ban_user(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.ban_user(&req)).await.map(Json)
}

pub async fn delete_user(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.delete_user(&req)).await.map(Json)
}

pub async fn create_api_key(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.create_api_key(&req)).await.map(Json)
}

pub async fn create_community(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminContext>,
    body: Result<Json<CreateCommunityRequest>, JsonRejection>,
) -> Result<Json<Community>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.create_community(caller.user_id, &req))
        .await
        .map(Json)
}

pub async fn get_chats(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<GetChatsResponse>, AdminError> {
    let Json(req) = body?;
    run_blocking(state, move |admin| admin.get_chats(&req)).await.map(Json)
}
