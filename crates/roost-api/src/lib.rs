pub mod admin;
pub mod auth;
pub mod chats;
pub mod communities;
pub mod email;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod users;

pub use admin::{Admin, AppState};
pub use error::AdminError;
