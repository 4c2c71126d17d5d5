use serde::{Deserialize, Serialize};

/// A user-facing notification. Admin procedures only enqueue these;
/// rendering and delivery happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: i64,
    /// Groups notifications for the user's preferences, e.g. `gender`.
    pub topic: String,
    /// Distinguishes notifications within a topic. Empty when there is only one.
    pub key: String,
    pub action: String,
    pub icon: String,
    pub title: String,
    pub link: String,
}
