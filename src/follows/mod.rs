use serde::Serialize;

pub mod handler;

/// Response for a user in followers/following lists
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FollowUserResponse {
    pub username: String,
    pub avatar_url: Option<String>,
    pub followed_at: chrono::DateTime<chrono::Utc>,
}

/// Response for follow/unfollow actions
#[derive(Debug, Serialize)]
pub struct FollowActionResponse {
    pub following: bool,
    pub followers_count: i64,
}
