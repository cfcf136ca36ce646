use serde::Serialize;

use crate::posts::Post;

pub mod handler;

/// User profile with follow stats and their posts
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub username: String,
    pub avatar_url: Option<String>,
    pub member_since: chrono::DateTime<chrono::Utc>,
    pub followers_count: i64,
    pub is_following: bool, // Whether the current user follows this user
    pub posts: Vec<Post>,
}
