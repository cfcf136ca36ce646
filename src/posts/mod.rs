use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub mod handler;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub like_count: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PostFilter {
    pub sort: Option<String>, // "latest", "oldest" or "likes"
}

/// Response for like/unlike actions
#[derive(Debug, Serialize)]
pub struct LikeActionResponse {
    pub liked: bool,
    pub like_count: i64,
}
