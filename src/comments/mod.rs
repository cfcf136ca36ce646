use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub mod handler;

/// Database model for a comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Request payload for creating a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Comment must be between 1 and 10000 characters"
    ))]
    pub content: String,
}
