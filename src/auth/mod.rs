use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub mod handler;
pub mod identity;
pub mod jwt;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub auth_identity_hash: String,
    pub avatar_url: Option<String>,
    pub member_since: chrono::DateTime<chrono::Utc>,
    pub follower_count: i64,
}

/// Claims a username for an external identity that has no account yet.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "Identity cannot be empty"))]
    pub identity: String,
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters"
    ))]
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Identity cannot be empty"))]
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub member_since: chrono::DateTime<chrono::Utc>,
    pub follower_count: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            member_since: user.member_since,
            follower_count: user.follower_count,
        }
    }
}

/// Public path of the generated avatar for `username`.
pub fn avatar_path(username: &str) -> String {
    format!("/api/users/{}/avatar", username)
}
