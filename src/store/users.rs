use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::auth::User;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_username<'e, E>(
    executor: E,
    username: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_identity_hash<'e, E>(
    executor: E,
    identity_hash: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE auth_identity_hash = ?")
        .bind(identity_hash)
        .fetch_optional(executor)
        .await
}

/// Inserts a user. Fails with a unique violation if the username or identity is taken.
pub async fn insert<'e, E>(
    executor: E,
    username: &str,
    identity_hash: &str,
    avatar_url: Option<&str>,
    member_since: DateTime<Utc>,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, auth_identity_hash, avatar_url, member_since)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(identity_hash)
    .bind(avatar_url)
    .bind(member_since)
    .fetch_one(executor)
    .await
}

/// Moves the denormalized follower counter and returns the new value.
pub async fn adjust_follower_count<'e, E>(
    executor: E,
    username: &str,
    delta: i64,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        UPDATE users SET follower_count = follower_count + ?
        WHERE username = ?
        RETURNING follower_count
        "#,
    )
    .bind(delta)
    .bind(username)
    .fetch_one(executor)
    .await
}

/// Which unique column a failed insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taken {
    Username,
    Identity,
}

/// Classifies a unique-constraint failure from [`insert`]; `None` for any other error.
pub fn taken_by(err: &sqlx::Error) -> Option<Taken> {
    let db = err.as_database_error()?;
    if !db.is_unique_violation() {
        return None;
    }
    if db.message().contains("users.auth_identity_hash") {
        Some(Taken::Identity)
    } else {
        Some(Taken::Username)
    }
}
