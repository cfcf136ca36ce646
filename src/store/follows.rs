use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::follows::FollowUserResponse;

/// Adds the edge. Returns false if `follower` already follows `following`.
pub async fn insert<'e, E>(
    executor: E,
    follower: &str,
    following: &str,
    created_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO followers (follower, following, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (follower, following) DO NOTHING
        "#,
    )
    .bind(follower)
    .bind(following)
    .bind(created_at)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Removes the edge. Returns false if there was no such edge.
pub async fn delete<'e, E>(
    executor: E,
    follower: &str,
    following: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM followers WHERE follower = ? AND following = ?")
        .bind(follower)
        .bind(following)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Whether the user with id `follower_id` currently follows `following`.
pub async fn is_following<'e, E>(
    executor: E,
    follower_id: Uuid,
    following: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM followers f
            JOIN users u ON u.username = f.follower
            WHERE u.id = ? AND f.following = ?
        )
        "#,
    )
    .bind(follower_id)
    .bind(following)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
pub async fn count_followers<'e, E>(executor: E, username: &str) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM followers WHERE following = ?")
        .bind(username)
        .fetch_one(executor)
        .await
}

/// Users following `username`, most recent first.
pub async fn followers_of<'e, E>(
    executor: E,
    username: &str,
) -> Result<Vec<FollowUserResponse>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, FollowUserResponse>(
        r#"
        SELECT u.username, u.avatar_url, f.created_at AS followed_at
        FROM followers f
        JOIN users u ON f.follower = u.username
        WHERE f.following = ?
        ORDER BY f.rowid DESC
        "#,
    )
    .bind(username)
    .fetch_all(executor)
    .await
}

/// Users that `username` follows, most recent first.
pub async fn following_of<'e, E>(
    executor: E,
    username: &str,
) -> Result<Vec<FollowUserResponse>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, FollowUserResponse>(
        r#"
        SELECT u.username, u.avatar_url, f.created_at AS followed_at
        FROM followers f
        JOIN users u ON f.following = u.username
        WHERE f.follower = ?
        ORDER BY f.rowid DESC
        "#,
    )
    .bind(username)
    .fetch_all(executor)
    .await
}
