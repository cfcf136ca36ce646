use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::comments::Comment;

/// Comments on a post in insertion order.
pub async fn list_for_post<'e, E>(executor: E, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE post_id = ? ORDER BY rowid")
        .bind(post_id)
        .fetch_all(executor)
        .await
}

pub async fn insert<'e, E>(
    executor: E,
    post_id: Uuid,
    author_username: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Result<Comment, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, post_id, author_username, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(author_username)
    .bind(content)
    .bind(created_at)
    .fetch_one(executor)
    .await
}
