use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::posts::Post;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// All posts in insertion order.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY rowid")
        .fetch_all(executor)
        .await
}

/// Posts written by `username`, in insertion order.
pub async fn list_by_author<'e, E>(executor: E, username: &str) -> Result<Vec<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE author_username = ? ORDER BY rowid")
        .bind(username)
        .fetch_all(executor)
        .await
}

pub async fn insert<'e, E>(
    executor: E,
    title: &str,
    content: &str,
    author_username: &str,
    created_at: DateTime<Utc>,
) -> Result<Post, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, title, content, author_username, created_at, like_count)
        VALUES (?, ?, ?, ?, ?, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(content)
    .bind(author_username)
    .bind(created_at)
    .fetch_one(executor)
    .await
}

/// Deletes a post; comments and likes go with it through the foreign keys.
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Moves the denormalized like counter and returns the new value.
pub async fn adjust_like_count<'e, E>(executor: E, id: Uuid, delta: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        "UPDATE posts SET like_count = like_count + ? WHERE id = ? RETURNING like_count",
    )
    .bind(delta)
    .bind(id)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{comments, likes, users, Store};
    use std::time::Duration;

    #[tokio::test]
    async fn delete_cascades_to_comments_and_likes() {
        let store = Store::in_memory(Duration::from_secs(5)).await.unwrap();
        let alice = users::insert(store.pool(), "alice", "hash-a", None, Utc::now())
            .await
            .unwrap();
        users::insert(store.pool(), "bob", "hash-b", None, Utc::now())
            .await
            .unwrap();
        let post = insert(store.pool(), "Title", "Body", "bob", Utc::now())
            .await
            .unwrap();

        comments::insert(store.pool(), post.id, "alice", "nice", Utc::now())
            .await
            .unwrap();
        assert!(likes::insert(store.pool(), alice.id, post.id).await.unwrap());

        assert!(delete(store.pool(), post.id).await.unwrap());
        assert!(!delete(store.pool(), post.id).await.unwrap());

        assert!(comments::list_for_post(store.pool(), post.id)
            .await
            .unwrap()
            .is_empty());
        assert!(!likes::exists(store.pool(), alice.id, post.id).await.unwrap());
    }

    #[tokio::test]
    async fn like_count_cannot_go_negative() {
        let store = Store::in_memory(Duration::from_secs(5)).await.unwrap();
        users::insert(store.pool(), "bob", "hash-b", None, Utc::now())
            .await
            .unwrap();
        let post = insert(store.pool(), "Title", "Body", "bob", Utc::now())
            .await
            .unwrap();

        assert!(adjust_like_count(store.pool(), post.id, -1).await.is_err());
        assert_eq!(adjust_like_count(store.pool(), post.id, 1).await.unwrap(), 1);
    }
}
