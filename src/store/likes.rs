use sqlx::{Executor, Sqlite};
use uuid::Uuid;

/// Records that `user_id` likes `post_id`. Returns false if the like already existed.
pub async fn insert<'e, E>(executor: E, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO post_likes (user_id, post_id)
        VALUES (?, ?)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Removes the like. Returns false if there was nothing to remove.
pub async fn delete<'e, E>(executor: E, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM post_likes WHERE user_id = ? AND post_id = ?")
        .bind(user_id)
        .bind(post_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn exists<'e, E>(executor: E, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM post_likes WHERE user_id = ? AND post_id = ?)",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
pub async fn count_for_post<'e, E>(executor: E, post_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = ?")
        .bind(post_id)
        .fetch_one(executor)
        .await
}
