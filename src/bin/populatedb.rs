//! Seeds the database with a couple of users and posts.

use std::env;
use std::time::Duration;

use anyhow::Context;
use chrono::{TimeZone, Utc};
use dotenv::dotenv;
use tracing::info;

use microblog::{
    auth::{avatar_path, identity::hash_identity},
    store::{self, Store},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://microblog.db".to_string());
    let store = Store::connect(&database_url, 1, Duration::from_secs(30)).await?;

    let users = [
        ("user1", "google-subject-1", Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)),
        ("user2", "google-subject-2", Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0)),
    ];

    for (username, identity, member_since) in users {
        if store::users::find_by_username(store.pool(), username)
            .await?
            .is_some()
        {
            info!(username, "user exists, skipping");
            continue;
        }
        store::users::insert(
            store.pool(),
            username,
            &hash_identity(identity),
            Some(avatar_path(username).as_str()),
            member_since.single().context("invalid seed timestamp")?,
        )
        .await?;
    }

    let posts = [
        (
            "First Post",
            "This is the first post",
            "user1",
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0),
        ),
        (
            "Second Post",
            "This is the second post",
            "user2",
            Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0),
        ),
    ];

    let existing = store::posts::list_all(store.pool()).await?;
    for (title, content, author, created_at) in posts {
        if existing.iter().any(|p| p.title == title && p.author_username == author) {
            continue;
        }
        store::posts::insert(
            store.pool(),
            title,
            content,
            author,
            created_at.single().context("invalid seed timestamp")?,
        )
        .await?;
    }

    info!("Database populated with initial data.");
    Ok(())
}
