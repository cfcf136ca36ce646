use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use super::EngineError;
use crate::comments::Comment;
use crate::posts::Post;
use crate::store::{self, Store};

/// A post with everything needed to display it to one viewer.
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub is_following_author: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Latest,
    Oldest,
    Likes,
}

impl FromStr for SortMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortMode::Latest),
            "oldest" => Ok(SortMode::Oldest),
            "likes" => Ok(SortMode::Likes),
            _ => Err(()),
        }
    }
}

impl SortMode {
    /// Reads a `?sort=` value, falling back to [`SortMode::Latest`].
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

/// Stable sort, so ties keep their fetch order.
pub fn sort_posts(posts: &mut [Post], mode: SortMode) {
    match mode {
        SortMode::Latest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Likes => posts.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
    }
}

pub async fn build_post_view(
    store: &Store,
    post: Post,
    viewer: Option<Uuid>,
) -> Result<PostView, EngineError> {
    store
        .bounded(async {
            // One read transaction so comments and the follow flag come from the same snapshot.
            let mut tx = store.pool().begin().await?;

            let mut comments = store::comments::list_for_post(&mut *tx, post.id).await?;
            comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let is_following_author = match viewer {
                Some(viewer) => {
                    store::follows::is_following(&mut *tx, viewer, &post.author_username).await?
                }
                None => false,
            };

            tx.commit().await?;

            Ok::<_, EngineError>(PostView {
                post,
                comments,
                is_following_author,
            })
        })
        .await
}

pub async fn list_posts(store: &Store, mode: SortMode) -> Result<Vec<Post>, EngineError> {
    let mut posts = store.run(store::posts::list_all(store.pool())).await?;
    sort_posts(&mut posts, mode);
    Ok(posts)
}

/// Posts by `username`, latest first.
pub async fn list_posts_by_author(store: &Store, username: &str) -> Result<Vec<Post>, EngineError> {
    let mut posts = store
        .run(store::posts::list_by_author(store.pool(), username))
        .await?;
    sort_posts(&mut posts, SortMode::Latest);
    Ok(posts)
}
