//! Idempotent membership flips paired with their denormalized counters.
//!
//! Likes are silently idempotent; follows report conflicts as `AlreadyFollowing` /
//! `NotFollowing` so callers can tell a no-op from a real toggle.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{EngineError, FollowOutcome, FollowState, LikeOutcome, LikeState};
use crate::store::{self, Store};

/// Puts the viewer's like on `post_id` into the `desired` state.
pub async fn set_like(
    store: &Store,
    viewer: Option<Uuid>,
    post_id: Uuid,
    desired: LikeState,
) -> Result<LikeOutcome, EngineError> {
    let viewer = viewer.ok_or(EngineError::Unauthenticated)?;
    store
        .bounded(apply_like(store.pool(), viewer, post_id, desired))
        .await
}

/// Puts the follower's edge towards `target` into the `desired` state.
pub async fn set_follow(
    store: &Store,
    follower: Option<Uuid>,
    target: &str,
    desired: FollowState,
) -> Result<FollowOutcome, EngineError> {
    let follower = follower.ok_or(EngineError::Unauthenticated)?;
    store
        .bounded(apply_follow(store.pool(), follower, target, desired))
        .await
}

async fn apply_like(
    pool: &SqlitePool,
    viewer_id: Uuid,
    post_id: Uuid,
    desired: LikeState,
) -> Result<LikeOutcome, EngineError> {
    let mut tx = store::begin_write(pool).await?;

    let viewer = store::users::find_by_id(&mut *tx, viewer_id)
        .await?
        .ok_or(EngineError::Unauthenticated)?;

    let post = store::posts::find_by_id(&mut *tx, post_id)
        .await?
        .ok_or(EngineError::NotFound("post"))?;

    if post.author_username == viewer.username {
        return Err(EngineError::Forbidden("cannot like your own post"));
    }

    // The primary key on post_likes decides whether the counter moves.
    let (changed, delta) = match desired {
        LikeState::Liked => (store::likes::insert(&mut *tx, viewer.id, post.id).await?, 1),
        LikeState::Unliked => (store::likes::delete(&mut *tx, viewer.id, post.id).await?, -1),
    };

    let like_count = if changed {
        store::posts::adjust_like_count(&mut *tx, post.id, delta).await?
    } else {
        post.like_count
    };

    tx.commit().await?;

    debug!(%post_id, user = %viewer.username, ?desired, changed, like_count, "like toggled");

    Ok(LikeOutcome {
        like_count,
        liked: desired == LikeState::Liked,
    })
}

async fn apply_follow(
    pool: &SqlitePool,
    follower_id: Uuid,
    target: &str,
    desired: FollowState,
) -> Result<FollowOutcome, EngineError> {
    let mut tx = store::begin_write(pool).await?;

    let follower = store::users::find_by_id(&mut *tx, follower_id)
        .await?
        .ok_or(EngineError::Unauthenticated)?;

    if follower.username == target {
        return Err(EngineError::Forbidden("cannot follow yourself"));
    }

    let target = store::users::find_by_username(&mut *tx, target)
        .await?
        .ok_or(EngineError::NotFound("user"))?;

    let follower_count = match desired {
        FollowState::Followed => {
            if !store::follows::insert(&mut *tx, &follower.username, &target.username, Utc::now())
                .await?
            {
                return Err(EngineError::AlreadyFollowing);
            }
            store::users::adjust_follower_count(&mut *tx, &target.username, 1).await?
        }
        FollowState::Unfollowed => {
            if !store::follows::delete(&mut *tx, &follower.username, &target.username).await? {
                return Err(EngineError::NotFollowing);
            }
            store::users::adjust_follower_count(&mut *tx, &target.username, -1).await?
        }
    };

    tx.commit().await?;

    debug!(
        follower = %follower.username,
        following = %target.username,
        ?desired,
        follower_count,
        "follow toggled"
    );

    Ok(FollowOutcome {
        following: desired == FollowState::Followed,
        follower_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use crate::posts::Post;
    use crate::store::StoreError;
    use std::time::Duration;

    async fn test_store() -> Store {
        Store::in_memory(Duration::from_secs(5)).await.unwrap()
    }

    async fn user(store: &Store, name: &str) -> User {
        store::users::insert(
            store.pool(),
            name,
            &format!("hash-{}", name),
            None,
            Utc::now(),
        )
        .await
        .unwrap()
    }

    async fn post_by(store: &Store, author: &User) -> Post {
        store::posts::insert(store.pool(), "Title", "Body", &author.username, Utc::now())
            .await
            .unwrap()
    }

    async fn follower_count(store: &Store, username: &str) -> i64 {
        store::users::find_by_username(store.pool(), username)
            .await
            .unwrap()
            .unwrap()
            .follower_count
    }

    #[tokio::test]
    async fn repeated_like_counts_once() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        for _ in 0..3 {
            let outcome = set_like(&store, Some(alice.id), post.id, LikeState::Liked)
                .await
                .unwrap();
            assert_eq!(outcome, LikeOutcome { like_count: 1, liked: true });
        }

        let stored = store::posts::find_by_id(store.pool(), post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(
            store::likes::count_for_post(store.pool(), post.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn like_then_unlike_restores_count() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        let carol = user(&store, "carol").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        set_like(&store, Some(carol.id), post.id, LikeState::Liked)
            .await
            .unwrap();

        let liked = set_like(&store, Some(alice.id), post.id, LikeState::Liked)
            .await
            .unwrap();
        assert_eq!(liked.like_count, 2);

        let unliked = set_like(&store, Some(alice.id), post.id, LikeState::Unliked)
            .await
            .unwrap();
        assert_eq!(unliked, LikeOutcome { like_count: 1, liked: false });

        assert!(!store::likes::exists(store.pool(), alice.id, post.id).await.unwrap());
        assert!(store::likes::exists(store.pool(), carol.id, post.id).await.unwrap());
    }

    #[tokio::test]
    async fn unlike_without_like_is_a_noop() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        let outcome = set_like(&store, Some(alice.id), post.id, LikeState::Unliked)
            .await
            .unwrap();

        assert_eq!(outcome, LikeOutcome { like_count: 0, liked: false });
    }

    #[tokio::test]
    async fn author_cannot_like_own_post() {
        let store = test_store().await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        for desired in [LikeState::Liked, LikeState::Unliked] {
            let err = set_like(&store, Some(bob.id), post.id, desired)
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::Forbidden(_)));
        }

        let stored = store::posts::find_by_id(store.pool(), post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 0);
    }

    #[tokio::test]
    async fn like_requires_viewer_and_post() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        let err = set_like(&store, None, post.id, LikeState::Liked)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthenticated));

        let err = set_like(&store, Some(Uuid::new_v4()), post.id, LikeState::Liked)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthenticated));

        let err = set_like(&store, Some(alice.id), Uuid::new_v4(), LikeState::Liked)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound("post")));
    }

    #[tokio::test]
    async fn concurrent_likes_from_one_user_count_once() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        let (a, b) = tokio::join!(
            set_like(&store, Some(alice.id), post.id, LikeState::Liked),
            set_like(&store, Some(alice.id), post.id, LikeState::Liked),
        );
        a.unwrap();
        b.unwrap();

        let stored = store::posts::find_by_id(store.pool(), post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_likes_from_many_users_on_a_file_store() {
        let path = std::env::temp_dir().join(format!("microblog-{}.db", Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let store = Store::connect(&url, 5, Duration::from_secs(5)).await.unwrap();

        let author = user(&store, "author").await;
        let post_id = post_by(&store, &author).await.id;
        let mut likers = Vec::new();
        for i in 0..20 {
            likers.push(user(&store, &format!("user{}", i)).await);
        }

        let tasks: Vec<_> = likers
            .iter()
            .map(|liker| {
                let (store, id) = (store.clone(), liker.id);
                tokio::spawn(async move {
                    set_like(&store, Some(id), post_id, LikeState::Liked).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store::posts::find_by_id(store.pool(), post_id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 20);
        assert_eq!(
            store::likes::count_for_post(store.pool(), post_id).await.unwrap(),
            20
        );

        store.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_follows_on_a_file_store() {
        let path = std::env::temp_dir().join(format!("microblog-{}.db", Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let store = Store::connect(&url, 5, Duration::from_secs(5)).await.unwrap();

        user(&store, "star").await;
        let mut fans = Vec::new();
        for i in 0..10 {
            fans.push(user(&store, &format!("fan{}", i)).await);
        }

        let tasks: Vec<_> = fans
            .iter()
            .map(|fan| {
                let (store, id) = (store.clone(), fan.id);
                tokio::spawn(async move {
                    set_follow(&store, Some(id), "star", FollowState::Followed).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(follower_count(&store, "star").await, 10);

        store.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn self_follow_is_forbidden() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;

        for desired in [FollowState::Followed, FollowState::Unfollowed] {
            let err = set_follow(&store, Some(alice.id), "alice", desired)
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::Forbidden(_)));
        }
        assert_eq!(follower_count(&store, "alice").await, 0);
    }

    #[tokio::test]
    async fn double_follow_conflicts_and_counts_once() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        user(&store, "bob").await;

        let first = set_follow(&store, Some(alice.id), "bob", FollowState::Followed)
            .await
            .unwrap();
        assert_eq!(first, FollowOutcome { following: true, follower_count: 1 });

        let err = set_follow(&store, Some(alice.id), "bob", FollowState::Followed)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyFollowing));

        assert_eq!(follower_count(&store, "bob").await, 1);
        assert_eq!(
            store::follows::count_followers(store.pool(), "bob").await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn follow_unfollow_unfollow_scenario() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;
        user(&store, "bob").await;

        set_follow(&store, Some(alice.id), "bob", FollowState::Followed)
            .await
            .unwrap();

        let outcome = set_follow(&store, Some(alice.id), "bob", FollowState::Unfollowed)
            .await
            .unwrap();
        assert_eq!(outcome, FollowOutcome { following: false, follower_count: 0 });

        let err = set_follow(&store, Some(alice.id), "bob", FollowState::Unfollowed)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFollowing));
        assert_eq!(follower_count(&store, "bob").await, 0);
        assert!(!store::follows::is_following(store.pool(), alice.id, "bob").await.unwrap());
    }

    #[tokio::test]
    async fn follow_requires_viewer_and_target() {
        let store = test_store().await;
        let alice = user(&store, "alice").await;

        let err = set_follow(&store, None, "alice", FollowState::Followed)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthenticated));

        let err = set_follow(&store, Some(alice.id), "nobody", FollowState::Followed)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound("user")));
    }

    #[tokio::test]
    async fn busy_store_surfaces_as_unavailable() {
        let store = Store::in_memory(Duration::from_millis(50)).await.unwrap();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let post = post_by(&store, &bob).await;

        // Hold the only connection so the toggle cannot start.
        let held = store.pool().acquire().await.unwrap();

        let err = set_like(&store, Some(alice.id), post.id, LikeState::Liked)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::StoreUnavailable(StoreError::TimedOut(_))
        ));

        drop(held);
        let stored = store::posts::find_by_id(store.pool(), post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 0);
    }
}
