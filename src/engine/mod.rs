//! Like/follow toggles and post aggregation.
//!
//! Engine functions own no state. Each call is one unit of work against the [`Store`],
//! bounded by the store deadline.
//!
//! [`Store`]: crate::store::Store

use thiserror::Error;

use crate::store::StoreError;

pub mod aggregate;
pub mod toggle;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("already following this user")]
    AlreadyFollowing,

    #[error("not following this user")]
    NotFollowing,

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::StoreUnavailable(StoreError::Sqlx(err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Followed,
    Unfollowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub like_count: i64,
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub following: bool,
    pub follower_count: i64,
}
