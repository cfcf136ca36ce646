use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};

use crate::{auth, comments, config::settings::Settings, follows, posts, store::Store, users};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub settings: Settings,
}

impl FromRef<AppState> for Store {
    fn from_ref(app_state: &AppState) -> Store {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Settings {
    fn from_ref(app_state: &AppState) -> Settings {
        app_state.settings.clone()
    }
}

pub fn router(app_state: AppState) -> Router {
    let auth_router = Router::new()
        .route("/sign-in", post(auth::handler::login))
        .route("/sign-up", post(auth::handler::signup))
        .route("/me", get(auth::handler::get_me));

    let post_router = Router::new()
        .route(
            "/",
            post(posts::handler::create_post).get(posts::handler::get_feed),
        )
        .route(
            "/:id",
            get(posts::handler::get_post).delete(posts::handler::delete_post),
        )
        .route(
            "/:id/like",
            post(posts::handler::like_post).delete(posts::handler::unlike_post),
        )
        .route("/:id/comments", post(comments::handler::create_comment));

    let user_router = Router::new()
        .route("/:username", get(users::handler::get_user_profile))
        .route("/:username/avatar", get(users::handler::get_avatar))
        .route(
            "/:username/follow",
            post(follows::handler::follow_user).delete(follows::handler::unfollow_user),
        )
        .route("/:username/followers", get(follows::handler::get_followers))
        .route("/:username/following", get(follows::handler::get_following));

    Router::new()
        .route("/", get(|| async { "MicroBlog" }))
        .nest("/api/auth", auth_router)
        .nest("/api/posts", post_router)
        .nest("/api/users", user_router)
        .with_state(app_state)
}
