pub mod app;
pub mod auth;
pub mod avatar;
pub mod comments;
pub mod config;
pub mod engine;
pub mod error;
pub mod follows;
pub mod posts;
pub mod response;
pub mod store;
pub mod users;
