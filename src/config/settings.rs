use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Upper bound for a single unit of work against the store.
    pub store_timeout: Duration,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let port: u16 = parse_or("PORT", 3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://microblog.db".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            port,
            addr,
            database_url,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            jwt_secret,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 1),
            store_timeout: Duration::from_millis(parse_or("STORE_TIMEOUT_MS", 5000)),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
