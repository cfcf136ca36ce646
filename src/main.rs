use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use microblog::{
    app::{self, AppState},
    config::settings::Settings,
    store::Store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;

    let store = Store::connect(
        &settings.database_url,
        settings.max_connections,
        settings.store_timeout,
    )
    .await?;

    info!("database connected");

    let app = app::router(AppState {
        store,
        settings: settings.clone(),
    });

    info!("Server running on http://localhost:{}", settings.port);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
