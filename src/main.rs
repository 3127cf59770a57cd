use anyhow::Context;
use classificados::{
    config::{validate_production_config, ServerConfig, SessionConfig},
    db, routes, AppState,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "classificados=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    validate_production_config()?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("opening database")?;
    db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .map_err(anyhow::Error::msg)?;
    session_store
        .migrate()
        .await
        .context("creating session table")?;
    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = routes::build_router(AppState::new(pool), session_layer);

    let addr = config.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
