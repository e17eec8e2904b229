use fitlog::api::routes::create_routes;
use fitlog::config::{run_migrations, AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;

    let app = create_routes(pool, &config.jwt_secret);

    let listener = TcpListener::bind(config.server_address()).await?;
    info!(
        environment = %config.environment,
        "Fitness API listening on http://{}",
        config.server_address()
    );
    info!(
        "Health check available at http://{}/health",
        config.server_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
