use member_search::{app, config::AppConfig, seed, setup_database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,member_search=debug,tower_http=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let db = setup_database(&config.database_url).await?;
    if config.seed_sample_data {
        seed::seed_sample_data(&db).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "serving /v1/members, /v2/members, /v3/members");
    axum::serve(listener, app(db)).await?;
    Ok(())
}
