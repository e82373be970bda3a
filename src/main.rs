use fleet_monitor::{http, seed_demo_data, InMemoryStore, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    info!(
        name = %settings.project_name,
        version = %settings.version,
        debug = settings.debug,
        "starting"
    );

    let store = InMemoryStore::new();
    if settings.seed_demo_data {
        seed_demo_data(&store)?;
    }

    http::serve(http::AppState::new(settings, store)).await?;
    Ok(())
}
