use std::{path::PathBuf, sync::Arc, time::Duration};

use anime_rec_api::{
    api::{create_router, AppState},
    config::Config,
    models::Catalog,
    services::{ensure_artifacts, ArtifactSources, HttpArtifactFetcher},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anime_rec_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let artifact_dir = PathBuf::from(&config.artifact_dir);
    let fetcher = HttpArtifactFetcher::new(http_client.clone());
    ensure_artifacts(&artifact_dir, &ArtifactSources::from_config(&config), &fetcher).await?;

    let catalog = tokio::task::spawn_blocking(move || Catalog::load(&artifact_dir)).await??;

    let state = AppState::from_config(&config, Arc::new(catalog), http_client);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
