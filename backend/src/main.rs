use backend::{
    AppState, cache::CachedDirections, config::Config, create_router,
    directions::GoogleDirections,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=info,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    if config.api_key().is_none() {
        tracing::warn!("MAPS_API_KEY is not set; the map will not load and routing is disabled");
    }

    let directions = GoogleDirections::new(
        config.directions_url.clone(),
        config.api_key(),
        config.upstream_timeout(),
    )?;
    let provider = CachedDirections::new(directions, config.cache_size);
    tracing::info!(
        upstream = %config.directions_url,
        cache_size = config.cache_size,
        "directions provider ready"
    );

    let app = create_router(AppState::new(provider, config.maps_config()));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("starting backend on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
