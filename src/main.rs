use ev_predictor_backend::{
    config::ServerConfig, registry::ModelRegistry, router, weather::WeatherClient, AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServerConfig::load()?;

    let registry = ModelRegistry::new(&cfg.model_dir);
    if cfg.preload_models {
        let failed = registry.preload();
        if failed.is_empty() {
            tracing::info!("all models preloaded from {}", registry.model_dir().display());
        } else {
            tracing::warn!("{} model(s) unavailable at startup; they will be retried on first use", failed.len());
        }
    }
    if cfg.weather.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; weather lookups will fail");
    }

    let weather = WeatherClient::new(&cfg.weather)?;
    let app = router(AppState::new(registry, weather));

    let addr = cfg.bind_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
