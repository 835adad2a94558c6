use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use skycast::api::AppState;
use skycast::config::AppConfig;
use skycast::provider::OpenWeatherClient;
use skycast::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let provider = OpenWeatherClient::new(&config)?;
    let port = config.port;

    let state = AppState {
        provider: Arc::new(provider),
        config: Arc::new(config),
    };

    web::run(port, state).await
}
