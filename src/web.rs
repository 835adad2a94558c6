//! HTTP server bootstrap.

use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

pub async fn run(port: u16, state: AppState) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Weather dashboard running at http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
