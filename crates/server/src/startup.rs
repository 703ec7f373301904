use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: wire stores and services from config, then serve HTTP until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&cfg.storage).await?;
    let app: Router = routes::build_router(state, build_cors());

    // host may be a name such as `localhost`, so let the resolver handle it
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, backend = ?cfg.storage.backend, "starting server");
    axum::serve(listener, app).await?;
    Ok(())
}
