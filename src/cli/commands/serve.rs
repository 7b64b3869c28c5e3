use anyhow::Context;

use crate::cli::commands::seed::{self, Fixtures};
use crate::config::{config, AppConfig};
use crate::database::open_store;
use crate::server::app;
use crate::state::AppState;

pub async fn handle(port: Option<u16>, fixtures: Fixtures) -> anyhow::Result<()> {
    let mut config = config().clone();
    if let Some(port) = port {
        config.server.port = port;
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    tracing::info!("Starting web-shop API in {:?} mode", config.environment);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = prepare(config, &fixtures).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .await
        .context("server error")
}

/// Open the store and load any fixtures into it before it is shared with
/// the router
async fn prepare(config: AppConfig, fixtures: &Fixtures) -> anyhow::Result<AppState> {
    let store = open_store(&config.database)
        .await
        .context("failed to open store")?;

    if !fixtures.is_empty() {
        let seeded = seed::load(store.as_ref(), fixtures).await?;
        tracing::info!(
            "Loaded {} users and {} products from fixtures",
            seeded.users,
            seeded.products
        );
    }

    Ok(AppState::new(store, config))
}
