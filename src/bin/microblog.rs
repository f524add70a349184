//! Microblog service binary.

use microblog::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting microblog");

    let config: Config = config::Config::builder()
        .add_source(config::File::with_name("microblog").required(false))
        .add_source(config::Environment::with_prefix("MICROBLOG"))
        .build()?
        .try_deserialize()
        .unwrap_or_default();

    info!(
        database = %config.database_url,
        page_size = config.page_size,
        "Configuration loaded"
    );

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::new(config).await?);

    let app = create_router(state);

    info!(address = %bind_address, "Listening");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
