use std::sync::Arc;

use chat_relay::config::RelayConfig;
use chat_relay::routes::configure_routes;
use chat_relay::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    tracing::info!(
        model = %config.generation.model,
        public_dir = %config.public_dir.display(),
        "starting chat relay"
    );

    let routes = configure_routes(Arc::new(state));
    let addr = config.socket_addr();

    tracing::info!("Server running on http://{}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
