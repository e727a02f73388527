use cpl_api::config::Config;
use cpl_api::router::create_router;
use cpl_api::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting CPL Analytics API service");

    let config = Config::from_env();
    let addr = SocketAddr::new(config.host, config.port);

    // Initialize application state
    let state = AppState::new(config);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
