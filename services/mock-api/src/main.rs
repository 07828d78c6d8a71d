use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_api::{MockState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3001";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting mock API service");

    let addr = std::env::var("MOCK_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let app = create_router(MockState::seeded());

    let listener = TcpListener::bind(&addr).await?;
    info!("Mock API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
