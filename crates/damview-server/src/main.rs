use damview_core::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize telemetry, shared state and routes
    let (_state, router) = damview_server::setup::initialize_app(config.clone()).await?;

    // Start the server
    damview_server::setup::server::start_server(&config, router).await?;

    Ok(())
}
