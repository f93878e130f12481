use anyhow::Result;
use job_recommender::config::EnvironmentConfig;
use job_recommender::start_web_server;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("ROCKET_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;

    let environment = EnvironmentConfig::load()?;
    environment.ensure_directories().await?;

    tracing::info!("Starting job recommendation API server");
    tracing::info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    tracing::info!("CV data: {}", environment.data_dir.display());
    tracing::info!("Server: http://0.0.0.0:{}", port);

    start_web_server(environment, port).await
}
