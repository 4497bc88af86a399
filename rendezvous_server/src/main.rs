//! Server entry point

use rendezvous_server::{Config, Server, SignalingError};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), SignalingError> {
    let config = Config::parse()?;
    init_tracing(&config);

    let server = Server::bind(&config).await?;
    server.run().await
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins over --log when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
