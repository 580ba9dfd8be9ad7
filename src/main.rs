use ortb_ack_gateway::{config::AppConfig, telemetry};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    info!("Loading application configuration");
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    debug!("Configuration loaded: host={}, port={}", config.host, config.port);

    if let Err(e) = ortb_ack_gateway::serve(&config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
