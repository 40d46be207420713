use secure_talk_relay::config::AppConfig;
use secure_talk_relay::server::{self, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = AppConfig::load()?;
    server::init_tracing(&config.server);

    tracing::info!("Starting SecureTalk relay");

    server::serve(config).await
}
