use promptrelay::{
    relay::{self, RelayState},
    ProviderConfig, ProviderKind, RetryOptions, RetryingCaller, ServerConfig, TextGenerator,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server = ServerConfig::from_env()?;
    let kind = ProviderKind::from_env()?;

    let state = match ProviderConfig::from_env() {
        Ok(config) => {
            let options = RetryOptions::single_attempt().with_max_attempts(server.max_attempts);
            tracing::info!(
                provider = ?config.kind,
                model = %config.model,
                max_attempts = options.max_attempts,
                "upstream configured"
            );
            RelayState::ready(TextGenerator::new(
                config.build_provider(),
                RetryingCaller::new(options),
            ))
        }
        Err(err) => {
            tracing::warn!(error = %err, "starting without upstream credential");
            RelayState::unconfigured(kind.credential_var())
        }
    };

    let listener = tokio::net::TcpListener::bind(server.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, path = relay::GENERATE_PATH, "relay listening");

    axum::serve(listener, relay::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
