//! uuidspot-edge: analytics edge relay and identifier API for the uuidspot site.

mod config;
mod relay;
mod server;

use std::time::Duration;

use config::EdgeConfig;
use server::AppState;

fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned())
        .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
        .or_else(|| std::env::var("UUIDSPOT_CONFIG").ok())
        .unwrap_or_else(|| "uuidspot.toml".to_string());

    // Load configuration
    let config = EdgeConfig::load(&config_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        init_tracing(&config.logging.log_level);

        tracing::info!(
            config_path = %config_path,
            listen_address = %config.server.listen_address,
            upstream = %config.analytics.upstream,
            "Starting uuidspot-edge"
        );

        run(config).await
    })
}

/// Initialize fmt logging to stderr with an env-filter level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

async fn run(config: EdgeConfig) -> anyhow::Result<()> {
    // Build the upstream HTTP client. The relay makes exactly one attempt
    // per inbound request; this client-level timeout bounds it.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.analytics.timeout_secs))
        .build()?;

    let state = AppState { config, client };

    server::run(state).await
}
