//! Intent composer HTTP server binary

use intent_composer::{ComposeEngine, ServiceConfig};
use std::sync::Arc;
use tracing::info;

mod server {
    pub use intent_composer::server::*;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let service_config = ServiceConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(service_config.log_level)
        .with_target(false)
        .with_level(true)
        .init();

    info!("Intent Composer v{}", env!("CARGO_PKG_VERSION"));

    if service_config.painpoints_path.is_none() || service_config.ruleset_path.is_none() {
        info!("Using bundled v1 documents for any configuration path not set");
    }

    // Documents are read once here and shared read-only for the process lifetime
    let compose_config = service_config.compose_config()?;
    info!(
        "Loaded {} painpoints and {} lifestyle rules",
        compose_config.painpoints.painpoints.len(),
        compose_config.lifestyle.rules.len()
    );

    let engine = ComposeEngine::new(Arc::new(compose_config));

    server::run_server(engine, service_config.port).await?;

    Ok(())
}
