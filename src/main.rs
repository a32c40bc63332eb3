use offer_composer::config::{AppConfig, load_config};
use offer_composer::model::ComposeRequest;
use offer_composer::{ComposeContext, to_llm_response};

use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("COMPOSER_CONFIG").ok())
        .unwrap_or_else(|| "config.json".to_string());

    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let context = Arc::new(ComposeContext::initialize(&config).await);
    let health = context.health();
    info!(
        "Composer ready: status={} vector_backend={} catalog_version={:?}",
        health.status, health.vector_backend, health.catalog_version
    );

    if config.requests.is_empty() {
        warn!("No compose requests configured in {}", config_path);
        return;
    }

    info!("Composing {} requests...", config.requests.len());
    let tasks: Vec<_> = config
        .requests
        .iter()
        .map(|request| compose_and_print(request, &context))
        .collect();
    join_all(tasks).await;
    info!("Done.");
}

/// Composes one request and writes its response envelope as a JSON line on stdout.
async fn compose_and_print(request: &ComposeRequest, context: &ComposeContext) {
    let payload = context.compose(request).await;
    let response = match to_llm_response(&payload) {
        Ok(r) => r,
        Err(e) => {
            warn!("Cannot build response for {:?}: {}", request, e);
            return;
        }
    };
    match serde_json::to_string(&response) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Cannot serialize response: {}", e),
    }
}
