//! Binary entrypoint for the reconciliation webhook service.
use std::sync::Arc;

use recon_api::config::Config;
use recon_api::state::AppState;
use recon_api::run;
use recon_mdm::{build_catalog, MdmClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let client = match MdmClient::new(
        &config.api_url,
        &config.api_key,
        config.timeout,
        config.retries,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("client setup failed: {e}");
            std::process::exit(1);
        }
    };

    // No partial catalog: refuse to serve until the desired state is known.
    let (catalog, report) = match build_catalog(client.as_ref()).await {
        Ok(built) => built,
        Err(e) => {
            eprintln!("initial catalog build failed: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        blueprints = report.blueprints,
        resolved = report.resolved,
        unresolved = report.unresolved.len(),
        "desired-state catalog ready"
    );

    let state = AppState::new(catalog, client.clone(), client);
    run(&config.addr, state).await;
}
