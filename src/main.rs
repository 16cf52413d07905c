use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use circus::{Config, ScriptStore, Server, api};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    let store = match ScriptStore::from_json_file(&config.dataset) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!("startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        records = store.len(),
        dataset = %config.dataset.display(),
        "dataset loaded"
    );

    let app = api::router(store);

    let server = match Server::bind(&config.addr).await {
        Ok(server) => server,
        Err(err) => {
            error!("startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = server.serve(app).await {
        error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
