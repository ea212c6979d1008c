use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_core::MongoStore;
use todo_server::{telemetry, AppState, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init_tracing(&config.log);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = MongoStore::connect(&config.mongo_uri, &config.database, &config.collection)
        .await
        .context("failed to connect to MongoDB")?;
    tracing::info!(
        database = %config.database,
        collection = %config.collection,
        "connected to MongoDB"
    );
    let client = store.client().clone();

    let state = AppState::new(Arc::new(store)).with_update_mode(config.update_mode);
    let app = todo_server::app(state, config.frontend());

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    tracing::info!(
        addr = %config.addr(),
        environment = ?config.environment,
        update_mode = ?config.update_mode,
        "listening"
    );

    let served = todo_server::run(listener, app).await;
    client.shutdown().await;
    tracing::info!("disconnected from MongoDB");
    served.context("server error")
}
