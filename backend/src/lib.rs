use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod hub;
pub mod pipeline;
pub mod roster;
pub mod scheduler;
pub mod source;
pub mod storage;
pub mod ws;

use config::Config;
use error::StartupError;

/// Loads the roster, wires the pipeline together and serves until ctrl-c.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let teams = roster::load(&config.teams).await?;

    let source: Box<dyn source::MedalSource> = if config.mock {
        tracing::info!("Using mock medal data");
        Box::new(source::MockSource::new())
    } else {
        tracing::info!(url = %config.source_url, "Using external medal data");
        Box::new(source::ExternalSource::new(
            config.source_url.clone(),
            config.fetch_timeout(),
        )?)
    };
    let store = Box::new(storage::FileStore::new(config.snapshot.clone()));

    let cache = Arc::new(cache::ScoreboardCache::new());
    let transport = Arc::new(ws::WsTransport::new());
    let hub = Arc::new(hub::BroadcastHub::new(transport.clone(), cache));
    let pipeline = Arc::new(pipeline::Pipeline::new(
        teams,
        source,
        store,
        hub,
        config.update_interval(),
    ));

    match pipeline.warm_start().await {
        Ok(true) => {}
        Ok(false) => tracing::debug!("No persisted medal data to restore"),
        Err(e) => tracing::warn!("Restoring persisted medal data: {}", e),
    }

    let shutdown = CancellationToken::new();
    let scheduler = tokio::spawn(scheduler::run(pipeline.clone(), shutdown.clone()));

    let router = axum::Router::new()
        .nest(
            "/api",
            api::router(api::AppState {
                pipeline,
                transport,
            }),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen,
            source,
        })?;
    tracing::info!("Listening on {}", config.listen);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await;

    shutdown.cancel();
    if let Err(e) = scheduler.await {
        tracing::error!("Update scheduler task failed: {}", e);
    }

    served.map_err(StartupError::Serve)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Listening for ctrl-c: {}", e);
            }
            tracing::info!("Shutting down");
        }
        _ = shutdown.cancelled() => {}
    }
}
