use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

const DEFAULT_FILTER: &str = "backend=info,scoring=info,tower_http=info";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Loading .env: {}", e);
        }
    }

    let config = backend::config::Config::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(filter);
    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Installing tracing subscriber: {}", e);
        return std::process::ExitCode::FAILURE;
    }

    tracing::info!("Starting...");

    match backend::run(config).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
