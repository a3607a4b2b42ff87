use std::sync::Arc;

use clap::Parser;
use co2_api::config::{Backend, Cli, Settings};
use co2_api::demo;
use co2_api::routes;
use co2_api::state::{AppState, SharedClient};
use co2_client::DataApiClient;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "co2_api=info,co2_dashboard=info,co2_client=info".into()),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(&cli).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    });

    let client: SharedClient = match &settings.backend {
        Backend::DataApi(config) => {
            tracing::info!(
                endpoint = %config.endpoint,
                keyspace = %config.keyspace,
                "using data api"
            );
            Arc::new(DataApiClient::new(config))
        }
        Backend::Demo => {
            tracing::info!("serving demo data");
            Arc::new(demo::seeded_client())
        }
    };

    let keyspace = settings.keyspace.clone();
    let cache_ttl = settings.cache_ttl;
    let state = tokio::task::spawn_blocking(move || AppState::connect(client, &keyspace, cache_ttl))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "startup probe panicked");
            std::process::exit(1);
        });

    let app = routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind(settings.listen)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(addr = %settings.listen, error = %e, "failed to bind");
            std::process::exit(1);
        });

    tracing::info!("co2-api listening on {}", settings.listen);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
