//! Nirvana CLI and HTTP API entry point.
//!
//! Binary name: `nirvana`
//!
//! Parses CLI arguments, loads configuration, then either prints it or
//! wires the services and starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use nirvana_observe::tracing_setup::{
    TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        json: cli.log_json,
        otel: cli.otel,
        default_filter: filter_for_verbosity(cli.verbose).to_string(),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    nirvana_infra::secret::load_dotenv();
    let config = nirvana_infra::config::load_config(&cli.config).await?;

    match cli.command {
        Commands::Config => {
            let key_present = nirvana_infra::secret::resolve_api_key(&config.llm).is_ok();
            print!("{}", cli::config::render_config(&config, key_present)?);
        }

        Commands::Serve { host, port } => {
            let state = AppState::init(&config).await?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                addr = %addr,
                provider = %config.llm.provider,
                model = %config.llm.model,
                collection = %config.retrieval.collection,
                "Nirvana API listening"
            );

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
