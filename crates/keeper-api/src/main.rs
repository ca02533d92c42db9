//! Keeper vault server entry point.
//!
//! Binary name: `keeperd`
//!
//! Loads `keeper.toml`, installs tracing, wires the gateway over the
//! configured backend and serves the REST API until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use keeper_infra::config::{default_config_path, load_config};
use keeper_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&path)
        .await
        .with_context(|| format!("cannot start with {}", path.display()))?;

    match cli.command {
        Commands::CheckConfig => {
            println!(
                "{}: ok (backend {}, token ttl {}s)",
                path.display(),
                config.backend,
                config.token_ttl_secs
            );
        }

        Commands::Serve { listen, otel } => {
            init_tracing(config.log_format, otel)
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

            let state = AppState::init(&config).await?;
            let addr = listen.unwrap_or_else(|| config.listen.clone());
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!(%addr, backend = state.backend, "keeper listening");

            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            let router = http::router::build_router(state.clone());
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await;

            state.close().await;
            tracing::info!("server stopped");
            shutdown_tracing();
            served?;
        }
    }

    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown requested");
    token.cancel();
}
