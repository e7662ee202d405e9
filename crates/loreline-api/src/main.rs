//! Loreline CLI and REST API entry point.
//!
//! Binary name: `loreline`
//!
//! Parses CLI arguments, opens storage, then dispatches to the requested
//! command or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands, KeyCommand};
use state::{AppState, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,loreline_api=debug,loreline_core=debug,loreline_infra=debug",
        _ => "trace",
    };
    loreline_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let storage = Storage::open().await?;

    match cli.command {
        Commands::Key { action } => match action {
            KeyCommand::Create { name } => cli::key::create_key(&storage, &name, cli.json).await?,
            KeyCommand::List => cli::key::list_keys(&storage, cli.json).await?,
        },

        Commands::Status => cli::status::status(&storage, cli.json).await?,

        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| storage.config.server.host.clone());
            let port = port.unwrap_or(storage.config.server.port);
            let state = AppState::init(storage).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "listening");

            if !cli.quiet {
                println!(
                    "  {} Loreline API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }
    }

    loreline_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
}
