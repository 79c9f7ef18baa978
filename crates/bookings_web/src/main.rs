//! Bookings site - main entry point.
//!
//! Exit codes:
//! - 0: Server shut down cleanly
//! - 1: Startup or server failure (including an unusable template directory)

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use bookings_web::{routes, AppConfig, AppContext, Cli};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::from_default_env()
        .add_directive("bookings=info".parse().expect("static directive"))
        .add_directive("warn".parse().expect("static directive"));
    // Already initialized is fine
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    let cli = Cli::parse();

    match run(AppConfig::from(cli)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let port = config.port;
    if !config.use_cache {
        info!("Template cache disabled, templates are rebuilt on every request");
    }

    let app = AppContext::new(config).context("Cannot create template cache")?;
    if let Some(cache) = app.renderer.cache() {
        info!("Loaded {} page templates", cache.len());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot listen on {}", addr))?;

    info!("Starting application on port {}", port);
    axum::serve(
        listener,
        routes(Arc::new(app)).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
