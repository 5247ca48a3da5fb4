//! `occmap serve`: run the HTTP tile server until Ctrl-C.

use clap::Args;
use occmap::server;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides [server] bind)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Run the serve command.
pub async fn run(runner: &CliRunner, args: ServeArgs) -> Result<(), CliError> {
    runner.log_startup("serve");

    let bind = match args.bind {
        Some(addr) => addr.to_string(),
        None => runner.config().server.bind.clone(),
    };
    let service = runner.create_service()?;
    let listener = TcpListener::bind(&bind).await.map_err(CliError::Serve)?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C, shutting down"),
        }
        signal.cancel();
    });

    println!("Serving tiles on http://{}/occurrence/density/", bind);
    println!("Press Ctrl+C to stop");

    server::serve(listener, server::router(service), shutdown)
        .await
        .map_err(CliError::Serve)?;

    info!("Server stopped");
    Ok(())
}
