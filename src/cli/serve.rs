//! Serve command implementation.

use tokio::net::TcpListener;

use crate::cli::args::{Cli, ServeArgs};
use crate::core::config::ResolvedConfig;
use crate::error::{MsqError, Result};
use crate::server::{self, AppState};

/// Execute the serve command.
///
/// Binds the configured address and runs the HTTP query service until the
/// process is terminated.
pub async fn execute(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let config = ResolvedConfig::resolve(cli, None, Some(args))?;
    let state = AppState::new(config.probe_settings());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| MsqError::Config(format!("Failed to bind {addr}: {e}")))?;

    let local = listener.local_addr()?;
    tracing::info!(%local, "serving quota queries");
    println!("msq listening on http://{local}");

    server::run_on_listener(listener, state).await
}
