use std::net::IpAddr;
use std::sync::Arc;

use crate::ai::{Credential, TextGenerator};
use crate::cli::CliError;
use crate::server::{self, AppState};

/// Run the single-page server until Ctrl-C
pub async fn run<G: TextGenerator + 'static>(
    generator: G,
    default_credential: Option<Credential>,
    host: IpAddr,
    port: u16,
) -> Result<(), CliError> {
    if default_credential.is_none() {
        tracing::warn!("No default API key configured; the page will ask for one");
    }

    let state = Arc::new(AppState {
        generator,
        default_credential,
    });
    let running = server::start_server(host, port, state).await?;
    eprintln!("Open http://{} in your browser", running.addr);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| CliError::io("Failed to listen for Ctrl-C", e))?;
    running.shutdown().await?;
    Ok(())
}
