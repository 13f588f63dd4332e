// Modules
pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod server;
pub mod table;

use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr, honouring RUST_LOG when set
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
