use clap::Parser;
use sentiment_desk_lib::cli::{run, Cli};
use sentiment_desk_lib::config;

#[tokio::main]
async fn main() {
    sentiment_desk_lib::init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
