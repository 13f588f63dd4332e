pub mod commands;

use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::ai::{Credential, GeminiClient, GenerateError};
use crate::config::{API_KEY_ENV, DEFAULT_HOST, DEFAULT_PORT, RESULTS_FILENAME};
use crate::runner::RunnerError;
use crate::server::ServerError;
use crate::table::TableError;

#[derive(Debug, Parser)]
#[command(name = "sentiment-desk")]
#[command(author, version, about = "Analyze the sentiment of social media posts", long_about = None)]
pub struct Cli {
    /// Gemini API key
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one post (reads stdin when TEXT is omitted)
    Analyze {
        /// Post text
        text: Option<String>,
    },

    /// Analyze every row of a CSV file with a 'post_text' column
    Batch {
        /// Input CSV file
        file: PathBuf,

        /// Where to write the augmented table ("-" for stdout)
        #[arg(short, long, default_value = RESULTS_FILENAME)]
        output: PathBuf,
    },

    /// Serve the single-page analyzer
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_HOST)]
        host: IpAddr,

        /// Preferred port (falls back to nearby ports when taken)
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Client(#[from] GenerateError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// 2 for rejected input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Runner(_) => 2,
            _ => 1,
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let credential = Credential::new(cli.api_key);

    match cli.command {
        Commands::Analyze { text } => {
            let client = GeminiClient::new()?;
            let result =
                commands::analyze::run(&client, credential.as_ref(), text, std::io::stdin())
                    .await?;
            println!("{result}");
        }
        Commands::Batch { file, output } => {
            let client = GeminiClient::new()?;
            commands::batch::run(&client, credential.as_ref(), &file, &output).await?;
        }
        Commands::Serve { host, port } => {
            let client = GeminiClient::new()?;
            commands::serve::run(client, credential, host, port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_defaults() {
        let cli = Cli::try_parse_from(["sentiment-desk", "batch", "posts.csv"]).unwrap();
        match cli.command {
            Commands::Batch { file, output } => {
                assert_eq!(file, PathBuf::from("posts.csv"));
                assert_eq!(output, PathBuf::from("sentiment_results.csv"));
            }
            other => panic!("Wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_with_key() {
        let cli = Cli::try_parse_from([
            "sentiment-desk",
            "serve",
            "--port",
            "9000",
            "--api-key",
            "k1",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k1"));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.to_string(), "127.0.0.1");
                assert_eq!(port, 9000);
            }
            other => panic!("Wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(RunnerError::EmptyPost).exit_code(), 2);
        assert_eq!(
            CliError::from(RunnerError::from(TableError::MissingPostColumn)).exit_code(),
            2
        );
        assert_eq!(
            CliError::io("read", std::io::Error::other("boom")).exit_code(),
            1
        );
    }
}
