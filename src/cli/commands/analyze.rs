use std::io::Read;

use crate::ai::{Credential, TextGenerator};
use crate::cli::CliError;
use crate::runner;

/// Classify one post and return the text to print.
/// Without `text`, the post is read from `input` once a credential is known.
pub async fn run<G: TextGenerator, R: Read>(
    generator: &G,
    credential: Option<&Credential>,
    text: Option<String>,
    input: R,
) -> Result<String, CliError> {
    let credential = credential.ok_or(runner::RunnerError::MissingCredential)?;
    let text = match text {
        Some(text) => text,
        None => read_input(input)?,
    };

    let result = runner::analyze_single(generator, Some(credential), &text).await?;
    Ok(result)
}

fn read_input(mut input: impl Read) -> Result<String, CliError> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(|e| CliError::io("Failed to read stdin", e))?;
    Ok(text)
}
