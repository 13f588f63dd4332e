// Single-item and bulk submission handling
//
// Each submission is validated up front, then classified strictly one post at
// a time. Per-row failures become that row's result text and the batch keeps going.

use thiserror::Error;

use crate::ai::classifier::classify_for_display;
use crate::ai::{Credential, TextGenerator};
use crate::table::{AugmentedTable, PostTable, TableError};

/// Why a submission was rejected before any backend call
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Please enter your Gemini API key.")]
    MissingCredential,

    #[error("Please enter some text.")]
    EmptyPost,

    #[error("Please upload a CSV file.")]
    MissingTable,

    #[error(transparent)]
    InvalidTable(#[from] TableError),
}

impl RunnerError {
    /// Warnings are input omissions; everything else is a bad table
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::InvalidTable(_))
    }
}

/// Classify one manually entered post.
pub async fn analyze_single<G: TextGenerator>(
    generator: &G,
    credential: Option<&Credential>,
    post_text: &str,
) -> Result<String, RunnerError> {
    let credential = credential.ok_or(RunnerError::MissingCredential)?;
    if post_text.trim().is_empty() {
        return Err(RunnerError::EmptyPost);
    }

    tracing::debug!("analyzing single post");
    Ok(classify_for_display(generator, post_text, credential).await)
}

/// Classify every row of an uploaded table and attach the results.
///
/// `upload` is the raw file content, `None` when nothing was uploaded.
pub async fn analyze_table<G: TextGenerator>(
    generator: &G,
    credential: Option<&Credential>,
    upload: Option<&[u8]>,
) -> Result<AugmentedTable, RunnerError> {
    let credential = credential.ok_or(RunnerError::MissingCredential)?;
    let upload = upload.ok_or(RunnerError::MissingTable)?;

    let table = PostTable::from_bytes(upload)?;
    run_table(generator, credential, table).await
}

/// Classify an already parsed table
pub async fn run_table<G: TextGenerator>(
    generator: &G,
    credential: &Credential,
    table: PostTable,
) -> Result<AugmentedTable, RunnerError> {
    let posts = table.post_texts()?;
    let total = posts.len();
    tracing::info!(rows = total, "Analyzing {total} posts...");

    let mut results = Vec::with_capacity(total);
    for (i, post) in posts.iter().enumerate() {
        tracing::debug!(row = i + 1, total, "classifying row");
        results.push(classify_for_display(generator, post, credential).await);
    }

    let failed = results
        .iter()
        .filter(|r| r.starts_with(crate::ai::classifier::ERROR_PREFIX))
        .count();
    tracing::info!(rows = total, failed, "All posts analyzed");

    Ok(table.with_results(results)?)
}
