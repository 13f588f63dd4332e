use std::io::Write;
use std::path::Path;

use crate::ai::{Credential, TextGenerator};
use crate::cli::CliError;
use crate::runner;
use crate::table::AugmentedTable;

const PREVIEW_ROWS: usize = 5;
const PREVIEW_WIDTH: usize = 60;

/// Classify every row of `input` and write the augmented table to `output`.
/// Returns the number of rows written.
pub async fn run<G: TextGenerator>(
    generator: &G,
    credential: Option<&Credential>,
    input: &Path,
    output: &Path,
) -> Result<usize, CliError> {
    // Credential is checked before touching the file, matching the page
    let credential = credential.ok_or(runner::RunnerError::MissingCredential)?;

    let bytes = std::fs::read(input)
        .map_err(|e| CliError::io(format!("Failed to read {}", input.display()), e))?;

    let table = runner::analyze_table(generator, Some(credential), Some(bytes.as_slice())).await?;
    let csv = table.to_csv_bytes()?;

    if output == Path::new("-") {
        std::io::stdout()
            .write_all(&csv)
            .map_err(|e| CliError::io("Failed to write stdout", e))?;
    } else {
        std::fs::write(output, &csv)
            .map_err(|e| CliError::io(format!("Failed to write {}", output.display()), e))?;
        eprintln!("{}", preview(&table));
        eprintln!(
            "✅ All posts analyzed! Wrote {} rows to {}",
            table.len(),
            output.display()
        );
    }

    Ok(table.len())
}

/// First few rows, one cell per line, long cells cut short
fn preview(table: &AugmentedTable) -> String {
    let mut out = String::new();
    for (i, row) in table.rows().iter().take(PREVIEW_ROWS).enumerate() {
        out.push_str(&format!("[{}]\n", i + 1));
        for (header, cell) in table.headers().iter().zip(row) {
            out.push_str(&format!("  {header}: {}\n", truncate(cell, PREVIEW_WIDTH)));
        }
    }
    if table.len() > PREVIEW_ROWS {
        out.push_str(&format!("... {} more rows\n", table.len() - PREVIEW_ROWS));
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::classifier::testing::MockGenerator;
    use crate::runner::RunnerError;
    use crate::table::{PostTable, TableError};

    fn key() -> Option<Credential> {
        Credential::new(Some("k1".to_owned()))
    }

    #[tokio::test]
    async fn test_batch_writes_augmented_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        let output = dir.path().join("sentiment_results.csv");
        std::fs::write(&input, "id,post_text\n1,Great service!\n2,Slow delivery\n3,ok\n").unwrap();
        let mock = MockGenerator::always("Sentiment: Positive");

        let rows = run(&mock, key().as_ref(), &input, &output).await.unwrap();

        assert_eq!(rows, 3);
        assert_eq!(mock.call_count(), 3);
        let written = PostTable::from_bytes(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(written.headers(), ["id", "post_text", "sentiment_result"]);
        assert_eq!(written.rows()[1], ["2", "Slow delivery", "Sentiment: Positive"]);
    }

    #[tokio::test]
    async fn test_batch_missing_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "id,body\n1,hi\n").unwrap();
        let mock = MockGenerator::always("unused");

        let err = run(&mock, key().as_ref(), &input, &output).await.unwrap_err();

        assert!(matches!(
            err,
            CliError::Runner(RunnerError::InvalidTable(TableError::MissingPostColumn))
        ));
        assert!(!output.exists());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_without_credential_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.csv");
        let mock = MockGenerator::always("unused");

        let err = run(&mock, None, &missing, &dir.path().join("out.csv"))
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Runner(RunnerError::MissingCredential)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
