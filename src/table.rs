// Delimited post tables
//
// Uploaded tables are kept as plain strings so exported cells match the input
// byte-for-byte. Row order and the input delimiter are preserved on export.

use serde::Serialize;
use thiserror::Error;

use crate::config::{POST_COLUMN, RESULT_COLUMN};

/// Delimiters recognised when sniffing an uploaded file, in tie-break order
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV must have a 'post_text' column.")]
    MissingPostColumn,

    #[error("The uploaded file is empty.")]
    Empty,

    #[error("Could not read CSV: {0}")]
    Parse(String),

    #[error("Got {got} results for {expected} rows")]
    ResultCount { expected: usize, got: usize },

    #[error("Could not write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Parse(err.to_string())
    }
}

/// A table of posts loaded from an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: u8,
}

impl PostTable {
    /// Parse an uploaded file, sniffing its delimiter from the header line.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Self::parse(bytes, sniff_delimiter(bytes))
    }

    /// Parse with an explicit delimiter
    pub fn parse(bytes: &[u8], delimiter: u8) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(TableError::Empty);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }

        Ok(Self {
            headers,
            rows,
            delimiter,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Post texts in row order
    pub fn post_texts(&self) -> Result<Vec<&str>, TableError> {
        let idx = self
            .column_index(POST_COLUMN)
            .ok_or(TableError::MissingPostColumn)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Attach one result per row as the result column.
    ///
    /// An existing result column is overwritten in place.
    pub fn with_results(mut self, results: Vec<String>) -> Result<AugmentedTable, TableError> {
        if results.len() != self.rows.len() {
            return Err(TableError::ResultCount {
                expected: self.rows.len(),
                got: results.len(),
            });
        }

        match self.column_index(RESULT_COLUMN) {
            Some(idx) => {
                for (row, result) in self.rows.iter_mut().zip(results) {
                    row[idx] = result;
                }
            }
            None => {
                self.headers.push(RESULT_COLUMN.to_owned());
                for (row, result) in self.rows.iter_mut().zip(results) {
                    row.push(result);
                }
            }
        }

        Ok(AugmentedTable { table: self })
    }
}

/// A post table with the sentiment result column attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "TableView")]
pub struct AugmentedTable {
    table: PostTable,
}

/// Serializable view of an augmented table for the page
#[derive(Debug, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl From<AugmentedTable> for TableView {
    fn from(augmented: AugmentedTable) -> Self {
        TableView {
            columns: augmented.table.headers,
            rows: augmented.table.rows,
        }
    }
}

impl AugmentedTable {
    pub fn headers(&self) -> &[String] {
        self.table.headers()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Results in row order
    pub fn results(&self) -> Vec<&str> {
        let idx = self.table.column_index(RESULT_COLUMN).unwrap_or_default();
        self.table.rows.iter().map(|row| row[idx].as_str()).collect()
    }

    /// Export with the input's delimiter, header first, no index column
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.table.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(&self.table.headers)
            .map_err(|e| TableError::Write(e.to_string()))?;
        for row in &self.table.rows {
            writer
                .write_record(row)
                .map_err(|e| TableError::Write(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| TableError::Write(e.to_string()))
    }

    pub fn to_csv_string(&self) -> Result<String, TableError> {
        let bytes = self.to_csv_bytes()?;
        String::from_utf8(bytes).map_err(|e| TableError::Write(e.to_string()))
    }
}

/// Pick the candidate delimiter that occurs most often in the header line,
/// ignoring quoted sections. Defaults to a comma.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;

    for &b in bytes {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' | b'\r' if !in_quotes => break,
            _ if !in_quotes => {
                if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
                    counts[i] += 1;
                }
            }
            _ => {}
        }
    }

    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    CANDIDATE_DELIMITERS[best]
}
