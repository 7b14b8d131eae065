use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;

/// Columns of the load table: `Number`, `A`, `B`, `C`.
pub const LOAD_COLUMNS: usize = 4;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {line} is empty")]
    BlankLine { line: usize },
    #[error("Line {line} has {found} fields, expected {}", LOAD_COLUMNS)]
    FieldCount { line: u64, found: usize },
    #[error("Line {line} field {column} is not a number: {value:?}")]
    NotNumeric { line: u64, column: usize, value: String },
}

/// Counts the data rows of a `;`-separated upload with one header row.
///
/// Every row must carry exactly the load table's columns, each empty (NULL)
/// or numeric. The load table reads the whole file in one COPY, so a single
/// bad row would fail every later read.
pub fn count_records(content: &str) -> Result<usize, UploadError> {
    if let Some(idx) = content
        .trim_end()
        .lines()
        .position(|line| line.trim().is_empty())
    {
        return Err(UploadError::BlankLine { line: idx + 1 });
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut count = 0;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        if record.len() != LOAD_COLUMNS {
            return Err(UploadError::FieldCount {
                line,
                found: record.len(),
            });
        }

        for (column, value) in record.iter().enumerate() {
            if !value.is_empty() && value.parse::<f64>().is_err() {
                return Err(UploadError::NotNumeric {
                    line,
                    column: column + 1,
                    value: value.to_string(),
                });
            }
        }

        count += 1;
    }

    Ok(count)
}

pub async fn write_load_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    tokio::fs::write(path, content).await
}
