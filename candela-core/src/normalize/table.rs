use std::fs::File;
use std::io;
use std::path::Path;

use crate::types::CandelaError;

fn csv_err(e: csv::Error) -> CandelaError {
    if e.is_io_error() {
        CandelaError::Io(e.to_string())
    } else {
        CandelaError::Data(e.to_string())
    }
}

/// Vendor tabular data as text cells, before schema normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from headers and rows. Rows may be shorter than the
    /// header; missing trailing cells read as empty.
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a headed CSV stream. Fields are trimmed; rows may vary in length.
    ///
    /// # Errors
    /// Returns `Io` on read failures and `Data` on malformed CSV.
    pub fn from_csv_reader<R: io::Read>(rdr: R) -> Result<Self, CandelaError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Read a headed CSV file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be opened or read and `Data` on malformed CSV.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CandelaError> {
        let path = path.as_ref();
        #[cfg(feature = "tracing")]
        tracing::info!(path = %path.display(), "loading csv");
        let file = File::open(path)?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    /// Header names as read.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}
