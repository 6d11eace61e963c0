//! CSV item table loading
//!
//! Opens the table, resolves the required column positions from the header
//! and hands out a lazy, single-pass sequence of raw rows. The file handle
//! lives inside the [`Loader`] and is released when the row iterator drops.

use crate::config::ColumnNames;
use crate::quoting::{QuoteCheck, QuoteFault};
use csv::{StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not read header: {0}")]
    Header(#[source] RowError),

    #[error("Could not find required columns ({}) in the CSV", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Error reading row{}: {source}", line_suffix(.line))]
    MalformedRow {
        line: Option<u64>,
        source: RowError,
    },
}

/// Structural problem in a single CSV record
#[derive(Error, Debug)]
pub enum RowError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Quote(#[from] QuoteFault),
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Zero-based positions of the required columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub id: usize,
    pub name: usize,
    pub category: usize,
}

impl ColumnIndices {
    /// Resolve the required columns from a header row.
    ///
    /// Header cells are trimmed and matched case-sensitively. If a name
    /// appears more than once, the rightmost occurrence wins.
    pub fn resolve(header: &StringRecord, names: &ColumnNames) -> Result<Self, LoadError> {
        let mut id = None;
        let mut name = None;
        let mut category = None;

        for (i, column) in header.iter().enumerate() {
            let column = column.trim();
            if column == names.id {
                id = Some(i);
            } else if column == names.name {
                name = Some(i);
            } else if column == names.category {
                category = Some(i);
            }
        }

        match (id, name, category) {
            (Some(id), Some(name), Some(category)) => Ok(ColumnIndices { id, name, category }),
            _ => {
                let missing = [(id, &names.id), (name, &names.name), (category, &names.category)]
                    .into_iter()
                    .filter(|(index, _)| index.is_none())
                    .map(|(_, column)| column.clone())
                    .collect();
                Err(LoadError::MissingColumns { missing })
            }
        }
    }

    /// Minimum number of fields a row needs to reach every required column
    pub fn min_width(&self) -> usize {
        self.id.max(self.name).max(self.category) + 1
    }
}

/// One data row as read from the table, before any filtering
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line where the row starts
    pub line: u64,
    pub fields: StringRecord,
}

/// Streaming reader over an item table with resolved columns
pub struct Loader<R> {
    reader: csv::Reader<QuoteCheck<R>>,
    columns: ColumnIndices,
}

/// Quote fault lying before the reader's current position.
///
/// Called right after a record is read, this is a fault inside that record;
/// earlier records were already checked.
fn fault_before_position<R: Read>(
    reader: &csv::Reader<QuoteCheck<R>>,
) -> Option<(u64, QuoteFault)> {
    let (line, fault) = reader.get_ref().fault()?;
    (line < reader.position().line()).then_some((line, fault))
}

impl Loader<File> {
    /// Open a CSV file and resolve its header
    pub fn open(path: &Path, names: &ColumnNames) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, names)
    }
}

impl<R: Read> Loader<R> {
    /// Wrap any reader producing CSV text
    pub fn from_reader(rdr: R, names: &ColumnNames) -> Result<Self, LoadError> {
        // Rows may be shorter or longer than the header; the filter decides.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(QuoteCheck::new(rdr));

        let header = reader
            .headers()
            .map_err(|e| LoadError::Header(e.into()))?
            .clone();
        if let Some((_, fault)) = fault_before_position(&reader) {
            return Err(LoadError::Header(fault.into()));
        }
        let columns = ColumnIndices::resolve(&header, names)?;

        tracing::info!(
            id = columns.id,
            name = columns.name,
            category = columns.category,
            "Resolved item table columns"
        );

        Ok(Loader { reader, columns })
    }

    pub fn columns(&self) -> ColumnIndices {
        self.columns
    }

    /// Consume the loader, yielding data rows in file order
    pub fn into_rows(self) -> Rows<R> {
        Rows {
            records: self.reader.into_records(),
            finished: false,
        }
    }
}

/// Lazy row sequence; not restartable
pub struct Rows<R> {
    records: StringRecordsIntoIter<QuoteCheck<R>>,
    finished: bool,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<RawRow, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(result) = self.records.next() else {
            self.finished = true;
            // A final record without a line ending ends on the reader's own
            // line, so its fault only shows once input is exhausted.
            let (line, fault) = self.records.reader().get_ref().fault()?;
            return Some(Err(malformed_quote(line, fault)));
        };

        let fields = match result {
            Ok(fields) => fields,
            Err(source) => {
                self.finished = true;
                return Some(Err(LoadError::MalformedRow {
                    line: source.position().map(|p| p.line()),
                    source: source.into(),
                }));
            }
        };

        if let Some((line, fault)) = fault_before_position(self.records.reader()) {
            self.finished = true;
            return Some(Err(malformed_quote(line, fault)));
        }

        Some(Ok(RawRow {
            line: fields.position().map(|p| p.line()).unwrap_or_default(),
            fields,
        }))
    }
}

fn malformed_quote(line: u64, fault: QuoteFault) -> LoadError {
    LoadError::MalformedRow {
        line: Some(line),
        source: fault.into(),
    }
}
