//! Row filtering
//!
//! Each rule is a standalone check returning `Err(Rejection)` when the row
//! should be dropped. [`evaluate`] chains them in order, and [`filter_rows`]
//! applies the chain lazily to a row stream while counting rejections.
//! Rejections are never errors; only parse failures from the loader abort.

use crate::config::FilterConfig;
use crate::loader::{ColumnIndices, LoadError, RawRow};
use crate::record::Record;
use csv::StringRecord;
use std::fmt;

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer fields than the rightmost required column
    ShortRow,
    /// Id, name or category blank after trimming
    EmptyField,
    /// Category not on the allow-list
    CategoryNotAllowed,
    /// Name contains an exclude term
    ExcludedName,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRow => write!(f, "short row"),
            Self::EmptyField => write!(f, "empty field"),
            Self::CategoryNotAllowed => write!(f, "category not allowed"),
            Self::ExcludedName => write!(f, "excluded name"),
        }
    }
}

/// Pull the trimmed required fields out of a row
pub fn extract(fields: &StringRecord, columns: &ColumnIndices) -> Result<Record, Rejection> {
    if fields.len() < columns.min_width() {
        return Err(Rejection::ShortRow);
    }

    let field = |index: usize| fields.get(index).map(str::trim).unwrap_or_default();
    let (id, name, category) = (
        field(columns.id),
        field(columns.name),
        field(columns.category),
    );

    if id.is_empty() || name.is_empty() || category.is_empty() {
        return Err(Rejection::EmptyField);
    }

    Ok(Record::new(id, name, category))
}

pub fn check_category(record: &Record, config: &FilterConfig) -> Result<(), Rejection> {
    if config.allows_category(&record.category) {
        Ok(())
    } else {
        Err(Rejection::CategoryNotAllowed)
    }
}

pub fn check_name(record: &Record, config: &FilterConfig) -> Result<(), Rejection> {
    match config.excluded_term(&record.name) {
        Some(_) => Err(Rejection::ExcludedName),
        None => Ok(()),
    }
}

/// Run every rule against one row
pub fn evaluate(
    fields: &StringRecord,
    columns: &ColumnIndices,
    config: &FilterConfig,
) -> Result<Record, Rejection> {
    let record = extract(fields, columns)?;
    check_category(&record, config)?;
    check_name(&record, config)?;
    Ok(record)
}

/// Row counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub rows_seen: usize,
    pub accepted: usize,
    pub short_rows: usize,
    pub empty_fields: usize,
    pub category_not_allowed: usize,
    pub excluded_names: usize,
}

impl FilterStats {
    fn count(&mut self, outcome: &Result<Record, Rejection>) {
        self.rows_seen += 1;
        match outcome {
            Ok(_) => self.accepted += 1,
            Err(Rejection::ShortRow) => self.short_rows += 1,
            Err(Rejection::EmptyField) => self.empty_fields += 1,
            Err(Rejection::CategoryNotAllowed) => self.category_not_allowed += 1,
            Err(Rejection::ExcludedName) => self.excluded_names += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rows_seen - self.accepted
    }
}

/// Lazy filter over a raw row stream
pub struct Filtered<'a, I> {
    rows: I,
    columns: ColumnIndices,
    config: &'a FilterConfig,
    stats: FilterStats,
}

/// Apply the rule chain to `rows`, yielding accepted records
pub fn filter_rows<I>(rows: I, columns: ColumnIndices, config: &FilterConfig) -> Filtered<'_, I>
where
    I: Iterator<Item = Result<RawRow, LoadError>>,
{
    Filtered {
        rows,
        columns,
        config,
        stats: FilterStats::default(),
    }
}

impl<I> Filtered<'_, I> {
    pub fn into_stats(self) -> FilterStats {
        self.stats
    }
}

impl<I> Iterator for Filtered<'_, I>
where
    I: Iterator<Item = Result<RawRow, LoadError>>,
{
    type Item = Result<Record, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };

            let outcome = evaluate(&row.fields, &self.columns, self.config);
            self.stats.count(&outcome);

            match outcome {
                Ok(record) => return Some(Ok(record)),
                Err(reason) => tracing::debug!(line = row.line, %reason, "Skipping row"),
            }
        }
    }
}
