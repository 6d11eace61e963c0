//! JSON lookup table export
//!
//! Writes `allitems.json` with every accepted record, then one
//! `<Category>.json` per category seen in the data. A failure on the
//! aggregate file aborts the export; a failure on a category file is
//! recorded in the [`ExportReport`] and the remaining categories still run.

use crate::record::Record;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the table holding every accepted item
pub const AGGREGATE_FILE_NAME: &str = "allitems.json";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save all items to {}: {source}", .path.display())]
    AggregateWrite { path: PathBuf, source: WriteError },

    #[error("Failed to save category {category} to {}: {source}", .path.display())]
    CategoryWrite {
        category: String,
        path: PathBuf,
        source: WriteError,
    },
}

/// Item id → display name mapping, serialized as a flat JSON object.
///
/// Keys are kept in byte order so output is identical across runs.
/// Inserting an id twice keeps the later name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LookupTable(BTreeMap<String, String>);

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: &Record) {
        self.0.insert(record.id.clone(), record.name.clone());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pretty JSON with two-space indentation, no trailing newline
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize and write to `path`
    pub fn write(&self, path: &Path) -> Result<(), WriteError> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl<'a> FromIterator<&'a Record> for LookupTable {
    fn from_iter<T: IntoIterator<Item = &'a Record>>(iter: T) -> Self {
        let mut table = LookupTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Turn a category label into a filesystem-safe base name.
///
/// Anything outside `[A-Za-z0-9_-]` (spaces included) becomes `_`, one
/// underscore per character.
pub fn sanitize_filename(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Output file name for a category table
pub fn category_file_name(category: &str) -> String {
    format!("{}.json", sanitize_filename(category))
}

/// Group records by category, in ascending category order
pub fn group_by_category(records: &[Record]) -> BTreeMap<&str, Vec<&Record>> {
    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.category.as_str()).or_default().push(record);
    }
    groups
}

/// A table that was written successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWritten {
    pub path: PathBuf,
    /// Records merged into the table
    pub items: usize,
}

/// Outcome of one category file
#[derive(Debug)]
pub struct CategoryExport {
    pub category: String,
    pub path: PathBuf,
    /// Records in the category
    pub items: usize,
    pub result: Result<(), ExportError>,
}

impl CategoryExport {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct ExportReport {
    pub aggregate: FileWritten,
    pub categories: Vec<CategoryExport>,
}

impl ExportReport {
    /// Number of category files written
    pub fn written(&self) -> usize {
        self.categories.iter().filter(|c| c.is_written()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CategoryExport> {
        self.categories.iter().filter(|c| !c.is_written())
    }
}

/// Writes lookup tables into one output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Exporter {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory and any missing parents
    pub fn prepare(&self) -> Result<(), ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Write the aggregate table, then every category table.
    ///
    /// `records` should already be in id order; that order decides which
    /// name wins when an id repeats.
    pub fn export(&self, records: &[Record]) -> Result<ExportReport, ExportError> {
        self.prepare()?;

        let aggregate = self.write_aggregate(records)?;
        tracing::info!(
            path = %aggregate.path.display(),
            items = aggregate.items,
            "Wrote aggregate table"
        );

        let categories = group_by_category(records)
            .into_iter()
            .map(|(category, group)| self.write_category(category, &group))
            .collect();

        Ok(ExportReport {
            aggregate,
            categories,
        })
    }

    fn write_aggregate(&self, records: &[Record]) -> Result<FileWritten, ExportError> {
        let path = self.output_dir.join(AGGREGATE_FILE_NAME);
        let table: LookupTable = records.iter().collect();

        match table.write(&path) {
            Ok(()) => Ok(FileWritten {
                path,
                items: records.len(),
            }),
            Err(source) => Err(ExportError::AggregateWrite { path, source }),
        }
    }

    fn write_category(&self, category: &str, group: &[&Record]) -> CategoryExport {
        let path = self.output_dir.join(category_file_name(category));
        let table: LookupTable = group.iter().copied().collect();

        let result = table.write(&path).map_err(|source| ExportError::CategoryWrite {
            category: category.to_string(),
            path: path.clone(),
            source,
        });

        match &result {
            Ok(()) => tracing::info!(
                category,
                path = %path.display(),
                items = group.len(),
                "Wrote category table"
            ),
            Err(e) => tracing::debug!(category, "{}", e),
        }

        CategoryExport {
            category: category.to_string(),
            path,
            items: group.len(),
            result,
        }
    }
}
