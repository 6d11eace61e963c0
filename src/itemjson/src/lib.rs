//! # itemjson
//!
//! Item table conversion library - filtering and JSON lookup export.
//!
//! This library provides functionality to:
//! - Load a comma-separated item table and resolve its required columns
//! - Filter rows by category allow-list and name exclude-list
//! - Order items by identifier (numeric where possible)
//! - Export id → name lookup tables, one aggregate file plus one per category
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = itemjson::Options::new("items.csv", "output");
//! let summary = itemjson::run(&options)?;
//!
//! println!("Total items processed: {}", summary.total_items);
//! for category in &summary.export.categories {
//!     println!("{} -> {}", category.category, category.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod export;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod quoting;
pub mod record;
pub mod sort;

// Re-export commonly used items
#[doc(inline)]
pub use config::{ColumnNames, FilterConfig, EXCLUDED_NAME_TERMS, INCLUDED_CATEGORIES};
#[doc(inline)]
pub use export::{
    category_file_name, group_by_category, sanitize_filename, CategoryExport, ExportError,
    ExportReport, Exporter, FileWritten, LookupTable, WriteError, AGGREGATE_FILE_NAME,
};
#[doc(inline)]
pub use filter::{evaluate, filter_rows, FilterStats, Filtered, Rejection};
#[doc(inline)]
pub use loader::{ColumnIndices, LoadError, Loader, RawRow, RowError, Rows};
#[doc(inline)]
pub use quoting::QuoteFault;
#[doc(inline)]
pub use pipeline::{load_records, run, Options, PipelineError, RunSummary};
#[doc(inline)]
pub use record::Record;
#[doc(inline)]
pub use sort::{compare_ids, sort_by_id};
