//! Load → filter → sort → export, run once per invocation

use crate::config::{ColumnNames, FilterConfig};
use crate::export::{ExportError, ExportReport, Exporter};
use crate::filter::{filter_rows, FilterStats};
use crate::loader::{LoadError, Loader};
use crate::record::Record;
use crate::sort::sort_by_id;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Inputs for a single conversion run
#[derive(Debug, Clone)]
pub struct Options {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub columns: ColumnNames,
    pub filter: FilterConfig,
}

impl Options {
    /// Options with the built-in column names and filter lists
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Options {
            input: input.into(),
            output_dir: output_dir.into(),
            columns: ColumnNames::default(),
            filter: FilterConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    /// Records accepted by the filter
    pub total_items: usize,
    pub stats: FilterStats,
    pub export: ExportReport,
}

/// Read and filter the whole table.
///
/// The file is closed before this returns, on success or failure.
pub fn load_records(
    path: &Path,
    columns: &ColumnNames,
    filter: &FilterConfig,
) -> Result<(Vec<Record>, FilterStats), LoadError> {
    let loader = Loader::open(path, columns)?;
    let indices = loader.columns();

    let mut filtered = filter_rows(loader.into_rows(), indices, filter);
    let records = filtered.by_ref().collect::<Result<Vec<_>, _>>()?;
    let stats = filtered.into_stats();

    tracing::info!(
        rows = stats.rows_seen,
        accepted = stats.accepted,
        short_rows = stats.short_rows,
        empty_fields = stats.empty_fields,
        category_not_allowed = stats.category_not_allowed,
        excluded_names = stats.excluded_names,
        "Filtered item table"
    );

    Ok((records, stats))
}

/// Run the full conversion
pub fn run(options: &Options) -> Result<RunSummary, PipelineError> {
    let (records, stats) = load_records(&options.input, &options.columns, &options.filter)?;
    let records = sort_by_id(records);

    let export = Exporter::new(&options.output_dir).export(&records)?;

    Ok(RunSummary {
        total_items: records.len(),
        stats,
        export,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCENARIO: &str = "Item ID,Name,Category\n\
                            1,Red Chair,House\n\
                            2,Quest Banner,House\n\
                            3,Blue Pet,Pet\n";

    fn write_input(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("items.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_run_scenario() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(temp_dir.path(), SCENARIO);
        let out = temp_dir.path().join("output");

        let summary = run(&Options::new(&input, &out)).unwrap();

        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.export.written(), 2);
        assert_eq!(summary.stats.excluded_names, 1);

        assert_eq!(
            read(&out.join("allitems.json")),
            "{\n  \"1\": \"Red Chair\",\n  \"3\": \"Blue Pet\"\n}"
        );
        assert_eq!(read(&out.join("House.json")), "{\n  \"1\": \"Red Chair\"\n}");
        assert_eq!(read(&out.join("Pet.json")), "{\n  \"3\": \"Blue Pet\"\n}");
    }

    #[test]
    fn test_run_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Name,Category,Item ID\n\
             Oak Floor,House Floor,20\n\
             Green Pet,Pet,3\n\
             Star Paper,House Wallpaper,abc\n\
             Guard Skin,NPC Skin,10\n",
        );
        let out = temp_dir.path().join("output");
        let options = Options::new(&input, &out);

        run(&options).unwrap();
        let names = [
            "allitems.json",
            "House_Floor.json",
            "House_Wallpaper.json",
            "NPC_Skin.json",
            "Pet.json",
        ];
        let first: Vec<Vec<u8>> = names.iter().map(|n| fs::read(out.join(n)).unwrap()).collect();

        run(&options).unwrap();
        let second: Vec<Vec<u8>> = names.iter().map(|n| fs::read(out.join(n)).unwrap()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_numerically_equal_ids_stay_distinct() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Item ID,Name,Category\n\
             5,First Cat,Pet\n\
             2,Dog,Pet\n\
             05,Second Cat,Pet\n",
        );
        let out = temp_dir.path().join("output");

        let summary = run(&Options::new(&input, &out)).unwrap();

        // "5" and "05" are distinct keys; only exact repeats collapse
        assert_eq!(summary.total_items, 3);
        let json = read(&out.join("Pet.json"));
        assert!(json.contains("\"5\": \"First Cat\""));
        assert!(json.contains("\"05\": \"Second Cat\""));
    }

    #[test]
    fn test_run_duplicate_id_last_write_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Item ID,Name,Category\n\
             7,Old Lamp,House\n\
             1,Rug,House\n\
             7,New Lamp,House\n",
        );
        let out = temp_dir.path().join("output");

        let summary = run(&Options::new(&input, &out)).unwrap();

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.export.categories[0].items, 3);
        assert_eq!(
            read(&out.join("House.json")),
            "{\n  \"1\": \"Rug\",\n  \"7\": \"New Lamp\"\n}"
        );
    }

    #[test]
    fn test_run_tolerates_short_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Item ID,Name,Category\n\
             1,Red Chair\n\
             3,Blue Pet,Pet\n",
        );
        let out = temp_dir.path().join("output");

        let summary = run(&Options::new(&input, &out)).unwrap();

        assert_eq!(summary.total_items, 1);
        assert_eq!(summary.stats.short_rows, 1);
    }

    #[test]
    fn test_run_missing_columns_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(temp_dir.path(), "ID,Name,Category\n1,Red Chair,House\n");
        let out = temp_dir.path().join("output");

        let err = run(&Options::new(&input, &out)).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Load(LoadError::MissingColumns { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_malformed_row_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("items.csv");
        fs::write(&input, b"Item ID,Name,Category\n1,Red Chair,House\n2,\xff,Pet\n").unwrap();
        let out = temp_dir.path().join("output");

        let err = run(&Options::new(&input, &out)).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Load(LoadError::MalformedRow { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_unbalanced_quote_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Item ID,Name,Category\n\
             1,\"Red Chair,House\n\
             3,Blue Pet,Pet\n",
        );
        let out = temp_dir.path().join("output");

        let err = run(&Options::new(&input, &out)).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Load(LoadError::MalformedRow { line: Some(2), .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_bare_quote_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(
            temp_dir.path(),
            "Item ID,Name,Category\n\
             1,Red \"Chair\",House\n\
             3,Blue Pet,Pet\n",
        );
        let out = temp_dir.path().join("output");

        let err = run(&Options::new(&input, &out)).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Load(LoadError::MalformedRow { line: Some(2), .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_run_missing_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = Options::new(temp_dir.path().join("nope.csv"), temp_dir.path().join("out"));

        let err = run(&options).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoadError::Open { .. })));
    }

    #[test]
    fn test_run_with_custom_filter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = write_input(temp_dir.path(), SCENARIO);
        let out = temp_dir.path().join("output");
        let mut options = Options::new(&input, &out);
        options.filter = FilterConfig::new(["House"], Vec::<String>::new());

        let summary = run(&options).unwrap();

        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.export.categories.len(), 1);
        assert!(!out.join("Pet.json").exists());
    }
}
