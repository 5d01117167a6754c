//! CSV ingest and schema validation.
//!
//! Loading is split in two steps so the orchestrator can report shape
//! diagnostics before validating the schema:
//!
//! 1. `load_table` reads the raw delimited table (headers + records)
//! 2. `Table::to_observations` checks required columns and types each row
//!
//! Numeric cells are lenient: empty or unparseable cells become NaN and are
//! dropped later by the series preparer, never here.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{LAMBDA_COLUMN, Metric, NETWORK_TYPE_COLUMN, Observation, ObservationTable, required_columns};
use crate::error::AppError;

/// A record the CSV reader could not decode.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The raw delimited table as read from storage.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    headers: Vec<String>,
    records: Vec<StringRecord>,
    pub row_errors: Vec<RowError>,
}

/// Read a comma-delimited table with a header row.
pub fn load_table(path: &Path) -> Result<Table, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_table(file, path)
}

/// Read a table from any reader; `path` is only used for diagnostics.
pub fn read_table<R: std::io::Read>(source: R, path: &Path) -> Result<Table, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers from '{}': {e}", path.display())))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut records = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts on the line after the header; lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line, "skipping malformed CSV record: {e}");
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
            }
        }
    }

    debug!(rows = records.len(), columns = headers.len(), "table loaded");

    Ok(Table {
        path: path.to_path_buf(),
        headers,
        records,
        row_errors,
    })
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Columns from `required` that are absent, in the order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Validate the schema and convert every record to an `Observation`.
    pub fn to_observations(&self) -> Result<ObservationTable, AppError> {
        let required = required_columns();
        let missing = self.missing_columns(&required);
        if !missing.is_empty() {
            return Err(AppError::schema(format!(
                "Missing required columns: {}\n  Required: {}\n  Found: {}",
                fmt_list(&missing),
                fmt_list(&required),
                fmt_list(&self.headers),
            )));
        }

        let network_idx = self.index_of(NETWORK_TYPE_COLUMN)?;
        let lambda_idx = self.index_of(LAMBDA_COLUMN)?;
        let mut metric_idx = [0usize; 5];
        for (slot, metric) in metric_idx.iter_mut().zip(Metric::ALL) {
            *slot = self.index_of(metric.column())?;
        }

        let mut invalid_cells = 0usize;
        let mut rows = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let mut cell = |idx: usize| {
                let (value, ok) = parse_cell(record.get(idx));
                if !ok {
                    invalid_cells += 1;
                }
                value
            };

            let lambda = cell(lambda_idx);
            let mut values = [f64::NAN; 5];
            for (value, &idx) in values.iter_mut().zip(metric_idx.iter()) {
                *value = cell(idx);
            }
            let network = record.get(network_idx).unwrap_or("").to_string();
            rows.push(Observation::new(network, lambda, values));
        }

        if invalid_cells > 0 {
            warn!(invalid_cells, "numeric cells could not be parsed and were treated as NaN");
        }

        Ok(ObservationTable::new(rows))
    }

    fn index_of(&self, name: &str) -> Result<usize, AppError> {
        self.column_index(name)
            .ok_or_else(|| AppError::schema(format!("Missing required column: `{name}`")))
    }
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Parse a numeric cell. Returns the value and whether the cell was usable.
///
/// Empty cells are NaN without counting as invalid. `inf`, `-inf` and `nan`
/// are accepted as written by the simulator.
fn parse_cell(raw: Option<&str>) -> (f64, bool) {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return (f64::NAN, true);
    };
    match raw.parse::<f64>() {
        Ok(v) => (v, true),
        Err(_) => (f64::NAN, false),
    }
}

fn fmt_list<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "NetworkType,Lambda,MeanValueAnalysis,GlobalBalanceMethod,GordonNewellMethod,BuzenMethod,MeanValueDelay";

    fn read(text: &str) -> Table {
        read_table(text.as_bytes(), Path::new("memory.csv")).unwrap()
    }

    #[test]
    fn reports_shape() {
        let table = read(&format!("{HEADER}\nAdHoc,0.1,1,2,3,4,0.5\nGroup,0.1,1,2,3,4,0.5\n"));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 7);
        assert_eq!(table.file_name(), "memory.csv");
    }

    #[test]
    fn missing_columns_are_listed_with_found_set() {
        let table = read("NetworkType,Lambda,MeanValueAnalysis,GlobalBalanceMethod,BuzenMethod,MeanValueDelay\nAdHoc,0.1,1,2,4,0.5\n");
        assert_eq!(table.missing_columns(&required_columns()), vec!["GordonNewellMethod".to_string()]);

        let err = table.to_observations().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_SCHEMA);
        assert!(err.message().contains("Missing required columns: [GordonNewellMethod]"));
        assert!(err.message().contains("Found: [NetworkType, Lambda"));
    }

    #[test]
    fn non_finite_and_blank_cells_become_values_not_errors() {
        let table = read(&format!("{HEADER}\nAdHoc,0.1,1,,abc,inf,-inf\n"));
        let obs = table.to_observations().unwrap();
        let row = &obs.rows()[0];
        assert_eq!(row.value(Metric::MeanValueAnalysis), 1.0);
        assert!(row.value(Metric::GlobalBalance).is_nan());
        assert!(row.value(Metric::GordonNewell).is_nan());
        assert_eq!(row.value(Metric::Buzen), f64::INFINITY);
        assert_eq!(row.value(Metric::MeanValueDelay), f64::NEG_INFINITY);
    }

    #[test]
    fn strips_bom_and_tolerates_extra_columns() {
        let text = format!("\u{feff}{HEADER},ActualThroughput\nGroup,2.0,1,2,3,4,0.5,9\n");
        let obs = read(&text).to_observations().unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs.rows()[0].network, "Group");
        assert_eq!(obs.rows()[0].lambda, 2.0);
    }

    #[test]
    fn missing_file_is_an_input_error_naming_the_path() {
        let err = load_table(Path::new("/nonexistent/dir/analysis.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("/nonexistent/dir/analysis.csv"));
    }
}
