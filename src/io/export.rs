//! Write an observation table back out in the simulator's CSV schema.

use std::fs::File;
use std::path::Path;

use crate::domain::{Metric, ObservationTable, required_columns};
use crate::error::AppError;

/// Write `table` to `path` with the required columns as header.
///
/// Non-finite values are written as `inf`, `-inf` or `NaN`, which the loader
/// reads back unchanged.
pub fn write_observations_csv(path: &Path, table: &ObservationTable) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(required_columns())
        .map_err(|e| AppError::output(format!("Failed to write CSV header: {e}")))?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(2 + Metric::ALL.len());
        record.push(row.network.clone());
        record.push(row.lambda.to_string());
        record.extend(Metric::ALL.iter().map(|&m| row.value(m).to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::output(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush CSV '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use crate::io::ingest::load_table;

    #[test]
    fn written_table_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("analysis_with_methods.csv");
        let table = ObservationTable::new(vec![
            Observation::new("AdHoc", 0.1, [1.25, 2.0, 3.0, 4.0, f64::INFINITY]),
            Observation::new("Group", 0.2, [1.0, 2.0, 3.0, 4.0, 0.5]),
        ]);

        write_observations_csv(&path, &table).unwrap();
        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.column_count(), 7);

        let obs = loaded.to_observations().unwrap();
        assert_eq!(obs.rows()[0].value(Metric::MeanValueAnalysis), 1.25);
        assert_eq!(obs.rows()[0].value(Metric::MeanValueDelay), f64::INFINITY);
        assert_eq!(obs.rows()[1].network, "Group");
    }
}
