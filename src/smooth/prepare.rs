//! Series preparer: group by load, average, sort, drop non-finite entries.

use crate::domain::{Metric, ObservationTable, Series};

/// Build the `(load, mean value)` series for one metric column.
///
/// Rows are grouped by exact load value and each group is replaced by the
/// mean of its non-NaN values. The result is sorted by load and contains no
/// NaN or infinite entries. An empty table (or one with nothing finite left)
/// yields an empty series; callers draw nothing for it.
pub fn prepare_series(table: &ObservationTable, metric: Metric) -> Series {
    let pairs: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .map(|row| (row.lambda, row.value(metric)))
        .collect();
    group_mean_by_load(pairs)
}

/// Sort pairs by load, merge equal loads by their mean, and keep finite pairs.
///
/// Loads that are NaN or infinite are discarded before sorting, so the sort
/// is a total order and equal loads always end up adjacent. Within a group,
/// NaN values are skipped; a group with no usable value is dropped.
pub fn group_mean_by_load(mut pairs: Vec<(f64, f64)>) -> Series {
    pairs.retain(|(load, _)| load.is_finite());
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut loads = Vec::with_capacity(pairs.len());
    let mut values = Vec::with_capacity(pairs.len());

    let mut i = 0;
    while i < pairs.len() {
        let load = pairs[i].0;
        let mut sum = 0.0;
        let mut count = 0usize;
        while i < pairs.len() && pairs[i].0 == load {
            let v = pairs[i].1;
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
            i += 1;
        }

        let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
        if mean.is_finite() {
            loads.push(load);
            values.push(mean);
        }
    }

    Series::new(loads, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn row(lambda: f64, mva: f64) -> Observation {
        Observation::new("AdHoc", lambda, [mva, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn empty_table_gives_empty_series() {
        let series = prepare_series(&ObservationTable::default(), Metric::Buzen);
        assert!(series.loads.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn averages_duplicates_and_sorts() {
        let table = ObservationTable::new(vec![row(0.3, 3.0), row(0.1, 1.0), row(0.3, 5.0), row(0.2, 2.0)]);
        let series = prepare_series(&table, Metric::MeanValueAnalysis);
        assert_eq!(series.loads, vec![0.1, 0.2, 0.3]);
        assert_eq!(series.values, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn drops_non_finite_entries() {
        let table = ObservationTable::new(vec![
            row(0.1, 1.0),
            row(0.2, f64::INFINITY),
            row(f64::NAN, 7.0),
            row(f64::INFINITY, 7.0),
            row(0.4, f64::NAN),
            row(0.5, 2.0),
        ]);
        let series = prepare_series(&table, Metric::MeanValueAnalysis);
        assert_eq!(series.loads, vec![0.1, 0.5]);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn nan_values_are_skipped_within_a_group() {
        let table = ObservationTable::new(vec![row(1.0, f64::NAN), row(1.0, 6.0)]);
        let series = prepare_series(&table, Metric::MeanValueAnalysis);
        assert_eq!(series.values, vec![6.0]);
    }

    #[test]
    fn output_is_strictly_increasing_and_finite() {
        let loads = [2.0, 0.5, 1.0, 0.5, 2.0, 1.5, 0.0, -0.0, 1.0];
        let rows = loads.iter().enumerate().map(|(i, &l)| row(l, i as f64)).collect();
        let series = prepare_series(&ObservationTable::new(rows), Metric::MeanValueAnalysis);
        assert!(series.loads.windows(2).all(|w| w[1] > w[0]));
        assert!(series.points().all(|(l, v)| l.is_finite() && v.is_finite()));
        assert_eq!(series.len(), 5);
    }
}
