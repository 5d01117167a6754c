//! Min/max statistics per network category and method.

use crate::domain::{Metric, NetworkType, ObservationTable, SECONDS_TO_MS};

/// Range of one method column within one category, in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricStats {
    pub metric: Metric,
    /// `None` when the column holds no numeric entries for the category.
    pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub network: NetworkType,
    /// `None` when the category has no rows at all.
    pub metrics: Option<Vec<MetricStats>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub categories: Vec<CategorySummary>,
}

/// Compute the statistics block for both known categories.
///
/// Throughput ranges are reported as stored; delay ranges are scaled to ms.
/// NaN cells are skipped, infinite cells are kept.
pub fn summarize(table: &ObservationTable) -> Summary {
    let categories = NetworkType::ALL
        .into_iter()
        .map(|network| {
            let subset = table.subset(network);
            let metrics = (!subset.is_empty()).then(|| {
                Metric::ALL
                    .into_iter()
                    .map(|metric| {
                        let scale = if metric.is_delay() { SECONDS_TO_MS } else { 1.0 };
                        MetricStats {
                            metric,
                            range: subset.metric_range(metric).map(|(lo, hi)| (lo * scale, hi * scale)),
                        }
                    })
                    .collect()
            });
            CategorySummary { network, metrics }
        })
        .collect();

    Summary { categories }
}
