//! Shared domain types.
//!
//! Observations are kept as plain structs so the preparer, renderer and
//! reporter can all work from the same in-memory table without re-parsing.

use serde::Serialize;

/// Column holding the network category of each row.
pub const NETWORK_TYPE_COLUMN: &str = "NetworkType";
/// Column holding the offered load (arrival rate).
pub const LAMBDA_COLUMN: &str = "Lambda";

/// Delay columns are written in seconds; charts and reports use milliseconds.
pub const SECONDS_TO_MS: f64 = 1000.0;

/// The two network topologies compared by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkType {
    AdHoc,
    Group,
}

impl NetworkType {
    pub const ALL: [NetworkType; 2] = [NetworkType::AdHoc, NetworkType::Group];

    /// Value used in the `NetworkType` column.
    pub fn label(self) -> &'static str {
        match self {
            NetworkType::AdHoc => "AdHoc",
            NetworkType::Group => "Group",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NetworkType::AdHoc => "Ad-Hoc",
            NetworkType::Group => "Group",
        }
    }
}

/// A numeric method-output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    MeanValueAnalysis,
    GlobalBalance,
    GordonNewell,
    Buzen,
    MeanValueDelay,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::MeanValueAnalysis,
        Metric::GlobalBalance,
        Metric::GordonNewell,
        Metric::Buzen,
        Metric::MeanValueDelay,
    ];

    /// The four throughput estimators, in legend order.
    pub const THROUGHPUT: [Metric; 4] = [
        Metric::MeanValueAnalysis,
        Metric::GlobalBalance,
        Metric::GordonNewell,
        Metric::Buzen,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::MeanValueAnalysis => "MeanValueAnalysis",
            Metric::GlobalBalance => "GlobalBalanceMethod",
            Metric::GordonNewell => "GordonNewellMethod",
            Metric::Buzen => "BuzenMethod",
            Metric::MeanValueDelay => "MeanValueDelay",
        }
    }

    /// Short name used for chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::MeanValueAnalysis => "Mean Value Analysis",
            Metric::GlobalBalance => "Global Balance",
            Metric::GordonNewell => "Gordon-Newell",
            Metric::Buzen => "Buzen",
            Metric::MeanValueDelay => "Mean Value Delay",
        }
    }

    /// Longer name used in the statistics report.
    pub fn report_name(self) -> &'static str {
        match self {
            Metric::MeanValueAnalysis => "Mean Value Analysis",
            Metric::GlobalBalance => "Global Balance Method",
            Metric::GordonNewell => "Gordon-Newell Method",
            Metric::Buzen => "Buzen Method",
            Metric::MeanValueDelay => "Delay (Mean Value)",
        }
    }

    pub fn is_delay(self) -> bool {
        matches!(self, Metric::MeanValueDelay)
    }

    fn index(self) -> usize {
        match self {
            Metric::MeanValueAnalysis => 0,
            Metric::GlobalBalance => 1,
            Metric::GordonNewell => 2,
            Metric::Buzen => 3,
            Metric::MeanValueDelay => 4,
        }
    }
}

/// Every column the pipeline needs, in schema order.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![NETWORK_TYPE_COLUMN, LAMBDA_COLUMN];
    cols.extend(Metric::ALL.iter().map(|m| m.column()));
    cols
}

/// One row of the simulator output table.
///
/// Numeric cells that were empty or unparseable are stored as NaN; they are
/// filtered by the series preparer rather than rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub network: String,
    pub lambda: f64,
    values: [f64; 5],
}

impl Observation {
    pub fn new(network: impl Into<String>, lambda: f64, values: [f64; 5]) -> Self {
        Self {
            network: network.into(),
            lambda,
            values,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    pub fn is_network(&self, network: NetworkType) -> bool {
        self.network == network.label()
    }
}

/// The typed observation table. Never mutated in place by the pipeline;
/// subsets are derived copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one network category.
    pub fn subset(&self, network: NetworkType) -> ObservationTable {
        ObservationTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.is_network(network))
                .cloned()
                .collect(),
        }
    }

    /// Distinct `NetworkType` values in order of first appearance.
    pub fn network_labels(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for row in &self.rows {
            if !out.iter().any(|n| n == &row.network) {
                out.push(row.network.clone());
            }
        }
        out
    }

    /// Min/max of the load column, ignoring NaN cells.
    pub fn lambda_range(&self) -> Option<(f64, f64)> {
        min_max(self.rows.iter().map(|r| r.lambda))
    }

    /// Min/max of a metric column, ignoring NaN cells.
    pub fn metric_range(&self, metric: Metric) -> Option<(f64, f64)> {
        min_max(self.rows.iter().map(|r| r.value(metric)))
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// An ordered `(load, value)` series.
///
/// As produced by `prepare_series`: loads strictly increasing, no duplicate
/// loads, every entry finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub loads: Vec<f64>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(loads: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(loads.len(), values.len());
        Self { loads, values }
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Multiply every value by `factor` (e.g. seconds to milliseconds).
    pub fn scaled(&self, factor: f64) -> Series {
        Series {
            loads: self.loads.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.loads.iter().copied().zip(self.values.iter().copied())
    }
}

/// Which interpolation tier produced a smoothed curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    /// Too few points to interpolate; input returned as-is.
    Passthrough,
    /// Not-a-knot cubic spline.
    Cubic,
    /// Piecewise-linear interpolant with end-segment extrapolation.
    Linear,
    /// Piecewise-linear lookup clamped to the end values.
    RawLinear,
}

/// A dense, finite curve generated from a `Series`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedCurve {
    pub loads: Vec<f64>,
    pub values: Vec<f64>,
    pub kind: InterpolationKind,
}

impl SmoothedCurve {
    pub fn passthrough(series: Series) -> Self {
        Self {
            loads: series.loads,
            values: series.values,
            kind: InterpolationKind::Passthrough,
        }
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.loads.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(network: &str, lambda: f64) -> Observation {
        Observation::new(network, lambda, [1.0, 2.0, 3.0, 4.0, 0.01])
    }

    #[test]
    fn subset_keeps_only_matching_rows() {
        let table = ObservationTable::new(vec![row("AdHoc", 0.1), row("Group", 0.1), row("AdHoc", 0.2)]);
        let adhoc = table.subset(NetworkType::AdHoc);
        assert_eq!(adhoc.len(), 2);
        assert!(adhoc.rows().iter().all(|r| r.network == "AdHoc"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn network_labels_preserve_first_appearance() {
        let table = ObservationTable::new(vec![row("Group", 0.1), row("AdHoc", 0.1), row("Group", 0.2)]);
        assert_eq!(table.network_labels(), vec!["Group".to_string(), "AdHoc".to_string()]);
    }

    #[test]
    fn lambda_range_ignores_nan() {
        let table = ObservationTable::new(vec![row("AdHoc", f64::NAN), row("AdHoc", 0.5), row("AdHoc", 2.0)]);
        assert_eq!(table.lambda_range(), Some((0.5, 2.0)));
        assert_eq!(ObservationTable::default().lambda_range(), None);
    }

    #[test]
    fn required_columns_cover_schema() {
        let cols = required_columns();
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0], "NetworkType");
        assert!(cols.contains(&"GordonNewellMethod"));
    }
}
