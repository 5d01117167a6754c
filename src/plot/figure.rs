//! Figure model.
//!
//! Building the figure is separated from drawing it: `build_figure` does all
//! series preparation and smoothing, `draw_figure` only paints. The figure can
//! therefore be inspected in tests and exported without touching a backend.

use std::ops::Range;

use plotters::style::RGBColor;

use crate::domain::{Metric, NetworkType, ObservationTable, SECONDS_TO_MS, SmoothOptions, SmoothedCurve};
use crate::smooth::{prepare_series, smooth_series};

pub const FIGURE_TITLE: &str = "NS-3 Network Simulation: Analysis Method Comparison";
pub const LOAD_AXIS_LABEL: &str = "Load λ (packets/s)";
pub const THROUGHPUT_AXIS_LABEL: &str = "Throughput (Mbit/s)";
pub const DELAY_AXIS_LABEL: &str = "Delay (ms)";

/// Fractional padding added around the data range on each axis.
const AXIS_MARGIN: f64 = 0.05;

/// Share of the plotting area (width, height) a legend box is assumed to cover.
const LEGEND_BOX: (f64, f64) = (0.35, 0.3);

/// Fixed per-method palette.
pub fn metric_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::MeanValueAnalysis | Metric::MeanValueDelay => RGBColor(0x1D, 0x69, 0x96),
        Metric::GlobalBalance => RGBColor(0x38, 0xA8, 0x00),
        Metric::GordonNewell => RGBColor(0xF2, 0x8E, 0x2B),
        Metric::Buzen => RGBColor(0x94, 0x67, 0xBD),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Throughput,
    Delay,
}

/// Corner of the plotting area that hosts the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl LegendCorner {
    /// Candidates in preference order for ties.
    pub const ALL: [LegendCorner; 4] = [
        LegendCorner::UpperRight,
        LegendCorner::UpperLeft,
        LegendCorner::LowerLeft,
        LegendCorner::LowerRight,
    ];

    /// Whether a point at normalized plot coordinates `(u, v)` in `[0, 1]`
    /// (origin lower left) falls under a legend in this corner.
    fn covers(self, u: f64, v: f64) -> bool {
        let (bw, bh) = LEGEND_BOX;
        let in_left = u <= bw;
        let in_right = u >= 1.0 - bw;
        let in_bottom = v <= bh;
        let in_top = v >= 1.0 - bh;
        match self {
            LegendCorner::UpperRight => in_right && in_top,
            LegendCorner::UpperLeft => in_left && in_top,
            LegendCorner::LowerLeft => in_left && in_bottom,
            LegendCorner::LowerRight => in_right && in_bottom,
        }
    }
}

/// One labeled line on a panel.
#[derive(Debug, Clone)]
pub struct Curve {
    pub network: NetworkType,
    pub metric: Metric,
    pub label: String,
    pub color: RGBColor,
    pub smoothed: SmoothedCurve,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub network: NetworkType,
    pub kind: PanelKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendCorner,
    pub curves: Vec<Curve>,
}

impl Panel {
    fn new(network: NetworkType, kind: PanelKind) -> Self {
        let (title, y_label) = match kind {
            PanelKind::Throughput => (format!("{} Network Throughput", network.display_name()), THROUGHPUT_AXIS_LABEL),
            PanelKind::Delay => (format!("{} Network Delay", network.display_name()), DELAY_AXIS_LABEL),
        };
        Self {
            network,
            kind,
            title,
            x_label: LOAD_AXIS_LABEL.to_string(),
            y_label: y_label.to_string(),
            legend: LegendCorner::UpperRight,
            curves: Vec::new(),
        }
    }

    /// Axis ranges covering every curve, padded; `0..1` for an empty panel.
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let xs = self.curves.iter().flat_map(|c| c.smoothed.loads.iter().copied());
        let ys = self.curves.iter().flat_map(|c| c.smoothed.values.iter().copied());
        (padded_range(xs), padded_range(ys))
    }

    /// The corner whose legend box would hide the fewest curve points.
    pub fn best_legend_corner(&self) -> LegendCorner {
        let (xr, yr) = self.bounds();
        let (xs, ys) = (xr.end - xr.start, yr.end - yr.start);

        let mut hidden = [0usize; 4];
        for (x, y) in self.curves.iter().flat_map(|c| c.smoothed.points()) {
            let (u, v) = ((x - xr.start) / xs, (y - yr.start) / ys);
            for (count, corner) in hidden.iter_mut().zip(LegendCorner::ALL) {
                if corner.covers(u, v) {
                    *count += 1;
                }
            }
        }

        LegendCorner::ALL
            .into_iter()
            .zip(hidden)
            .min_by_key(|&(_, count)| count)
            .map_or(LegendCorner::UpperRight, |(corner, _)| corner)
    }

    fn finish(mut self) -> Self {
        self.legend = self.best_legend_corner();
        self
    }
}

/// The composed 2×2 figure, panels in row-major order:
/// Ad-Hoc throughput, Group throughput, Ad-Hoc delay, Group delay.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub const GRID: (usize, usize) = (2, 2);

    pub fn curve_count(&self) -> usize {
        self.panels.iter().map(|p| p.curves.len()).sum()
    }
}

/// Prepare, smooth and arrange every method curve of the table.
///
/// Missing categories and empty series simply leave a panel without curves.
pub fn build_figure(table: &ObservationTable, options: &SmoothOptions) -> Figure {
    let mut throughput = Vec::with_capacity(NetworkType::ALL.len());
    let mut delay = Vec::with_capacity(NetworkType::ALL.len());

    for network in NetworkType::ALL {
        let subset = table.subset(network);

        let mut panel = Panel::new(network, PanelKind::Throughput);
        for metric in Metric::THROUGHPUT {
            push_curve(&mut panel, &subset, metric, 1.0, options);
        }
        throughput.push(panel.finish());

        let mut panel = Panel::new(network, PanelKind::Delay);
        push_curve(&mut panel, &subset, Metric::MeanValueDelay, SECONDS_TO_MS, options);
        delay.push(panel.finish());
    }

    throughput.extend(delay);
    Figure {
        title: FIGURE_TITLE.to_string(),
        panels: throughput,
    }
}

fn push_curve(panel: &mut Panel, subset: &ObservationTable, metric: Metric, scale: f64, options: &SmoothOptions) {
    let series = prepare_series(subset, metric);
    if series.is_empty() {
        return;
    }
    let series = if scale == 1.0 { series } else { series.scaled(scale) };
    let smoothed = smooth_series(&series, options);
    if smoothed.is_empty() {
        return;
    }
    panel.curves.push(Curve {
        network: panel.network,
        metric,
        label: metric.display_name().to_string(),
        color: metric_color(metric),
        smoothed,
    });
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !(lo.is_finite() && hi.is_finite()) {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span.abs() < 1e-12 {
        let pad = if lo.abs() > 1e-12 { lo.abs() * AXIS_MARGIN } else { 0.5 };
        return (lo - pad)..(hi + pad);
    }
    (lo - span * AXIS_MARGIN)..(hi + span * AXIS_MARGIN)
}
