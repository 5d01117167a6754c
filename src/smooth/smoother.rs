//! Smoother: densify a series into a presentable curve.
//!
//! Interpolation is chosen in explicit tiers so every failure mode is named:
//!
//! 1. `Cubic`: not-a-knot spline, when there are at least four distinct loads
//! 2. `Linear`: piecewise-linear with end-segment extrapolation
//! 3. `RawLinear`: clamped piecewise-linear lookup, which cannot fail
//!
//! A tier that cannot be built (see `InterpolationError`) falls through to the
//! next one. Outputs that are not finite are dropped together with their load.

use tracing::debug;

use crate::domain::{InterpolationKind, Series, SmoothOptions, SmoothedCurve};
use crate::math::{CUBIC_MIN_POINTS, CubicSpline, LinearInterpolant, interp_clamped, linspace};
use crate::smooth::prepare::group_mean_by_load;

/// Grid density relative to the number of distinct input loads.
const GRID_POINTS_PER_SAMPLE: usize = 10;

/// Smooth a `(load, value)` series over an evenly spaced grid.
///
/// - 0 or 1 points are returned unchanged
/// - the input is re-sorted, re-filtered and duplicate loads are averaged
/// - fewer than 2 distinct loads are returned without interpolation
/// - otherwise the grid has `max(resolution, 10 × distinct loads)` points over
///   `[min load, max load]`
///
/// `options.window` is accepted as configuration and does not affect the result.
pub fn smooth_series(series: &Series, options: &SmoothOptions) -> SmoothedCurve {
    if series.len() <= 1 {
        return SmoothedCurve::passthrough(series.clone());
    }

    let finite: Vec<(f64, f64)> = series
        .points()
        .filter(|(load, value)| load.is_finite() && value.is_finite())
        .collect();
    if finite.len() <= 1 {
        let (loads, values) = finite.into_iter().unzip();
        return SmoothedCurve::passthrough(Series::new(loads, values));
    }

    // Sorting inside group_mean_by_load makes equal loads adjacent, so this
    // collapses every duplicate.
    let unique = group_mean_by_load(finite);
    if unique.len() < 2 {
        return SmoothedCurve::passthrough(unique);
    }

    let n = unique.len();
    let grid_points = options.resolution.max(n * GRID_POINTS_PER_SAMPLE);
    let grid = linspace(unique.loads[0], unique.loads[n - 1], grid_points);

    let (dense, kind) = interpolate(&unique, &grid);

    let (loads, values): (Vec<f64>, Vec<f64>) = grid
        .into_iter()
        .zip(dense)
        .filter(|(_, v)| v.is_finite())
        .unzip();

    debug!(input = series.len(), unique = n, output = loads.len(), ?kind, "series smoothed");

    SmoothedCurve { loads, values, kind }
}

/// Evaluate the best interpolant that can be built for `unique` on `grid`.
fn interpolate(unique: &Series, grid: &[f64]) -> (Vec<f64>, InterpolationKind) {
    let (x, y) = (&unique.loads, &unique.values);

    if x.len() >= CUBIC_MIN_POINTS {
        match CubicSpline::fit(x, y) {
            Ok(spline) => return (grid.iter().map(|&t| spline.eval(t)).collect(), InterpolationKind::Cubic),
            Err(e) => debug!("cubic interpolation unavailable ({e}); trying linear"),
        }
    }

    match LinearInterpolant::fit(x, y) {
        Ok(linear) => (grid.iter().map(|&t| linear.eval(t)).collect(), InterpolationKind::Linear),
        Err(e) => {
            debug!("linear interpolation unavailable ({e}); using clamped lookup");
            (
                grid.iter().map(|&t| interp_clamped(t, x, y)).collect(),
                InterpolationKind::RawLinear,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> SmoothOptions {
        SmoothOptions::default()
    }

    #[test]
    fn zero_or_one_point_is_unchanged() {
        let empty = smooth_series(&Series::default(), &opts());
        assert!(empty.is_empty());
        assert_eq!(empty.kind, InterpolationKind::Passthrough);

        let one = Series::new(vec![0.5], vec![f64::NAN]);
        let out = smooth_series(&one, &opts());
        assert_eq!(out.loads, vec![0.5]);
        assert!(out.values[0].is_nan());
    }

    #[test]
    fn duplicate_loads_collapse_to_their_mean() {
        let series = Series::new(vec![1.0, 1.0, 2.0], vec![10.0, 20.0, 5.0]);
        let out = smooth_series(&series, &opts());
        assert_eq!(out.kind, InterpolationKind::Linear);
        assert_eq!(out.len(), 300);
        assert!((out.values[0] - 15.0).abs() < 1e-12);
        assert!((out.values[out.len() - 1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn all_duplicates_return_single_mean_point() {
        let series = Series::new(vec![2.0, 2.0, 2.0], vec![1.0, 2.0, 6.0]);
        let out = smooth_series(&series, &opts());
        assert_eq!(out.kind, InterpolationKind::Passthrough);
        assert_eq!(out.loads, vec![2.0]);
        assert_eq!(out.values, vec![3.0]);
    }

    #[test]
    fn dense_grid_spans_input_domain() {
        let loads: Vec<f64> = (1..=40).map(|i| i as f64 * 0.05).collect();
        let values: Vec<f64> = loads.iter().map(|l| l / (1.0 + l)).collect();
        let out = smooth_series(&Series::new(loads.clone(), values), &opts());

        assert_eq!(out.kind, InterpolationKind::Cubic);
        assert!(out.len() >= 400);
        assert!((out.loads[0] - loads[0]).abs() < 1e-12);
        assert!((out.loads[out.len() - 1] - loads[39]).abs() < 1e-12);
        assert!(out.points().all(|(l, v)| l.is_finite() && v.is_finite()));
    }

    #[test]
    fn unsorted_input_with_noise_values_is_cleaned() {
        let series = Series::new(
            vec![0.4, 0.1, 0.3, f64::NAN, 0.2, 0.5],
            vec![4.0, 1.0, 3.0, 9.0, f64::INFINITY, 5.0],
        );
        let out = smooth_series(&series, &opts());
        assert_eq!(out.kind, InterpolationKind::Cubic);
        assert!((out.loads[0] - 0.1).abs() < 1e-12);
        assert!(out.loads.windows(2).all(|w| w[1] > w[0]));
        // Linear data through a not-a-knot spline stays linear.
        for (l, v) in out.points() {
            assert!((v - 10.0 * l).abs() < 1e-9);
        }
    }

    #[test]
    fn fewer_than_four_points_use_linear() {
        let series = Series::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]);
        let out = smooth_series(&series, &opts());
        assert_eq!(out.kind, InterpolationKind::Linear);
        for (l, v) in out.points() {
            let expected = if l <= 1.0 { l } else { 1.0 + 3.0 * (l - 1.0) };
            assert!((v - expected).abs() < 1e-9, "load {l}");
        }
    }

    #[test]
    fn resolution_option_raises_grid_size() {
        let series = Series::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0, 1.0]);
        let out = smooth_series(&series, &SmoothOptions { resolution: 1000, window: 3 });
        assert_eq!(out.len(), 1000);
    }

    #[test]
    fn resmoothing_is_nearly_idempotent() {
        let loads: Vec<f64> = (1..=20).map(|i| i as f64 * 0.1).collect();
        let values: Vec<f64> = loads.iter().map(|l| l / (1.0 + l)).collect();
        let first = smooth_series(&Series::new(loads, values), &opts());
        let second = smooth_series(&Series::new(first.loads.clone(), first.values.clone()), &opts());

        assert_eq!(second.kind, InterpolationKind::Cubic);
        for (l, v) in second.points() {
            let expected = interp_clamped(l, &first.loads, &first.values);
            assert!((v - expected).abs() < 1e-4, "load {l}: {v} vs {expected}");
        }
    }

    #[test]
    fn thousands_of_loads_smooth_in_linear_time() {
        let n = 5000;
        let loads: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
        let values: Vec<f64> = loads.iter().map(|l| (l * 0.7).sin() + 0.1 * l).collect();
        let series = Series::new(loads, values);

        let started = std::time::Instant::now();
        let out = smooth_series(&series, &opts());
        let elapsed = started.elapsed();

        assert_eq!(out.kind, InterpolationKind::Cubic);
        assert_eq!(out.len(), n * GRID_POINTS_PER_SAMPLE);
        assert!(elapsed.as_secs_f64() < 5.0, "took {elapsed:?}");

        let again = smooth_series(&Series::new(out.loads.clone(), out.values.clone()), &opts());
        assert_eq!(again.kind, InterpolationKind::Cubic);
        assert!(started.elapsed().as_secs_f64() < 20.0);
    }
}
