//! Plotters drawing of a composed `Figure`.
//!
//! Sizes are specified in typographic points and converted with `scale`
//! (pixels per point, i.e. `dpi / 72`), so the layout looks the same at any
//! output resolution.

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::plot::figure::{Figure, LegendCorner, Panel};

const SUPTITLE_PT: f64 = 18.0;
const TITLE_PT: f64 = 14.0;
const AXIS_LABEL_PT: f64 = 12.0;
const TICK_PT: f64 = 10.0;
const LEGEND_PT: f64 = 10.0;
const LINE_WIDTH_PT: f64 = 2.8;
const PANEL_MARGIN_PT: f64 = 12.0;
const X_LABEL_AREA_PT: f64 = 40.0;
const Y_LABEL_AREA_PT: f64 = 60.0;
const LEGEND_SWATCH_PT: f64 = 24.0;

/// Paint `figure` onto `root`: white background, suptitle and 2×2 panels.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    scale: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let body = root.titled(&figure.title, font(SUPTITLE_PT, scale, FontStyle::Bold))?;
    let areas = body.split_evenly(Figure::GRID);

    for (area, panel) in areas.iter().zip(figure.panels.iter()) {
        draw_panel(area, panel, scale)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    scale: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x_range, y_range) = panel.bounds();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, font(TITLE_PT, scale, FontStyle::Bold))
        .margin(px(PANEL_MARGIN_PT, scale))
        .x_label_area_size(px(X_LABEL_AREA_PT, scale))
        .y_label_area_size(px(Y_LABEL_AREA_PT, scale))
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .axis_desc_style(font(AXIS_LABEL_PT, scale, FontStyle::Bold))
        .label_style(font(TICK_PT, scale, FontStyle::Normal))
        .bold_line_style(BLACK.mix(0.25).stroke_width(px(0.8, scale).max(1)))
        .light_line_style(TRANSPARENT)
        .axis_style(BLACK.mix(0.8).stroke_width(px(0.8, scale).max(1)))
        .draw()?;

    let line_width = px(LINE_WIDTH_PT, scale).max(1);
    let swatch = px(LEGEND_SWATCH_PT, scale) as i32;

    for curve in &panel.curves {
        let style = curve.color.mix(0.95).stroke_width(line_width);
        chart
            .draw_series(LineSeries::new(curve.smoothed.points(), style))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], style));
    }

    // An empty panel keeps its axes but gets no legend box.
    if !panel.curves.is_empty() {
        chart
            .configure_series_labels()
            .position(match panel.legend {
                LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
                LegendCorner::UpperLeft => SeriesLabelPosition::UpperLeft,
                LegendCorner::LowerLeft => SeriesLabelPosition::LowerLeft,
                LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
            })
            .label_font(font(LEGEND_PT, scale, FontStyle::Normal))
            .background_style(WHITE.mix(0.95))
            .border_style(BLACK.mix(0.3))
            .draw()?;
    }

    Ok(())
}

fn font(points: f64, scale: f64, style: FontStyle) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, points * scale, style)
}

fn px(points: f64, scale: f64) -> u32 {
    (points * scale).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_sizes_scale_with_dpi() {
        let scale = 300.0 / 72.0;
        assert_eq!(px(LINE_WIDTH_PT, scale), 12);
        assert_eq!(px(X_LABEL_AREA_PT, 72.0 / 72.0), 40);
        assert_eq!(px(-1.0, scale), 0);
    }
}
