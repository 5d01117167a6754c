//! PNG output of the composed figure.
//!
//! The figure is drawn into an in-memory RGB buffer, cropped to its drawn
//! content plus a small pad, and encoded as PNG.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::domain::Settings;
use crate::error::AppError;
use crate::plot::{Figure, draw_figure, ensure_chart_font};

/// Points per inch; drawing sizes are given in points and scaled by `dpi / 72`.
const POINTS_PER_INCH: f64 = 72.0;

/// Whitespace kept around the drawn content when cropping, in inches.
const CROP_PAD_IN: f64 = 0.1;

/// Render `figure` to a PNG at `path`, sized by `settings`.
///
/// The parent directory is created if missing. The bitmap and its drawing
/// area are dropped before returning, so no rendering state outlives a call.
pub fn write_figure_png(figure: &Figure, path: &Path, settings: &Settings) -> Result<(), AppError> {
    let font = ensure_chart_font(settings.font_path.as_deref())?;
    debug!(%font, "using chart font");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let (width, height) = settings.pixel_size();
    let scale = settings.dpi as f64 / POINTS_PER_INCH;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure, scale).map_err(|e| AppError::output(format!("Failed to draw figure: {e}")))?;
        root.present()
            .map_err(|e| AppError::output(format!("Failed to finish figure: {e}")))?;
    }

    let pad = (CROP_PAD_IN * settings.dpi as f64).round() as u32;
    let cropped = crop_to_content(&buffer, width, height, pad)
        .ok_or_else(|| AppError::output("Rendered figure buffer has an unexpected size."))?;
    let (out_w, out_h) = cropped.dimensions();

    cropped
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AppError::output(format!("Failed to write image '{}': {e}", path.display())))?;

    info!(path = %path.display(), width = out_w, height = out_h, dpi = settings.dpi, "figure written");
    Ok(())
}

/// Crop an RGB buffer to the bounding box of its non-white pixels, keeping
/// `pad` pixels of margin where available. An all-white buffer is kept whole.
pub fn crop_to_content(buffer: &[u8], width: u32, height: u32, pad: u32) -> Option<RgbImage> {
    let (w, h) = (width as usize, height as usize);
    if buffer.len() != w * h * 3 {
        return None;
    }

    let is_ink = |x: usize, y: usize| {
        let i = (y * w + x) * 3;
        buffer[i..i + 3] != [255, 255, 255]
    };

    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for y in 0..h {
        for x in 0..w {
            if is_ink(x, y) {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
    }

    let full = || RgbImage::from_raw(width, height, buffer.to_vec());
    let Some((x0, y0, x1, y1)) = bounds else {
        return full();
    };

    let pad = pad as usize;
    let (left, top) = (x0.saturating_sub(pad), y0.saturating_sub(pad));
    let (right, bottom) = ((x1 + pad).min(w - 1), (y1 + pad).min(h - 1));
    let (out_w, out_h) = (right - left + 1, bottom - top + 1);

    let mut data = Vec::with_capacity(out_w * out_h * 3);
    for y in top..=bottom {
        let start = (y * w + left) * 3;
        data.extend_from_slice(&buffer[start..start + out_w * 3]);
    }
    RgbImage::from_raw(out_w as u32, out_h as u32, data)
}
