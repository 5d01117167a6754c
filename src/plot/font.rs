//! Chart font discovery and registration.
//!
//! Plotters rasterizes text with `ab_glyph`, which needs the TrueType bytes
//! registered up front. An explicitly configured font must exist. Otherwise a
//! sans-serif font is looked up in a short list of well-known locations, and
//! the bundled DejaVu Sans is used when none is installed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use plotters::style::{FontStyle, register_font};
use tracing::{debug, warn};

use crate::domain::ENV_FONT;
use crate::error::AppError;

/// DejaVu Sans, shipped with the crate (license in `assets/fonts`).
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Where the registered chart font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartFont {
    File(PathBuf),
    Bundled,
}

impl fmt::Display for ChartFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartFont::File(path) => write!(f, "{}", path.display()),
            ChartFont::Bundled => write!(f, "bundled DejaVu Sans"),
        }
    }
}

/// The font currently registered with plotters. Only successful
/// registrations are recorded.
static REGISTERED: Mutex<Option<ChartFont>> = Mutex::new(None);

/// First usable font file: the explicit path if given, else a known location.
pub fn find_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Make sure chart text can be drawn, registering a font if needed.
///
/// Re-registers whenever the resolved font differs from the current one, so
/// a different `--font` later in the process takes effect.
pub fn ensure_chart_font(explicit: Option<&Path>) -> Result<ChartFont, AppError> {
    let wanted = match explicit {
        Some(path) if path.is_file() => ChartFont::File(path.to_path_buf()),
        Some(path) => {
            return Err(AppError::output(format!(
                "Font file '{}' does not exist (set via --font or `{ENV_FONT}`).",
                path.display()
            )));
        }
        None => find_font(None).map_or(ChartFont::Bundled, ChartFont::File),
    };

    let mut current = REGISTERED
        .lock()
        .map_err(|_| AppError::output("Chart font registry is unavailable."))?;
    if current.as_ref() == Some(&wanted) {
        return Ok(wanted);
    }

    let registered = match (&wanted, explicit) {
        (ChartFont::File(path), Some(_)) => register_file(path).map_err(AppError::output)?,
        (ChartFont::File(path), None) => register_file(path).or_else(|e| {
            warn!("{e}; falling back to the bundled font");
            register_bundled()
        })?,
        (ChartFont::Bundled, _) => register_bundled()?,
    };

    debug!(font = %registered, "chart font registered");
    *current = Some(registered.clone());
    Ok(registered)
}

fn register_file(path: &Path) -> Result<ChartFont, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read font '{}': {e}", path.display()))?;
    // Plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_bytes(bytes).map_err(|_| format!("Invalid font '{}'", path.display()))?;
    Ok(ChartFont::File(path.to_path_buf()))
}

fn register_bundled() -> Result<ChartFont, AppError> {
    register_bytes(BUNDLED_FONT).map_err(|_| AppError::output("Bundled chart font is invalid."))?;
    Ok(ChartFont::Bundled)
}

fn register_bytes(bytes: &'static [u8]) -> Result<(), ()> {
    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font("sans-serif", style, bytes).map_err(|_| ())?;
    }
    Ok(())
}
