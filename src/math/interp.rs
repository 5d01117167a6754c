//! Grids and piecewise-linear interpolation.

use std::fmt;

/// Why an interpolant could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    TooFewPoints { needed: usize, got: usize },
    LengthMismatch { x: usize, y: usize },
    NonFiniteInput,
    /// Knots must be strictly increasing.
    NonIncreasingKnots,
    /// The spline system had no unique solution.
    SingularSystem,
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::TooFewPoints { needed, got } => {
                write!(f, "need at least {needed} points, got {got}")
            }
            InterpolationError::LengthMismatch { x, y } => {
                write!(f, "x/y length mismatch ({x} vs {y})")
            }
            InterpolationError::NonFiniteInput => write!(f, "non-finite input value"),
            InterpolationError::NonIncreasingKnots => write!(f, "knots are not strictly increasing"),
            InterpolationError::SingularSystem => write!(f, "spline system is singular"),
        }
    }
}

impl std::error::Error for InterpolationError {}

/// `count` evenly spaced points over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count as f64 - 1.0);
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            // Avoid accumulated rounding on the last point.
            out[count - 1] = end;
            out
        }
    }
}

/// Shared knot validation for every interpolant.
pub(crate) fn check_knots(x: &[f64], y: &[f64], needed: usize) -> Result<(), InterpolationError> {
    if x.len() != y.len() {
        return Err(InterpolationError::LengthMismatch { x: x.len(), y: y.len() });
    }
    if x.len() < needed {
        return Err(InterpolationError::TooFewPoints { needed, got: x.len() });
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(InterpolationError::NonFiniteInput);
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NonIncreasingKnots);
    }
    Ok(())
}

/// Index `i` of the segment `[x[i], x[i+1]]` used to evaluate at `t`.
///
/// Points outside the knot range map to the first/last segment so callers
/// extrapolate with the end pieces. Requires `x.len() >= 2`.
pub(crate) fn segment_index(x: &[f64], t: f64) -> usize {
    let upper = x.partition_point(|&xi| xi <= t);
    upper.saturating_sub(1).min(x.len() - 2)
}

/// Piecewise-linear interpolant that extrapolates along the end segments.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolant {
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, InterpolationError> {
        check_knots(x, y, 2)?;
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
        })
    }

    pub fn eval(&self, t: f64) -> f64 {
        let i = segment_index(&self.x, t);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        y0 + (y1 - y0) * (t - x0) / (x1 - x0)
    }
}

/// Piecewise-linear lookup clamped to the end values outside `[xp[0], xp[n-1]]`.
///
/// This never fails: it is the last resort when no interpolant can be built.
/// `xp` is assumed sorted; an empty `xp` yields NaN.
pub fn interp_clamped(t: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 || t <= xp[0] {
        return fp[0];
    }
    if t >= xp[n - 1] {
        return fp[n - 1];
    }
    let i = segment_index(&xp[..n], t);
    let (x0, x1) = (xp[i], xp[i + 1]);
    if x1 == x0 {
        return fp[i + 1];
    }
    fp[i] + (fp[i + 1] - fp[i]) * (t - x0) / (x1 - x0)
}
