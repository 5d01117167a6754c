//! Not-a-knot cubic interpolating spline.
//!
//! On each segment `[x_i, x_{i+1}]` with width `h_i` the spline is
//!
//! ```text
//! S(t) = M_i (x_{i+1} - t)^3 / (6 h_i) + M_{i+1} (t - x_i)^3 / (6 h_i)
//!      + (y_i / h_i - M_i h_i / 6) (x_{i+1} - t)
//!      + (y_{i+1} / h_i - M_{i+1} h_i / 6) (t - x_i)
//! ```
//!
//! where `M_i` are the second derivatives at the knots. Interior rows enforce
//! C2 continuity. The not-a-knot conditions (third derivative continuous
//! across `x_1` and `x_{n-2}`) express `M_0` and `M_{n-1}` through their two
//! neighbours; substituting them into the first and last interior rows keeps
//! the system tridiagonal and strictly diagonally dominant.
//! With exactly four knots this is the unique cubic through all of them.

use crate::math::interp::{InterpolationError, check_knots, segment_index};
use crate::math::solve::solve_tridiagonal;

/// Minimum knot count for the not-a-knot conditions to be independent.
pub const CUBIC_MIN_POINTS: usize = 4;

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, InterpolationError> {
        check_knots(x, y, CUBIC_MIN_POINTS)?;

        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        // Unknowns are M_1 ..= M_{n-2}.
        let k = n - 2;
        let mut sub = vec![0.0; k - 1];
        let mut diag = vec![0.0; k];
        let mut sup = vec![0.0; k - 1];
        let rhs: Vec<f64> = (1..n - 1).map(|i| 6.0 * (slope[i] - slope[i - 1])).collect();

        for r in 0..k {
            let i = r + 1;
            diag[r] = 2.0 * (h[i - 1] + h[i]);
            if r > 0 {
                sub[r - 1] = h[i - 1];
            }
            if r + 1 < k {
                sup[r] = h[i];
            }
        }

        // M_0 = ((h0 + h1) M_1 - h0 M_2) / h1
        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
        sup[0] = (h1 * h1 - h0 * h0) / h1;

        // M_{n-1} = ((a + b) M_{n-2} - b M_{n-3}) / a
        let (a, b) = (h[n - 3], h[n - 2]);
        diag[k - 1] = (a + b) * (2.0 * a + b) / a;
        sub[k - 2] = (a * a - b * b) / a;

        let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs).ok_or(InterpolationError::SingularSystem)?;

        let mut m = Vec::with_capacity(n);
        m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        m.extend_from_slice(&interior);
        m.push(((a + b) * interior[k - 1] - b * interior[k - 2]) / a);

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline; outside the knot range the end cubic is extended.
    pub fn eval(&self, t: f64) -> f64 {
        let i = segment_index(&self.x, t);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;

        let a = x1 - t;
        let b = t - x0;
        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}
