//! Tridiagonal linear system solver.
//!
//! The cubic spline fit reduces to one tridiagonal system for the interior
//! knot second derivatives, so a single forward/backward sweep (Thomas
//! algorithm) solves it in linear time. The sweep does not pivot; callers
//! supply diagonally dominant systems.

/// Solve `A x = rhs` for tridiagonal `A`.
///
/// `sub[i]` is `A[i+1][i]`, `diag[i]` is `A[i][i]` and `sup[i]` is `A[i][i+1]`.
/// Returns `None` on a shape mismatch, a zero pivot or a non-finite solution.
pub fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = diag.len();
    if n == 0 || rhs.len() != n || sub.len() + 1 != n || sup.len() + 1 != n {
        return None;
    }

    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    let pivot = diag[0];
    if pivot == 0.0 || !pivot.is_finite() {
        return None;
    }
    if n > 1 {
        c[0] = sup[0] / pivot;
    }
    d[0] = rhs[0] / pivot;

    for i in 1..n {
        let pivot = diag[i] - sub[i - 1] * c[i - 1];
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        if i < n - 1 {
            c[i] = sup[i] / pivot;
        }
        d[i] = (rhs[i] - sub[i - 1] * d[i - 1]) / pivot;
    }

    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
