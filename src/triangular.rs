//! Forward and backward substitution.
//!
//! Only the relevant triangle of the system matrix is read. Unknowns are
//! resolved one at a time in dependency order, so row `i` of a forward
//! solve only sees the already resolved rows `< i`.

use crate::error::{ensure_len, ensure_square, Error, Result};

fn check_system(mat: &na::DMatrix<f64>, rhs: &na::DVector<f64>) -> Result<usize> {
  let n = ensure_square(mat.nrows(), mat.ncols())?;
  ensure_len(n, rhs.len())?;
  Ok(n)
}

fn pivot(mat: &na::DMatrix<f64>, row: usize) -> Result<f64> {
  let diag = mat[(row, row)];
  if diag == 0.0 {
    return Err(Error::SingularSystem { row });
  }
  Ok(diag)
}

/// Solves $T y = b$ for lower-triangular $T$.
pub fn solve_lower(t: &na::DMatrix<f64>, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
  let n = check_system(t, b)?;
  let mut y = b.clone();
  for row in 0..n {
    let diag = pivot(t, row)?;
    let dot = t.row(row).columns(0, row).tr_dot(&y.rows(0, row));
    y[row] = (y[row] - dot) / diag;
  }
  Ok(y)
}

/// Solves $U x = y$ for upper-triangular $U$.
pub fn solve_upper(u: &na::DMatrix<f64>, y: &na::DVector<f64>) -> Result<na::DVector<f64>> {
  let n = check_system(u, y)?;
  let mut x = y.clone();
  for row in (0..n).rev() {
    let diag = pivot(u, row)?;
    let rest = n - row - 1;
    let dot = u.row(row).columns(row + 1, rest).tr_dot(&x.rows(row + 1, rest));
    x[row] = (x[row] - dot) / diag;
  }
  Ok(x)
}

/// Solves $T^T x = y$ for lower-triangular $T$, without forming $T^T$.
///
/// Row `i` of $T^T$ is column `i` of $T$, which is contiguous storage.
pub fn solve_lower_transpose(
  t: &na::DMatrix<f64>,
  y: &na::DVector<f64>,
) -> Result<na::DVector<f64>> {
  let n = check_system(t, y)?;
  let mut x = y.clone();
  for row in (0..n).rev() {
    let diag = pivot(t, row)?;
    let rest = n - row - 1;
    let dot = t.column(row).rows(row + 1, rest).dot(&x.rows(row + 1, rest));
    x[row] = (x[row] - dot) / diag;
  }
  Ok(x)
}
