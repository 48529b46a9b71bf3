//! Incomplete Cholesky factorization on compressed sparse column storage.
//!
//! Only positions stored with a nonzero value in the lower triangle of $M$
//! are computed. Everything else is a structural zero of the factor, which
//! gives the same result as the dense incomplete mode without ever touching
//! the zero entries.

use crate::error::{ensure_len, ensure_square, Error, InvalidInput, Result};

/// Lower-triangular incomplete factor $T$ in CSC layout.
#[derive(Debug, Clone)]
pub struct IncompleteCholesky {
  factor: nas::CscMatrix<f64>,
}

impl IncompleteCholesky {
  /// `m` must be symmetric. Only its diagonal and strictly lower triangle are read.
  pub fn new(m: &nas::CscMatrix<f64>) -> Result<Self> {
    let n = ensure_square(m.nrows(), m.ncols())?;
    let _span = tracing::debug_span!("sparse_incomplete_cholesky", n, nnz = m.nnz()).entered();

    // Rows of $T$ finished so far, each sorted by column index.
    let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut coo = nas::CooMatrix::new(n, n);

    for col in 0..n {
      let mcol = m.col(col);
      let mut diag_entry = 0.0;
      let mut lower = Vec::new();
      for (&row, &value) in mcol.row_indices().iter().zip(mcol.values()) {
        if row == col {
          diag_entry = value;
        } else if row > col && value != 0.0 {
          lower.push((row, value));
        }
      }

      if diag_entry == 0.0 {
        tracing::trace!(col, "zero diagonal entry, column left empty");
        continue;
      }

      let pivot = diag_entry - rows[col].iter().map(|&(_, v)| v * v).sum::<f64>();
      if pivot.is_nan() || pivot <= 0.0 {
        tracing::warn!(col, pivot, "non-positive pivot, aborting factorization");
        return Err(InvalidInput::NotPositiveDefinite { col, pivot }.into());
      }
      let diag = pivot.sqrt();

      let mut column = Vec::with_capacity(lower.len() + 1);
      column.push((col, diag));
      for (row, value) in lower {
        let dot = sparse_dot(&rows[row], &rows[col]);
        column.push((row, (value - dot) / diag));
      }

      for (row, value) in column {
        rows[row].push((col, value));
        coo.push(row, col, value);
      }
    }

    let factor = nas::CscMatrix::from(&coo);
    tracing::debug!(nnz = factor.nnz(), "sparse incomplete factorization finished");
    Ok(Self { factor })
  }

  pub fn dim(&self) -> usize {
    self.factor.nrows()
  }
  pub fn factor(&self) -> &nas::CscMatrix<f64> {
    &self.factor
  }
  pub fn into_factor(self) -> nas::CscMatrix<f64> {
    self.factor
  }
  pub fn to_dense(&self) -> na::DMatrix<f64> {
    na::DMatrix::from(&self.factor)
  }

  /// Solves $T T^T x = b$, column-oriented in both sweeps.
  pub fn solve(&self, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    let n = self.dim();
    ensure_len(n, b.len())?;
    let mut x = b.clone();

    // $T y = b$
    for col in 0..n {
      let (rows, values) = self.column_below_diagonal(col);
      let diag = self.diagonal(col)?;
      let y_col = x[col] / diag;
      x[col] = y_col;
      for (&row, &value) in rows.iter().zip(values) {
        x[row] -= value * y_col;
      }
    }

    // $T^T x = y$
    for col in (0..n).rev() {
      let (rows, values) = self.column_below_diagonal(col);
      let diag = self.diagonal(col)?;
      let dot: f64 = rows
        .iter()
        .zip(values)
        .map(|(&row, &value)| value * x[row])
        .sum();
      x[col] = (x[col] - dot) / diag;
    }

    Ok(x)
  }

  fn column(&self, col: usize) -> (&[usize], &[f64]) {
    let range = self.factor.col_offsets()[col]..self.factor.col_offsets()[col + 1];
    (
      &self.factor.row_indices()[range.clone()],
      &self.factor.values()[range],
    )
  }

  fn diagonal(&self, col: usize) -> Result<f64> {
    match self.column(col) {
      ([row, ..], [value, ..]) if *row == col && *value != 0.0 => Ok(*value),
      _ => Err(Error::SingularSystem { row: col }),
    }
  }

  fn column_below_diagonal(&self, col: usize) -> (&[usize], &[f64]) {
    let (rows, values) = self.column(col);
    let start = rows.partition_point(|&row| row <= col);
    (&rows[start..], &values[start..])
  }
}

/// Inner product of two rows sorted by column index.
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
  let mut sum = 0.0;
  let (mut i, mut j) = (0, 0);
  while i < a.len() && j < b.len() {
    match a[i].0.cmp(&b[j].0) {
      std::cmp::Ordering::Less => i += 1,
      std::cmp::Ordering::Greater => j += 1,
      std::cmp::Ordering::Equal => {
        sum += a[i].1 * b[j].1;
        i += 1;
        j += 1;
      }
    }
  }
  sum
}
