//! Dense Cholesky factorization $M = T T^T$.
//!
//! Both variants are column-oriented: column `col` of $T$ is completed
//! before any entry of a later column is touched, and each entry is one
//! inner product over the already finished columns.
//!
//! The incomplete variant reproduces the zero pattern of $M$ exactly:
//! an entry $T_(i j)$ with $M_(i j) = 0$ is never computed and stays zero.
//! No pivoting is done. Symmetry and definiteness of the input are assumed,
//! only the strictly lower triangle and the diagonal of $M$ are read.

use crate::{
  error::{ensure_square, InvalidInput, Result},
  triangular,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FactorizeMode {
  #[default]
  Complete,
  /// Sparsity-preserving approximation, zero fill-in.
  Incomplete,
}

pub fn complete_cholesky(m: &na::DMatrix<f64>) -> Result<na::DMatrix<f64>> {
  factorize(m, FactorizeMode::Complete)
}

pub fn incomplete_cholesky(m: &na::DMatrix<f64>) -> Result<na::DMatrix<f64>> {
  factorize(m, FactorizeMode::Incomplete)
}

/// Returns the lower-triangular factor $T$ of `m`.
///
/// Fails with [`InvalidInput::NotSquare`] for non-square input and with
/// [`InvalidInput::NotPositiveDefinite`] as soon as a pivot under the square
/// root is not strictly positive.
///
/// In incomplete mode a zero diagonal entry of `m` makes the whole column
/// of $T$ zero, including the diagonal. This is not an error.
pub fn factorize(m: &na::DMatrix<f64>, mode: FactorizeMode) -> Result<na::DMatrix<f64>> {
  let n = ensure_square(m.nrows(), m.ncols())?;
  let _span = tracing::debug_span!("factorize", n, ?mode).entered();

  let incomplete = mode == FactorizeMode::Incomplete;

  // Transposed factor $U = T^T$. Row `i` of $T$ is column `i` of $U$,
  // so both operands of every inner product are contiguous column prefixes.
  let mut u = na::DMatrix::<f64>::zeros(n, n);
  let mut nskipped = 0;

  for col in 0..n {
    let diag_entry = m[(col, col)];
    if incomplete && diag_entry == 0.0 {
      tracing::trace!(col, "zero diagonal entry, column left empty");
      nskipped += n - col;
      continue;
    }

    let pivot = diag_entry - u.column(col).rows(0, col).norm_squared();
    if pivot.is_nan() || pivot <= 0.0 {
      tracing::warn!(col, pivot, "non-positive pivot, aborting factorization");
      return Err(InvalidInput::NotPositiveDefinite { col, pivot }.into());
    }
    let diag = pivot.sqrt();
    u[(col, col)] = diag;

    for row in col + 1..n {
      let entry = m[(row, col)];
      if incomplete && entry == 0.0 {
        nskipped += 1;
        continue;
      }
      let dot = u.column(row).rows(0, col).dot(&u.column(col).rows(0, col));
      u[(col, row)] = (entry - dot) / diag;
    }
  }

  tracing::debug!(nskipped, "factorization finished");
  Ok(u.transpose())
}

/// A computed factorization, ready to solve $M x = b$.
#[derive(Debug, Clone)]
pub struct Cholesky {
  factor: na::DMatrix<f64>,
  mode: FactorizeMode,
}

impl Cholesky {
  pub fn new(m: &na::DMatrix<f64>, mode: FactorizeMode) -> Result<Self> {
    let factor = factorize(m, mode)?;
    Ok(Self { factor, mode })
  }

  pub fn dim(&self) -> usize {
    self.factor.nrows()
  }
  pub fn mode(&self) -> FactorizeMode {
    self.mode
  }
  pub fn factor(&self) -> &na::DMatrix<f64> {
    &self.factor
  }
  pub fn into_factor(self) -> na::DMatrix<f64> {
    self.factor
  }

  /// $T T^T$, equal to the input up to rounding in complete mode.
  pub fn reconstruct(&self) -> na::DMatrix<f64> {
    &self.factor * self.factor.transpose()
  }

  /// Forward substitution with $T$, then backward substitution with $T^T$.
  pub fn solve(&self, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    let y = triangular::solve_lower(&self.factor, b)?;
    triangular::solve_lower_transpose(&self.factor, &y)
  }
}

#[cfg(test)]
mod test {
  use super::{complete_cholesky, factorize, incomplete_cholesky, Cholesky, FactorizeMode};
  use crate::{linalg::assert_mat_eq, Error, InvalidInput};

  #[rustfmt::skip]
  fn handchecked() -> (na::DMatrix<f64>, na::DMatrix<f64>) {
    let m = na::DMatrix::from_row_slice(3, 3, &[
        4.0,  12.0, -16.0,
       12.0,  37.0, -43.0,
      -16.0, -43.0,  98.0,
    ]);
    let t = na::DMatrix::from_row_slice(3, 3, &[
       2.0, 0.0, 0.0,
       6.0, 1.0, 0.0,
      -8.0, 5.0, 3.0,
    ]);
    (m, t)
  }

  #[test]
  fn complete_matches_handchecked() {
    let (m, t) = handchecked();
    assert_mat_eq(&complete_cholesky(&m).unwrap(), &t, 1e-12);
  }

  #[test]
  fn incomplete_on_dense_input_is_complete() {
    let (m, t) = handchecked();
    assert_mat_eq(&incomplete_cholesky(&m).unwrap(), &t, 1e-12);
  }

  #[test]
  fn incomplete_on_tridiagonal_has_no_fill() {
    let m = crate::linalg::matrix_from_const_diagonals(&[-1.0, 2.0, -1.0], &[-1, 0, 1], 6, 6);
    let complete = complete_cholesky(&m).unwrap();
    let incomplete = incomplete_cholesky(&m).unwrap();
    assert_eq!(complete, incomplete);
  }

  #[test]
  fn incomplete_zero_diagonal_empties_column() {
    let m = na::DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 2.0]);
    let t = incomplete_cholesky(&m).unwrap();
    assert_eq!(t[(0, 0)], 0.0);
    assert_eq!(t[(1, 0)], 0.0);
    assert_eq!(t[(1, 1)], 2f64.sqrt());
    assert!(t.iter().all(|v| v.is_finite()));

    assert!(complete_cholesky(&m).unwrap_err().is_invalid_input());
  }

  #[test]
  fn indefinite_input_is_rejected() {
    let m = na::DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
    let err = complete_cholesky(&m).unwrap_err();
    assert_eq!(
      err,
      Error::InvalidInput(InvalidInput::NotPositiveDefinite { col: 1, pivot: -3.0 })
    );
  }

  #[test]
  fn non_square_is_rejected() {
    let m = na::DMatrix::<f64>::zeros(2, 3);
    for mode in [FactorizeMode::Complete, FactorizeMode::Incomplete] {
      assert_eq!(
        factorize(&m, mode).unwrap_err(),
        Error::InvalidInput(InvalidInput::NotSquare { nrows: 2, ncols: 3 })
      );
    }
  }

  #[test]
  fn empty_matrix() {
    let m = na::DMatrix::<f64>::zeros(0, 0);
    assert_eq!(complete_cholesky(&m).unwrap().nrows(), 0);
  }

  #[test]
  fn solve_recovers_rhs() {
    let (m, _) = handchecked();
    let x_true = na::DVector::from_column_slice(&[1.0, -2.0, 0.5]);
    let b = &m * &x_true;
    let chol = Cholesky::new(&m, FactorizeMode::Complete).unwrap();
    let x = chol.solve(&b).unwrap();
    approx::assert_relative_eq!(x, x_true, epsilon = 1e-10);
    assert_mat_eq(&chol.reconstruct(), &m, 1e-12);
  }
}
