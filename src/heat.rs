//! Steady-state heat equation on a square grid, discretized by finite differences.
//!
//! For an $n times n$ grid the unknowns are ordered column-major: grid entry
//! `(row, col)` is vector entry `col * n + row`. This is exactly nalgebra's
//! storage order, so flattening and unflattening are plain slice copies and
//! the output grid has the orientation of the input grid.
//!
//! The system is $A x = h^2 / k f$, with $A$ the 5-point Laplacian
//! (no $1/h^2$ scaling) and zero temperature outside the grid.
//! $-A$ is symmetric positive-definite and gets factorized as $T T^T$,
//! so $x = -T^(-T) T^(-1) b$.

use crate::{
  cholesky::{Cholesky, FactorizeMode},
  error::{ensure_len, ensure_square, InvalidInput, Result},
  linalg::{kronecker_sum, matrix_from_const_diagonals},
  sparse::{FaerCholesky, SparseMatrix},
  triangular,
};

/// Thermal conductivity of air in $W/(m K)$.
pub const AIR_CONDUCTIVITY: f64 = 0.025;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatParams {
  /// Grid spacing, equal on both axes.
  pub h: f64,
  pub conductivity: f64,
}

impl Default for HeatParams {
  fn default() -> Self {
    Self {
      h: 0.01,
      conductivity: AIR_CONDUCTIVITY,
    }
  }
}

impl HeatParams {
  pub fn new(h: f64, conductivity: f64) -> Self {
    Self { h, conductivity }
  }

  pub fn validate(&self) -> Result<()> {
    for (name, value) in [("h", self.h), ("conductivity", self.conductivity)] {
      if !value.is_finite() || value <= 0.0 {
        return Err(InvalidInput::NonPositiveParameter { name, value }.into());
      }
    }
    Ok(())
  }

  /// Factor turning heat-flux density into the right-hand side.
  pub fn rhs_scale(&self) -> f64 {
    self.h * self.h / self.conductivity
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeatBackend {
  /// Dense complete factorization and substitution from this crate.
  #[default]
  Dense,
  /// Sparse factorization and solve delegated to faer.
  Sparse,
}

/// Dense $n^2 times n^2$ operator $A$.
///
/// Block-tridiagonal: diagonal blocks `tridiag(1, -4, 1)`, identity
/// off-diagonal blocks. Built as the Kronecker sum of two 1D
/// second-difference stencils.
pub fn heat_operator(n: usize) -> na::DMatrix<f64> {
  let stencil = matrix_from_const_diagonals(&[1.0, -2.0, 1.0], &[-1, 0, 1], n, n);
  kronecker_sum(&[stencil.clone(), stencil])
}

/// Same operator as [`heat_operator`], as triplets.
pub fn heat_operator_sparse(n: usize) -> Result<SparseMatrix> {
  let nn = n * n;
  let mut operator = SparseMatrix::zeros(nn, nn);
  for (col, row) in itertools::iproduct!(0..n, 0..n) {
    let i = col * n + row;
    operator.push(i, i, -4.0)?;
    if row > 0 {
      operator.push(i, i - 1, 1.0)?;
    }
    if row + 1 < n {
      operator.push(i, i + 1, 1.0)?;
    }
    if col > 0 {
      operator.push(i, i - n, 1.0)?;
    }
    if col + 1 < n {
      operator.push(i, i + n, 1.0)?;
    }
  }
  Ok(operator)
}

pub fn grid_to_vector(grid: &na::DMatrix<f64>) -> Result<na::DVector<f64>> {
  ensure_square(grid.nrows(), grid.ncols())?;
  Ok(na::DVector::from_column_slice(grid.as_slice()))
}

pub fn vector_to_grid(vector: &na::DVector<f64>) -> Result<na::DMatrix<f64>> {
  let n = (vector.len() as f64).sqrt().round() as usize;
  ensure_len(n * n, vector.len())?;
  Ok(na::DMatrix::from_column_slice(n, n, vector.as_slice()))
}

/// Temperature grid for the heat-flux density grid `flux`.
pub fn solve_heat_equation(
  flux: &na::DMatrix<f64>,
  h: f64,
  conductivity: f64,
) -> Result<na::DMatrix<f64>> {
  solve_heat_equation_with(flux, &HeatParams::new(h, conductivity), HeatBackend::Dense)
}

pub fn solve_heat_equation_with(
  flux: &na::DMatrix<f64>,
  params: &HeatParams,
  backend: HeatBackend,
) -> Result<na::DMatrix<f64>> {
  let n = ensure_square(flux.nrows(), flux.ncols())?;
  params.validate()?;
  let _span = tracing::debug_span!("solve_heat_equation", n, ?backend).entered();

  if n == 0 {
    return Ok(na::DMatrix::zeros(0, 0));
  }

  let rhs = grid_to_vector(flux)? * params.rhs_scale();

  let temperature = match backend {
    HeatBackend::Dense => {
      let operator_neg = -heat_operator(n);
      let cholesky = Cholesky::new(&operator_neg, FactorizeMode::Complete)?;
      let y = triangular::solve_lower(cholesky.factor(), &rhs)?;
      -triangular::solve_lower_transpose(cholesky.factor(), &y)?
    }
    HeatBackend::Sparse => {
      let operator_neg = heat_operator_sparse(n)?.neg().to_nalgebra_csc();
      -FaerCholesky::new(operator_neg)?.solve(&rhs)?
    }
  };

  tracing::debug!(
    min = temperature.min(),
    max = temperature.max(),
    "heat equation solved"
  );

  vector_to_grid(&temperature)
}
