use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(#[from] InvalidInput),

  /// Zero pivot met during forward or backward substitution.
  #[error("singular triangular system: zero diagonal entry in row {row}")]
  SingularSystem { row: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
  #[error("matrix is not square ({nrows}x{ncols})")]
  NotSquare { nrows: usize, ncols: usize },

  #[error("dimension mismatch: expected {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },

  #[error("entry ({row},{col}) out of bounds for {nrows}x{ncols} matrix")]
  IndexOutOfBounds {
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
  },

  #[error("parameter `{name}` must be positive and finite, got {value}")]
  NonPositiveParameter { name: &'static str, value: f64 },

  /// Non-positive value under the square root while factorizing column `col`.
  #[error("matrix is not positive-definite: pivot {pivot} in column {col}")]
  NotPositiveDefinite { col: usize, pivot: f64 },

  /// The sparse backend refused to factorize.
  #[error("matrix rejected by sparse factorization: {reason}")]
  FactorizationRejected { reason: String },
}

impl Error {
  pub fn is_invalid_input(&self) -> bool {
    matches!(self, Self::InvalidInput(_))
  }
  pub fn is_singular_system(&self) -> bool {
    matches!(self, Self::SingularSystem { .. })
  }
}

pub(crate) fn ensure_square(nrows: usize, ncols: usize) -> Result<usize> {
  if nrows != ncols {
    return Err(InvalidInput::NotSquare { nrows, ncols }.into());
  }
  Ok(nrows)
}

pub(crate) fn ensure_len(expected: usize, actual: usize) -> Result<()> {
  if expected != actual {
    return Err(InvalidInput::DimensionMismatch { expected, actual }.into());
  }
  Ok(())
}
