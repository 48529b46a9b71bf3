//! Sparse storage: a triplet builder, conversions to nalgebra-sparse and faer,
//! and the sparse counterpart of the incomplete factorization.

pub mod ichol;

use crate::error::{ensure_len, ensure_square, InvalidInput, Result};

use faer::solvers::SpSolver;

#[derive(Debug, Default, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self {
      nrows,
      ncols,
      triplets: Vec::new(),
    }
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Result<Self> {
    let mut mat = Self::zeros(nrows, ncols);
    for (r, c, v) in triplets {
      mat.push(r, c, v)?;
    }
    Ok(mat)
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }

  /// Explicit zeros are not stored. Duplicates are summed on conversion.
  pub fn push(&mut self, r: usize, c: usize, v: f64) -> Result<()> {
    if r >= self.nrows || c >= self.ncols {
      return Err(
        InvalidInput::IndexOutOfBounds {
          row: r,
          col: c,
          nrows: self.nrows,
          ncols: self.ncols,
        }
        .into(),
      );
    }
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
    Ok(())
  }

  pub fn neg(mut self) -> Self {
    self.triplets.iter_mut().for_each(|t| t.2 = -t.2);
    self
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for &(r, c, v) in &self.triplets {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: nas::CscMatrix<f64>) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

/// Sparse $L L^T$ factorization and solve, delegated to faer.
pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
  dim: usize,
}
impl FaerCholesky {
  /// `a` must be symmetric positive-definite, only its upper triangle is read.
  pub fn new(a: nas::CscMatrix<f64>) -> Result<Self> {
    let dim = ensure_square(a.nrows(), a.ncols())?;
    let raw = nalgebra2faer(a)
      .sp_cholesky(faer::Side::Upper)
      .map_err(|err| {
        tracing::warn!(?err, "sparse cholesky factorization failed");
        InvalidInput::FactorizationRejected {
          reason: format!("{err:?}"),
        }
      })?;
    Ok(Self { raw, dim })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    ensure_len(self.dim, b.len())?;
    let b = faer::col::from_slice(b.as_slice());
    Ok(na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec()))
  }
}
