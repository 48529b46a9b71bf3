//! Random integer-valued symmetric positive-definite matrices,
//! and the checks that validate them.
//!
//! Positive-definiteness comes from strict diagonal dominance.

#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn seeded_rng(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}

/// Off-diagonal entries in `[-2 max_value, 2 max_value]`.
pub fn symmetric_positive_definite(n: usize, max_value: i32, rng: &mut impl Rng) -> na::DMatrix<f64> {
  assert!(max_value >= 1);
  let a = na::DMatrix::from_fn(n, n, |_, _| rng.gen_range(-max_value..=max_value) as f64);
  let mut a = &a + a.transpose();
  let shift = (2 * n as i32 * max_value + 1) as f64;
  for i in 0..n {
    a[(i, i)] += shift;
  }
  a
}

/// Exactly `nzeros` zero off-diagonal entries, rounded down to an even count.
///
/// `nzeros` must be at most `n * (n - 1)`.
pub fn symmetric_sparse_positive_definite(
  n: usize,
  nzeros: usize,
  max_value: i32,
  rng: &mut impl Rng,
) -> na::DMatrix<f64> {
  assert!(max_value >= 1);
  assert!(nzeros <= n * n.saturating_sub(1));

  let mut a = na::DMatrix::zeros(n, n);
  let mut current_nzeros = n * n.saturating_sub(1);
  while current_nzeros > nzeros {
    let i = rng.gen_range(0..n);
    let j = rng.gen_range(0..n);
    if i == j || a[(i, j)] != 0.0 {
      continue;
    }
    let value = loop {
      let v = rng.gen_range(-max_value..=max_value);
      if v != 0 {
        break v as f64;
      }
    };
    a[(i, j)] = value;
    a[(j, i)] = value;
    current_nzeros -= 2;
  }

  let shift = (n as i32 * max_value + 1) as f64;
  for i in 0..n {
    a[(i, i)] += shift;
  }
  a
}

pub trait DMatrixExt {
  fn is_symmetric(&self) -> bool;
  fn is_spd(&self) -> bool;
  fn count_zeros(&self) -> usize;
}
impl DMatrixExt for na::DMatrix<f64> {
  /// Exact symmetry, the way matrices produced by integer generators are.
  fn is_symmetric(&self) -> bool {
    self.is_square() && *self == self.transpose()
  }
  fn is_spd(&self) -> bool {
    self.is_symmetric() && na::Cholesky::new(self.clone()).is_some()
  }
  fn count_zeros(&self) -> usize {
    self.iter().filter(|&&v| v == 0.0).count()
  }
}
