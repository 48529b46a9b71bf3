//! Relative error and run time of the incomplete factorization,
//! as a function of the density of a 100x100 random sparse SPD matrix.

extern crate nalgebra as na;

use cholheat::{complete_cholesky, incomplete_cholesky, linalg::relative_frobenius_diff};

use std::time::Instant;

#[path = "../tests/common/mod.rs"]
mod common;

fn main() -> cholheat::Result<()> {
  tracing_subscriber::fmt::init();

  let size = 100;
  let npoints = 20;
  let noffdiag = size * (size - 1);
  let mut rng = common::seeded_rng(0);

  println!("density  rel_error  t_complete  t_incomplete");
  for ipoint in 0..=npoints {
    let nzeros = (noffdiag * ipoint / npoints) & !1;
    let m = common::symmetric_sparse_positive_definite(size, nzeros, 1, &mut rng);
    let density = (size * size - nzeros) as f64 / (size * size) as f64;

    let start = Instant::now();
    let complete = complete_cholesky(&m)?;
    let t_complete = start.elapsed();

    let start = Instant::now();
    let incomplete = incomplete_cholesky(&m)?;
    let t_incomplete = start.elapsed();

    let error = relative_frobenius_diff(&incomplete, &complete);
    println!("{density:7.3}  {error:9.2e}  {t_complete:>10.2?}  {t_incomplete:>12.2?}");
  }

  Ok(())
}
