//! Dense complete and incomplete Cholesky factorization, triangular
//! substitution, and a finite-difference solver for the steady-state heat
//! equation on a square grid.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod cholesky;
pub mod error;
pub mod heat;
pub mod linalg;
pub mod sparse;
pub mod triangular;

pub use cholesky::{complete_cholesky, factorize, incomplete_cholesky, Cholesky, FactorizeMode};
pub use error::{Error, InvalidInput, Result};
pub use heat::{solve_heat_equation, HeatBackend, HeatParams};
