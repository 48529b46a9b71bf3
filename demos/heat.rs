//! Four point heat sources on a 50x50 grid of air.
//!
//! Run in release mode, the dense backend factorizes a 2500x2500 matrix.

extern crate nalgebra as na;

use cholheat::heat::{solve_heat_equation_with, HeatBackend, HeatParams};

use std::time::Instant;

fn main() -> cholheat::Result<()> {
  tracing_subscriber::fmt::init();

  let size = 50;
  let params = HeatParams::default();

  let mut flux = na::DMatrix::zeros(size, size);
  flux[(10, 10)] = 100.0;
  flux[(10, 30)] = 150.0;
  flux[(30, 10)] = 200.0;
  flux[(30, 30)] = 250.0;

  let mut solutions = Vec::new();
  for backend in [HeatBackend::Sparse, HeatBackend::Dense] {
    let start = Instant::now();
    let temperature = solve_heat_equation_with(&flux, &params, backend)?;
    tracing::info!(
      ?backend,
      elapsed = ?start.elapsed(),
      min = temperature.min(),
      max = temperature.max(),
      "solved"
    );
    solutions.push(temperature);
  }

  let diff = (&solutions[0] - &solutions[1]).abs().max();
  tracing::info!(diff, "max difference between backends");

  for row in (0..size).step_by(5) {
    let line: Vec<String> = (0..size)
      .step_by(5)
      .map(|col| format!("{:8.4}", solutions[0][(row, col)]))
      .collect();
    println!("{}", line.join(" "));
  }

  Ok(())
}
