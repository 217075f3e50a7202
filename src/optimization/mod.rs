//! optimization — root finders, a minimizer, and a unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical layer underneath the economy model: equation
//! solvers for first-order and market-clearing conditions, and an outer
//! minimizer for policy search. Callers describe a residual system or an
//! objective and obtain solutions plus diagnostics without touching
//! backend solver details.
//!
//! Key behaviors
//! -------------
//! - `root_finding`: bracketed Brent roots for monotone scalar conditions
//!   and a damped Newton method with finite-difference Jacobians for small
//!   square systems.
//! - `minimizer`: Nelder–Mead or L-BFGS minimization of a scalar cost via
//!   argmin, with finite-difference gradient fallbacks.
//! - `errors`: configuration issues, numerical failures, and backend solver
//!   errors normalized into `OptError` / `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers report invalid states as `OptError`, not panics.
//! - All numerical work is deterministic for fixed inputs.
//!
//! Conventions
//! -----------
//! - Vectors are `ndarray::Array1<f64>`; dense linear solves go through
//!   `nalgebra`.
//! - Progress output is opt-in: the `obs_slog` feature plus a `verbose`
//!   option flag. Nothing is printed otherwise.
//!
//! Downstream usage
//! ----------------
//! - `economy` implements `ResidualSystem` and `Objective` and calls
//!   `find_root_bracketed`, `solve_newton`, and `minimize`.
//! - Front-ends can import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests exercise each solver on closed-form problems;
//!   `errors` tests cover conversions and the convergence classification.

pub mod errors;
pub mod minimizer;
pub mod root_finding;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use policy_equilibrium::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::root_finding::prelude::*;
}
