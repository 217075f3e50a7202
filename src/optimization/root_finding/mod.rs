//! root_finding — bracketed scalar roots and damped Newton for systems.
//!
//! Purpose
//! -------
//! Supply the two equation solvers the economy layer is built on: a
//! bracketed Brent root finder for one-dimensional monotone conditions
//! (the household labor first-order condition) and a damped Newton method
//! for small square systems (market clearing, balanced budgets).
//!
//! Key behaviors
//! -------------
//! - [`find_root_bracketed`] runs argmin's `BrentRoot` on a validated
//!   sign-changing bracket; [`scalar::expand_bracket_upward`] grows an
//!   upper endpoint from a fixed lower anchor until a sign change appears.
//! - [`solve_newton`] iterates `x ← x + t·Δx` with `J·Δx = −F(x)`, a
//!   finite-difference Jacobian ([`jacobian::fd_jacobian`]), LU solves via
//!   `nalgebra`, and step halving until the residual norm decreases.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scalar functions passed to the Brent wrapper return `f64`; a
//!   non-finite value at an endpoint is reported, not propagated as NaN.
//! - Residual systems return vectors of the same length as their input and
//!   signal undefined points through their own error type.
//! - Both solvers are deterministic: no randomness and a fixed evaluation
//!   order.
//!
//! Conventions
//! -----------
//! - Convergence is measured on `|f(x)|` for scalars and on the sup norm
//!   `max_i |F_i(x)|` for systems.
//! - Failures to converge are `OptError` variants for which
//!   [`OptError::is_convergence_failure`] returns `true`.
//!
//! Downstream usage
//! ----------------
//! - `economy::labor_supply` uses [`find_root_bracketed`] and
//!   [`scalar::expand_bracket_upward`].
//! - `economy::equilibrium` implements [`ResidualSystem`] for its market
//!   clearing and balanced-budget systems and calls [`solve_newton`].
//!
//! Testing notes
//! -------------
//! - Unit tests use closed-form roots (`√2`, circle/diagonal systems) and
//!   cover singular Jacobians, stalled line searches, bracket failures, and
//!   option validation.
//!
//! [`OptError::is_convergence_failure`]: crate::optimization::errors::OptError::is_convergence_failure

pub mod jacobian;
pub mod newton;
pub mod scalar;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::newton::solve_newton;
pub use self::scalar::{BracketOptions, ScalarRoot, find_root_bracketed};
pub use self::traits::{JacobianScheme, NewtonOptions, ResidualSystem, RootOutcome};

pub mod prelude {
    pub use super::newton::solve_newton;
    pub use super::scalar::{BracketOptions, ScalarRoot, find_root_bracketed};
    pub use super::traits::{JacobianScheme, NewtonOptions, ResidualSystem, RootOutcome};
}
